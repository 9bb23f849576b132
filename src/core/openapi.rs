use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::odontogram::{
    dtos as odontogram_dtos, handlers as odontogram_handlers, models as odontogram_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::list_case_reports,
        reports_handlers::report_handler::create_case_report,
        reports_handlers::report_handler::list_report_kinds,
        // Odontogram
        odontogram_handlers::odontogram_handler::get_odontogram,
        odontogram_handlers::odontogram_handler::get_tooth,
        odontogram_handlers::odontogram_handler::update_tooth,
        odontogram_handlers::odontogram_handler::get_legend,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::ReportKind,
            reports_models::ReportAuthor,
            reports_models::VictimRef,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportKindDto,
            reports_dtos::CreateReportDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportKindDto>>,
            // Odontogram
            odontogram_models::ChartType,
            odontogram_models::Quadrant,
            odontogram_models::ToothCondition,
            odontogram_dtos::ToothRecordDto,
            odontogram_dtos::QuadrantDto,
            odontogram_dtos::OdontogramResponseDto,
            odontogram_dtos::UpdateToothDto,
            odontogram_dtos::ToothEditResponseDto,
            odontogram_dtos::ConditionLegendDto,
            ApiResponse<odontogram_dtos::OdontogramResponseDto>,
            ApiResponse<odontogram_dtos::ToothRecordDto>,
            ApiResponse<odontogram_dtos::ToothEditResponseDto>,
            ApiResponse<Vec<odontogram_dtos::ConditionLegendDto>>,
        )
    ),
    tags(
        (name = "reports", description = "Unified case report feed and report creation"),
        (name = "odontogram", description = "Victim dental charts"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Forensic Case Gateway API",
        version = "0.1.0",
        description = "Backend-for-frontend over the forensic case API",
    )
)]
pub struct ApiDoc;

/// Adds the forwarded bearer token scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_gateway_paths() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/cases/{case_id}/reports",
            "/api/reports/kinds",
            "/api/victims/{victim_id}/odontogram",
            "/api/victims/{victim_id}/odontogram/teeth/{number}",
            "/api/odontogram/legend",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
