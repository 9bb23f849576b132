use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::Credential;
use crate::features::reports::dtos::{
    CreateReportDto, ListReportsQuery, ReportKindDto, ReportResponseDto,
};
use crate::features::reports::models::ReportKind;
use crate::features::reports::services::ReportAggregator;
use crate::shared::types::{ApiResponse, Meta};
use crate::shared::validation::ensure_identifier;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub aggregator: Arc<ReportAggregator>,
}

/// List every report of a case, newest first
#[utoipa::path(
    get,
    path = "/api/cases/{case_id}/reports",
    params(
        ("case_id" = String, Path, description = "Case ID"),
        ListReportsQuery
    ),
    responses(
        (status = 200, description = "Unified report feed", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid case ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_case_reports(
    credential: Credential,
    State(state): State<ReportState>,
    AppPath(case_id): AppPath<String>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    ensure_identifier("Case ID", &case_id)?;

    let reports = state
        .aggregator
        .list_reports(&credential, &case_id, query.refresh)
        .await;
    let meta = Meta::total(reports.len());
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();

    Ok(Json(ApiResponse::success(Some(dtos), None, Some(meta))))
}

/// Create a report on a case
#[utoipa::path(
    post,
    path = "/api/cases/{case_id}/reports",
    params(
        ("case_id" = String, Path, description = "Case ID")
    ),
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Case API unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_case_report(
    credential: Credential,
    State(state): State<ReportState>,
    AppPath(case_id): AppPath<String>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    ensure_identifier("Case ID", &case_id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .aggregator
        .create_report(&credential, &case_id, dto.into_request(&case_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created successfully".to_string()),
            None,
        )),
    ))
}

/// List report kinds with their display metadata (public)
#[utoipa::path(
    get,
    path = "/api/reports/kinds",
    responses(
        (status = 200, description = "Report kinds", body = ApiResponse<Vec<ReportKindDto>>)
    ),
    tag = "reports"
)]
pub async fn list_report_kinds() -> Json<ApiResponse<Vec<ReportKindDto>>> {
    let kinds: Vec<ReportKindDto> = ReportKind::ALL.into_iter().map(|k| k.into()).collect();
    let meta = Meta::total(kinds.len());
    Json(ApiResponse::success(Some(kinds), None, Some(meta)))
}
