use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::Credential;
use crate::features::odontogram::dtos::{
    ConditionLegendDto, OdontogramResponseDto, ToothEditResponseDto, ToothRecordDto,
    UpdateToothDto,
};
use crate::features::odontogram::models::{ToothCondition, ToothNumber};
use crate::features::odontogram::services::OdontogramService;
use crate::shared::types::{ApiResponse, Meta};
use crate::shared::validation::ensure_identifier;

/// Get the dental chart of a victim
#[utoipa::path(
    get,
    path = "/api/victims/{victim_id}/odontogram",
    params(
        ("victim_id" = String, Path, description = "Victim ID")
    ),
    responses(
        (status = 200, description = "Chart found, or an empty adult chart", body = ApiResponse<OdontogramResponseDto>),
        (status = 400, description = "Invalid victim ID"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Case API unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "odontogram"
)]
pub async fn get_odontogram(
    credential: Credential,
    State(service): State<Arc<OdontogramService>>,
    AppPath(victim_id): AppPath<String>,
) -> Result<Json<ApiResponse<OdontogramResponseDto>>> {
    ensure_identifier("Victim ID", &victim_id)?;

    let chart = service.load_chart(&credential, &victim_id).await?;
    let dto = OdontogramResponseDto::new(&victim_id, &chart);
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Get one tooth of a victim's chart
#[utoipa::path(
    get,
    path = "/api/victims/{victim_id}/odontogram/teeth/{number}",
    params(
        ("victim_id" = String, Path, description = "Victim ID"),
        ("number" = u8, Path, description = "FDI tooth number")
    ),
    responses(
        (status = 200, description = "Tooth record, blank when never edited", body = ApiResponse<ToothRecordDto>),
        (status = 400, description = "Invalid victim ID or tooth number"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "odontogram"
)]
pub async fn get_tooth(
    credential: Credential,
    State(service): State<Arc<OdontogramService>>,
    AppPath((victim_id, number)): AppPath<(String, i64)>,
) -> Result<Json<ApiResponse<ToothRecordDto>>> {
    ensure_identifier("Victim ID", &victim_id)?;
    let number = ToothNumber::try_from(number)?;

    let record = service.get_tooth(&credential, &victim_id, number.get()).await?;
    Ok(Json(ApiResponse::success(
        Some(ToothRecordDto::from(&record)),
        None,
        None,
    )))
}

/// Replace one tooth's record and persist it
#[utoipa::path(
    put,
    path = "/api/victims/{victim_id}/odontogram/teeth/{number}",
    params(
        ("victim_id" = String, Path, description = "Victim ID"),
        ("number" = u8, Path, description = "FDI tooth number")
    ),
    request_body = UpdateToothDto,
    responses(
        (status = 200, description = "Tooth updated; check `persisted` and `warning`", body = ApiResponse<ToothEditResponseDto>),
        (status = 400, description = "Invalid tooth number or condition"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Chart could not be loaded")
    ),
    security(("bearer_auth" = [])),
    tag = "odontogram"
)]
pub async fn update_tooth(
    credential: Credential,
    State(service): State<Arc<OdontogramService>>,
    AppPath((victim_id, number)): AppPath<(String, i64)>,
    AppJson(dto): AppJson<UpdateToothDto>,
) -> Result<Json<ApiResponse<ToothEditResponseDto>>> {
    ensure_identifier("Victim ID", &victim_id)?;
    let number = ToothNumber::try_from(number)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service
        .edit_tooth(&credential, &victim_id, dto.into_edit(number.get()))
        .await?;

    let message = outcome
        .warning
        .clone()
        .unwrap_or_else(|| "Tooth updated successfully".to_string());
    let dto = ToothEditResponseDto::new(&victim_id, &outcome);

    Ok(Json(ApiResponse::success(Some(dto), Some(message), None)))
}

/// Condition legend (public)
#[utoipa::path(
    get,
    path = "/api/odontogram/legend",
    responses(
        (status = 200, description = "Condition colors and labels", body = ApiResponse<Vec<ConditionLegendDto>>)
    ),
    tag = "odontogram"
)]
pub async fn get_legend() -> Json<ApiResponse<Vec<ConditionLegendDto>>> {
    let legend: Vec<ConditionLegendDto> = ToothCondition::ALL.into_iter().map(|c| c.into()).collect();
    let meta = Meta::total(legend.len());
    Json(ApiResponse::success(Some(legend), None, Some(meta)))
}
