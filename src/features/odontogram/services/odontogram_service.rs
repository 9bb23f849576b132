use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::Credential;
use crate::features::odontogram::models::{OdontogramChart, ToothEdit, ToothNumber, ToothRecord};
use crate::modules::case_api::{CaseApi, CaseApiError};

/// Result of a tooth edit.
///
/// When persistence fails the optimistic chart is kept and `warning` says why.
#[derive(Debug, Clone)]
pub struct ToothEditOutcome {
    pub chart: OdontogramChart,
    pub record: ToothRecord,
    pub persisted: bool,
    pub warning: Option<String>,
}

/// Service for victim dental charts
pub struct OdontogramService {
    case_api: Arc<dyn CaseApi>,
}

impl OdontogramService {
    pub fn new(case_api: Arc<dyn CaseApi>) -> Self {
        Self { case_api }
    }

    /// Chart of a victim; a victim without a stored chart gets an empty adult one
    pub async fn load_chart(
        &self,
        credential: &Credential,
        victim_id: &str,
    ) -> Result<OdontogramChart> {
        match self.case_api.get_odontogram(credential, victim_id).await {
            Ok(raw) => OdontogramChart::try_from(raw).map_err(|e| {
                tracing::error!("Invalid odontogram for victim {}: {}", victim_id, e);
                AppError::ExternalServiceError(format!("Case API returned an invalid odontogram: {}", e))
            }),
            Err(CaseApiError::NotFound(_)) => {
                tracing::debug!("No odontogram stored for victim {}, using default", victim_id);
                Ok(OdontogramChart::default())
            }
            Err(e) => {
                tracing::warn!("Failed to load odontogram for victim {}: {}", victim_id, e);
                Err(e.into())
            }
        }
    }

    pub async fn get_tooth(
        &self,
        credential: &Credential,
        victim_id: &str,
        number: u8,
    ) -> Result<ToothRecord> {
        let number = ToothNumber::try_from(number)?;
        let chart = self.load_chart(credential, victim_id).await?;
        Ok(chart.tooth(number))
    }

    /// Apply an edit optimistically, persist it, then reload to reconcile
    pub async fn edit_tooth(
        &self,
        credential: &Credential,
        victim_id: &str,
        edit: ToothEdit,
    ) -> Result<ToothEditOutcome> {
        // Invalid edits never reach the network.
        edit.validate()?;

        let chart = self.load_chart(credential, victim_id).await?;
        let (optimistic, request) = chart.apply_edit(&edit)?;
        let record = optimistic.tooth(request.number);

        if let Err(e) = self
            .case_api
            .upsert_tooth(credential, victim_id, request.number.get(), &request.body())
            .await
        {
            tracing::warn!(
                "Failed to persist tooth {} for victim {}: {}",
                request.number,
                victim_id,
                e
            );
            return Ok(ToothEditOutcome {
                chart: optimistic,
                record,
                persisted: false,
                warning: Some(format!(
                    "Tooth {} was updated locally but could not be saved: {}",
                    request.number, e
                )),
            });
        }

        if record.is_blank() {
            tracing::info!("Cleared tooth {} for victim {}", request.number, victim_id);
        } else {
            tracing::info!("Saved tooth {} for victim {}", request.number, victim_id);
        }

        match self.load_chart(credential, victim_id).await {
            Ok(fresh) => Ok(ToothEditOutcome {
                record: fresh.tooth(request.number),
                chart: fresh,
                persisted: true,
                warning: None,
            }),
            Err(e) => Ok(ToothEditOutcome {
                chart: optimistic,
                record,
                persisted: true,
                warning: Some(format!(
                    "Tooth {} was saved but the chart could not be refreshed: {}",
                    request.number, e
                )),
            }),
        }
    }
}
