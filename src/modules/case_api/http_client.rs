use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::wire::{DentalLaudoBody, EvidenceLaudoBody, FinalReportBody};
use super::{CaseApi, CaseApiError, CreateReportRequest, RawOdontogram, RawReport, ToothUpsertBody};
use crate::core::config::CaseApiConfig;
use crate::features::auth::Credential;

/// HTTP client for the upstream forensic case API
pub struct HttpCaseApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpCaseApiClient {
    pub fn new(config: &CaseApiConfig) -> Result<Self, CaseApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CaseApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
    ) -> Result<T, CaseApiError> {
        let response = self.send(Method::GET, credential, path, None::<&()>).await?;
        Self::decode(path, response).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        credential: &Credential,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, CaseApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Case API request: {} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(credential.token());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CaseApiError::Transport(format!("Timed out calling {}", path))
            } else {
                CaseApiError::Transport(format!("Failed to call {}: {}", path, e))
            }
        })?;

        Self::check_status(path, response).await
    }

    async fn check_status(path: &str, response: Response) -> Result<Response, CaseApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Case API error on {}: HTTP {} - {}", path, status, body);

        Err(status_error(path, status, body))
    }

    async fn get_reports(
        &self,
        credential: &Credential,
        path: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        let value: Value = self.get_json(credential, path).await?;
        reports_from_value(path, value)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, CaseApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| CaseApiError::Decode(format!("{}: {}", path, e)))
    }
}

/// Error for a non-success upstream status
fn status_error(path: &str, status: StatusCode, body: String) -> CaseApiError {
    match status {
        StatusCode::NOT_FOUND => CaseApiError::NotFound(path.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CaseApiError::Unauthorized(format!("HTTP {} from {}", status.as_u16(), path))
        }
        _ => CaseApiError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Report collections arrive as arrays; the final-report endpoint returns
/// `null`, a single document, or (on some deployments) an array.
///
/// Array items are decoded one by one and undecodable ones are skipped.
fn reports_from_value(path: &str, value: Value) -> Result<Vec<RawReport>, CaseApiError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<RawReport>(item) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!("Skipping undecodable report {} from {}: {}", index, path, e);
                    None
                }
            })
            .collect()),
        other => serde_json::from_value::<RawReport>(other)
            .map(|report| vec![report])
            .map_err(|e| CaseApiError::Decode(format!("{}: {}", path, e))),
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl CaseApi for HttpCaseApiClient {
    async fn list_evidence_laudos(
        &self,
        credential: &Credential,
        case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        let path = format!("/api/laudos?casoId={}", segment(case_id));
        self.get_reports(credential, &path).await
    }

    async fn list_dental_laudos(
        &self,
        credential: &Credential,
        case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        let path = format!("/api/laudos-odontologicos?casoId={}", segment(case_id));
        self.get_reports(credential, &path).await
    }

    async fn get_final_reports(
        &self,
        credential: &Credential,
        case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        let path = format!("/api/relatorios/{}", segment(case_id));
        self.get_reports(credential, &path).await
    }

    async fn get_odontogram(
        &self,
        credential: &Credential,
        victim_id: &str,
    ) -> Result<RawOdontogram, CaseApiError> {
        let path = format!("/api/vitimas/{}/odontograma", segment(victim_id));
        self.get_json(credential, &path).await
    }

    async fn create_report(
        &self,
        credential: &Credential,
        request: &CreateReportRequest,
    ) -> Result<RawReport, CaseApiError> {
        let (path, response) = match request {
            CreateReportRequest::EvidenceLaudo {
                case_id,
                evidence_ids,
                text,
            } => {
                let path = "/api/laudos".to_string();
                let body = EvidenceLaudoBody {
                    caso: case_id,
                    evidencias: evidence_ids,
                    texto: text,
                };
                let response = self
                    .send(Method::POST, credential, &path, Some(&body))
                    .await?;
                (path, response)
            }
            CreateReportRequest::DentalLaudo {
                victim_id,
                notes,
                opinion,
            } => {
                let path = format!("/api/laudos-odontologicos/{}", segment(victim_id));
                let body = DentalLaudoBody {
                    observacoes: notes,
                    parecer: opinion,
                };
                let response = self
                    .send(Method::POST, credential, &path, Some(&body))
                    .await?;
                (path, response)
            }
            CreateReportRequest::FinalReport {
                case_id,
                title,
                text,
            } => {
                let path = format!("/api/relatorios/{}", segment(case_id));
                let body = FinalReportBody {
                    titulo: title,
                    texto: text,
                };
                let response = self
                    .send(Method::POST, credential, &path, Some(&body))
                    .await?;
                (path, response)
            }
        };

        Self::decode(&path, response).await
    }

    async fn upsert_tooth(
        &self,
        credential: &Credential,
        victim_id: &str,
        number: u8,
        body: &ToothUpsertBody,
    ) -> Result<(), CaseApiError> {
        let path = format!(
            "/api/vitimas/{}/odontograma/dente/{}",
            segment(victim_id),
            number
        );
        // Acknowledgement body is not used; the caller reloads the chart.
        self.send(Method::PUT, credential, &path, Some(body))
            .await
            .map(|_| ())
    }
}
