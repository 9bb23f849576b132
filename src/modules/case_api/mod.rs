//! Upstream forensic case API
//!
//! The gateway never owns case data. Every read and write goes through the
//! [`CaseApi`] trait, implemented over HTTP by [`HttpCaseApiClient`] and by an
//! in-memory fake in tests.

mod http_client;
pub mod wire;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::auth::Credential;

pub use http_client::HttpCaseApiClient;
pub use wire::{CreateReportRequest, RawOdontogram, RawReport, ToothUpsertBody};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CaseApiError {
    #[error("Upstream resource not found: {0}")]
    NotFound(String),

    #[error("Upstream rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Operations the gateway consumes from the upstream case API.
///
/// Implementations forward the caller's credential unchanged.
#[async_trait]
pub trait CaseApi: Send + Sync {
    /// `GET /api/laudos?casoId=`
    async fn list_evidence_laudos(
        &self,
        credential: &Credential,
        case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError>;

    /// `GET /api/laudos-odontologicos?casoId=`
    async fn list_dental_laudos(
        &self,
        credential: &Credential,
        case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError>;

    /// `GET /api/relatorios/{caseId}`; zero or one item in practice
    async fn get_final_reports(
        &self,
        credential: &Credential,
        case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError>;

    /// `GET /api/vitimas/{victimId}/odontograma`
    async fn get_odontogram(
        &self,
        credential: &Credential,
        victim_id: &str,
    ) -> Result<RawOdontogram, CaseApiError>;

    async fn create_report(
        &self,
        credential: &Credential,
        request: &CreateReportRequest,
    ) -> Result<RawReport, CaseApiError>;

    /// `PUT /api/vitimas/{victimId}/odontograma/dente/{number}`
    async fn upsert_tooth(
        &self,
        credential: &Credential,
        victim_id: &str,
        number: u8,
        body: &ToothUpsertBody,
    ) -> Result<(), CaseApiError>;
}
