use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::reports::models::{Report, ReportAuthor, ReportKind, VictimRef};
use crate::modules::case_api::CreateReportRequest;
use crate::shared::constants::REPORT_EXCERPT_CHARS;

/// Response DTO for a report in the case feed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: String,
    pub kind: ReportKind,
    pub kind_label: String,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Body shortened for list rows
    pub excerpt: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub author: Option<ReportAuthor>,
    pub status: Option<String>,
    pub case_id: Option<String>,
    pub victim: Option<VictimRef>,
    pub evidence_ids: Vec<String>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        let excerpt = r.excerpt(REPORT_EXCERPT_CHARS);
        Self {
            id: r.id,
            kind: r.kind,
            kind_label: r.kind.label().to_string(),
            title: r.title,
            body: r.body,
            excerpt,
            timestamp: r.timestamp,
            author: r.author,
            status: r.status,
            case_id: r.case_id,
            victim: r.victim,
            evidence_ids: r.evidence_ids,
        }
    }
}

/// Display metadata for a report kind
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportKindDto {
    pub kind: ReportKind,
    pub label: String,
    pub icon: String,
    pub color: String,
}

impl From<ReportKind> for ReportKindDto {
    fn from(kind: ReportKind) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            icon: kind.icon().to_string(),
            color: kind.color().to_string(),
        }
    }
}

/// Query params for the case report feed
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Bypass the cached snapshot and fetch every source again
    #[serde(default)]
    pub refresh: bool,
}

/// Request DTO for creating a report on a case
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_report"))]
pub struct CreateReportDto {
    pub kind: ReportKind,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Report text (evidence and final reports)
    pub text: Option<String>,

    /// Examiner notes (dental reports)
    pub notes: Option<String>,

    /// Examiner opinion (dental reports)
    pub opinion: Option<String>,

    /// Evidence covered by an evidence report
    #[serde(default)]
    pub evidence_ids: Vec<String>,

    /// Victim examined in a dental report
    #[validate(regex(
        path = "*crate::shared::validation::IDENTIFIER_REGEX",
        message = "Victim id must be 1-64 characters of letters, digits, '-' or '_'"
    ))]
    pub victim_id: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_create_report(dto: &CreateReportDto) -> Result<(), ValidationError> {
    if dto.title.trim().is_empty() {
        return Err(invalid("blank_title", "Title must not be blank"));
    }

    match dto.kind {
        ReportKind::DentalReport => {
            if dto.victim_id.is_none() {
                return Err(invalid(
                    "missing_victim",
                    "Dental reports require a victim_id",
                ));
            }
            if is_blank(&dto.opinion) {
                return Err(invalid(
                    "missing_opinion",
                    "Dental reports require an opinion",
                ));
            }
        }
        ReportKind::EvidenceReport | ReportKind::FinalReport => {
            if is_blank(&dto.text) {
                return Err(invalid("missing_text", "Report text is required"));
            }
        }
    }

    Ok(())
}

impl CreateReportDto {
    /// Upstream request for the chosen kind; call after validation
    pub fn into_request(self, case_id: &str) -> CreateReportRequest {
        match self.kind {
            ReportKind::EvidenceReport => CreateReportRequest::EvidenceLaudo {
                case_id: case_id.to_string(),
                evidence_ids: self.evidence_ids,
                text: self.text.unwrap_or_default(),
            },
            ReportKind::DentalReport => CreateReportRequest::DentalLaudo {
                victim_id: self.victim_id.unwrap_or_default(),
                notes: self.notes.unwrap_or_default(),
                opinion: self.opinion.unwrap_or_default(),
            },
            ReportKind::FinalReport => CreateReportRequest::FinalReport {
                case_id: case_id.to_string(),
                title: self.title,
                text: self.text.unwrap_or_default(),
            },
        }
    }
}
