use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Report kind, assigned from the upstream collection a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    EvidenceReport,
    DentalReport,
    FinalReport,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::EvidenceReport,
        ReportKind::DentalReport,
        ReportKind::FinalReport,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::EvidenceReport => "Laudo de Evidência",
            ReportKind::DentalReport => "Laudo Odontológico",
            ReportKind::FinalReport => "Relatório Final",
        }
    }

    /// Material icon name shown next to the report
    pub fn icon(self) -> &'static str {
        match self {
            ReportKind::EvidenceReport => "description",
            ReportKind::DentalReport => "medical-services",
            ReportKind::FinalReport => "summarize",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ReportKind::EvidenceReport => "#4B6382",
            ReportKind::DentalReport => "#B58863",
            ReportKind::FinalReport => "#3D4D55",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::EvidenceReport => write!(f, "evidence_report"),
            ReportKind::DentalReport => write!(f, "dental_report"),
            ReportKind::FinalReport => write!(f, "final_report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Victim referenced by a dental report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VictimRef {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Victim identification number, display only
    pub nic: Option<String>,
}

/// A report normalized from any of the three upstream collections
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub kind: ReportKind,
    pub title: Option<String>,
    pub body: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub author: Option<ReportAuthor>,
    pub status: Option<String>,
    pub case_id: Option<String>,
    pub victim: Option<VictimRef>,
    pub evidence_ids: Vec<String>,
}

impl Report {
    /// Body truncated to `max_chars` characters, with `...` appended when cut
    pub fn excerpt(&self, max_chars: usize) -> Option<String> {
        let body = self.body.as_deref()?;
        match body.char_indices().nth(max_chars) {
            Some((cut, _)) => Some(format!("{}...", &body[..cut])),
            None => Some(body.to_string()),
        }
    }
}
