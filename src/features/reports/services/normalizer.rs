//! Turns upstream report documents into [`Report`] values.
//!
//! Each upstream collection spells its fields differently; the resolvers
//! below walk explicit priority lists instead of guessing per kind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::features::reports::models::{Report, ReportAuthor, ReportKind, VictimRef};
use crate::modules::case_api::wire::{RawRef, RawReport, RawTimestamp, RawUser, RawVictim};

/// Naive formats tried after RFC 3339; interpreted as UTC
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Build a normalized report tagged with the kind of the collection it came from.
///
/// `case_id` is the case the collection was fetched for and stands in when the
/// document does not name its case.
pub fn normalize(kind: ReportKind, raw: RawReport, case_id: &str) -> Report {
    let id = raw.identifier().unwrap_or_default().to_string();
    let timestamp = resolve_timestamp(&raw);
    let body = resolve_body(&raw);
    let author = resolve_author(&raw);

    let case_id = raw
        .caso
        .as_ref()
        .and_then(|c| c.id())
        .unwrap_or(case_id)
        .to_string();

    let evidence_ids = match kind {
        ReportKind::EvidenceReport => raw.evidence_ids().map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let victim = match kind {
        ReportKind::DentalReport => raw.vitima.map(victim_ref),
        _ => None,
    };

    Report {
        id,
        kind,
        title: raw.titulo.filter(|t| !t.trim().is_empty()),
        body,
        timestamp,
        author,
        status: raw.status,
        case_id: Some(case_id),
        victim,
        evidence_ids,
    }
}

/// Creation time from the first present of `criadoEm`, `dataEmissao`, `createdAt`.
///
/// Only the first present field is consulted: if it does not parse, the
/// report has no timestamp and sorts as the oldest.
pub fn resolve_timestamp(raw: &RawReport) -> Option<DateTime<Utc>> {
    let first_present = [&raw.criado_em, &raw.data_emissao, &raw.created_at]
        .into_iter()
        .flatten()
        .find(|value| match value {
            RawTimestamp::Text(text) => !text.trim().is_empty(),
            RawTimestamp::Millis(_) => true,
        })?;

    parse_timestamp(first_present)
}

pub fn parse_timestamp(value: &RawTimestamp) -> Option<DateTime<Utc>> {
    match value {
        RawTimestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
        RawTimestamp::Text(text) => parse_text_timestamp(text.trim()),
    }
}

fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Primary text: `texto`, then `observacoes`, then `parecer`; blanks are skipped
pub fn resolve_body(raw: &RawReport) -> Option<String> {
    [&raw.texto, &raw.observacoes, &raw.parecer]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .cloned()
}

/// Author from `autor`, then `perito`, then `criadoPor`; bare ids carry no name
pub fn resolve_author(raw: &RawReport) -> Option<ReportAuthor> {
    [&raw.autor, &raw.perito, &raw.criado_por]
        .into_iter()
        .flatten()
        .find_map(|user| match user {
            RawRef::Populated(RawUser {
                name: Some(name),
                role,
                ..
            }) if !name.trim().is_empty() => Some(ReportAuthor {
                name: name.clone(),
                role: role.clone(),
            }),
            _ => None,
        })
}

fn victim_ref(raw: RawRef<RawVictim>) -> VictimRef {
    match raw {
        RawRef::Id(id) => VictimRef {
            id: Some(id),
            name: None,
            nic: None,
        },
        RawRef::Populated(victim) => VictimRef {
            id: victim.identifier().map(str::to_string),
            name: victim.nome,
            nic: victim.nic,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawReport {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_timestamp_priority_prefers_domain_created_at() {
        let report = raw(json!({
            "criadoEm": "2024-05-01T10:00:00Z",
            "dataEmissao": "2024-03-01",
            "createdAt": "2024-01-01"
        }));
        assert_eq!(
            resolve_timestamp(&report),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );

        let report = raw(json!({ "dataEmissao": "2024-03-01", "createdAt": "2024-01-01" }));
        assert_eq!(
            resolve_timestamp(&report),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_first_field_does_not_fall_through() {
        let report = raw(json!({ "criadoEm": "ontem", "createdAt": "2024-01-01" }));
        assert_eq!(resolve_timestamp(&report), None);
    }

    #[test]
    fn test_blank_field_counts_as_absent() {
        let report = raw(json!({ "criadoEm": "  ", "createdAt": "2024-01-01" }));
        assert_eq!(
            resolve_timestamp(&report),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap();
        for text in [
            "2024-02-01T12:30:00Z",
            "2024-02-01T09:30:00-03:00",
            "2024-02-01T12:30:00",
            "2024-02-01T12:30:00.000",
            "2024-02-01 12:30:00",
        ] {
            assert_eq!(
                parse_timestamp(&RawTimestamp::Text(text.to_string())),
                Some(expected),
                "failed on {}",
                text
            );
        }
        assert_eq!(
            parse_timestamp(&RawTimestamp::Millis(expected.timestamp_millis())),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&RawTimestamp::Text("01/02/2024".to_string())),
            None
        );
    }

    #[test]
    fn test_body_resolution_order() {
        let report = raw(json!({ "observacoes": "obs", "parecer": "parecer" }));
        assert_eq!(resolve_body(&report).as_deref(), Some("obs"));

        let report = raw(json!({ "texto": "", "parecer": "parecer" }));
        assert_eq!(resolve_body(&report).as_deref(), Some("parecer"));

        assert_eq!(resolve_body(&raw(json!({}))), None);
    }

    #[test]
    fn test_author_skips_bare_ids() {
        let report = raw(json!({
            "autor": "u1",
            "perito": { "name": "Dr. Paulo", "role": "perito" }
        }));
        assert_eq!(
            resolve_author(&report),
            Some(ReportAuthor {
                name: "Dr. Paulo".to_string(),
                role: Some("perito".to_string()),
            })
        );
    }

    #[test]
    fn test_normalize_keeps_links_for_matching_kind_only() {
        let doc = json!({
            "_id": "x1",
            "vitima": { "_id": "v1", "nome": "Maria", "nic": "NIC-9" },
            "evidencias": ["ev1", "ev2"]
        });

        let dental = normalize(ReportKind::DentalReport, raw(doc.clone()), "c1");
        assert_eq!(dental.victim.and_then(|v| v.nic).as_deref(), Some("NIC-9"));
        assert!(dental.evidence_ids.is_empty());

        let evidence = normalize(ReportKind::EvidenceReport, raw(doc), "c1");
        assert!(evidence.victim.is_none());
        assert_eq!(evidence.evidence_ids, vec!["ev1", "ev2"]);
        assert_eq!(evidence.case_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_normalize_id_prefers_object_id() {
        let report = normalize(
            ReportKind::EvidenceReport,
            raw(json!({ "_id": "e1", "id": "e1-virtual", "evidencias": [null, "ev1"] })),
            "c1",
        );
        assert_eq!(report.id, "e1");
        assert_eq!(report.evidence_ids, vec!["ev1"]);

        let report = normalize(ReportKind::EvidenceReport, raw(json!({ "id": "e2" })), "c1");
        assert_eq!(report.id, "e2");
    }

    #[test]
    fn test_normalize_prefers_document_case() {
        let report = normalize(
            ReportKind::FinalReport,
            raw(json!({ "_id": "f1", "caso": { "_id": "c9" }, "titulo": " " })),
            "c1",
        );
        assert_eq!(report.case_id.as_deref(), Some("c9"));
        assert_eq!(report.title, None);
        assert_eq!(report.kind, ReportKind::FinalReport);
    }
}
