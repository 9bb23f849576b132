use std::sync::Arc;
use std::time::Duration;

use crate::core::error::Result;
use crate::features::auth::Credential;
use crate::features::reports::models::{Report, ReportKind};
use crate::features::reports::services::normalizer::normalize;
use crate::features::reports::services::report_feed_cache::ReportFeedCache;
use crate::modules::case_api::{CaseApi, CaseApiError, CreateReportRequest, RawReport};

/// One aggregation run. `complete` is false when any source failed.
struct Feed {
    reports: Vec<Report>,
    complete: bool,
}

/// What one source adds to the feed
struct Contribution {
    reports: Vec<Report>,
    failed: bool,
}

/// Builds the unified, newest-first report feed of a case
pub struct ReportAggregator {
    case_api: Arc<dyn CaseApi>,
    feed_cache: ReportFeedCache,
}

impl ReportAggregator {
    pub fn new(case_api: Arc<dyn CaseApi>, feed_cache_ttl: Duration) -> Self {
        Self {
            case_api,
            feed_cache: ReportFeedCache::new(feed_cache_ttl),
        }
    }

    /// Fetch the three report sources concurrently and merge them.
    ///
    /// A failing source contributes nothing; the call itself never fails.
    pub async fn aggregate_reports(&self, credential: &Credential, case_id: &str) -> Vec<Report> {
        self.fetch_feed(credential, case_id).await.reports
    }

    async fn fetch_feed(&self, credential: &Credential, case_id: &str) -> Feed {
        let (evidence, dental, final_reports) = futures::join!(
            self.case_api.list_evidence_laudos(credential, case_id),
            self.case_api.list_dental_laudos(credential, case_id),
            self.case_api.get_final_reports(credential, case_id),
        );

        let evidence = contribution(ReportKind::EvidenceReport, case_id, evidence);
        let dental = contribution(ReportKind::DentalReport, case_id, dental);
        let final_reports = contribution(ReportKind::FinalReport, case_id, final_reports);
        let complete = !(evidence.failed || dental.failed || final_reports.failed);

        let reports = merge_reports(evidence.reports, dental.reports, final_reports.reports);

        tracing::debug!("Aggregated {} reports for case {}", reports.len(), case_id);
        Feed { reports, complete }
    }

    /// Report feed for a case, served from the snapshot cache unless `refresh` is set
    pub async fn list_reports(
        &self,
        credential: &Credential,
        case_id: &str,
        refresh: bool,
    ) -> Vec<Report> {
        if !refresh {
            if let Some(reports) = self.feed_cache.get(credential, case_id).await {
                return reports;
            }
        }

        let feed = self.fetch_feed(credential, case_id).await;
        if feed.complete {
            self.feed_cache.store(credential, case_id, &feed.reports).await;
        } else if self.feed_cache.is_enabled() {
            tracing::debug!("Not caching partial report feed of case {}", case_id);
        }
        feed.reports
    }

    /// Create a report upstream and insert it at the head of the cached feed.
    ///
    /// The request must already be validated.
    pub async fn create_report(
        &self,
        credential: &Credential,
        case_id: &str,
        request: CreateReportRequest,
    ) -> Result<Report> {
        let kind = request_kind(&request);
        let raw = self
            .case_api
            .create_report(credential, &request)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create {} for case {}: {}", kind, case_id, e);
                e
            })?;

        let report = normalize(kind, raw, case_id);
        tracing::info!("Created {} {} for case {}", kind, report.id, case_id);

        if self
            .feed_cache
            .prepend(credential, case_id, report.clone())
            .await
        {
            tracing::debug!("Inserted report {} into cached feed of case {}", report.id, case_id);
        }

        Ok(report)
    }
}

/// Concatenate evidence, dental and final reports, then sort newest first.
///
/// The sort is stable, so reports with equal timestamps keep their source
/// order, and reports without a timestamp end up last.
pub fn merge_reports(
    evidence: Vec<Report>,
    dental: Vec<Report>,
    final_reports: Vec<Report>,
) -> Vec<Report> {
    let mut reports = evidence;
    reports.extend(dental);
    reports.extend(final_reports);
    reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    reports
}

/// A missing collection is an empty source, not a failed one
fn contribution(
    kind: ReportKind,
    case_id: &str,
    fetched: std::result::Result<Vec<RawReport>, CaseApiError>,
) -> Contribution {
    match fetched {
        Ok(raw) => Contribution {
            reports: raw
                .into_iter()
                .map(|report| normalize(kind, report, case_id))
                .collect(),
            failed: false,
        },
        Err(CaseApiError::NotFound(_)) => {
            tracing::debug!("No {} found for case {}", kind, case_id);
            Contribution {
                reports: Vec::new(),
                failed: false,
            }
        }
        Err(e) => {
            tracing::warn!("Skipping {} for case {}: {}", kind, case_id, e);
            Contribution {
                reports: Vec::new(),
                failed: true,
            }
        }
    }
}

fn request_kind(request: &CreateReportRequest) -> ReportKind {
    match request {
        CreateReportRequest::EvidenceLaudo { .. } => ReportKind::EvidenceReport,
        CreateReportRequest::DentalLaudo { .. } => ReportKind::DentalReport,
        CreateReportRequest::FinalReport { .. } => ReportKind::FinalReport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::FakeCaseApi;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn report(id: &str, kind: ReportKind, timestamp: Option<(i32, u32, u32)>) -> Report {
        Report {
            id: id.to_string(),
            kind,
            title: None,
            body: None,
            timestamp: timestamp.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()),
            author: None,
            status: None,
            case_id: Some("c1".to_string()),
            victim: None,
            evidence_ids: Vec::new(),
        }
    }

    fn ids(reports: &[Report]) -> Vec<&str> {
        reports.iter().map(|r| r.id.as_str()).collect()
    }

    fn aggregator(fake: FakeCaseApi, ttl: Duration) -> (Arc<FakeCaseApi>, ReportAggregator) {
        let fake = Arc::new(fake);
        let aggregator = ReportAggregator::new(fake.clone(), ttl);
        (fake, aggregator)
    }

    #[test]
    fn test_merge_preserves_every_item_and_kind() {
        let merged = merge_reports(
            vec![
                report("e1", ReportKind::EvidenceReport, Some((2024, 1, 1))),
                report("e2", ReportKind::EvidenceReport, None),
            ],
            vec![report("d1", ReportKind::DentalReport, Some((2024, 3, 1)))],
            vec![report("f1", ReportKind::FinalReport, Some((2024, 2, 1)))],
        );

        assert_eq!(merged.len(), 4);
        assert_eq!(ids(&merged), vec!["d1", "f1", "e1", "e2"]);
        let kind_of = |id: &str| merged.iter().find(|r| r.id == id).map(|r| r.kind);
        assert_eq!(kind_of("e2"), Some(ReportKind::EvidenceReport));
        assert_eq!(kind_of("d1"), Some(ReportKind::DentalReport));
        assert_eq!(kind_of("f1"), Some(ReportKind::FinalReport));
    }

    #[test]
    fn test_merge_is_stable_for_equal_timestamps() {
        let merged = merge_reports(
            vec![report("e1", ReportKind::EvidenceReport, Some((2024, 1, 1)))],
            vec![report("d1", ReportKind::DentalReport, Some((2024, 1, 1)))],
            vec![report("f1", ReportKind::FinalReport, Some((2024, 1, 1)))],
        );
        assert_eq!(ids(&merged), vec!["e1", "d1", "f1"]);

        let undated = merge_reports(
            vec![report("e1", ReportKind::EvidenceReport, None)],
            vec![report("d1", ReportKind::DentalReport, None)],
            vec![],
        );
        assert_eq!(ids(&undated), vec!["e1", "d1"]);
    }

    #[test]
    fn test_merge_output_is_non_increasing() {
        let merged = merge_reports(
            vec![
                report("e1", ReportKind::EvidenceReport, Some((2023, 6, 1))),
                report("e2", ReportKind::EvidenceReport, Some((2024, 6, 1))),
            ],
            vec![
                report("d1", ReportKind::DentalReport, None),
                report("d2", ReportKind::DentalReport, Some((2022, 1, 1))),
            ],
            vec![report("f1", ReportKind::FinalReport, Some((2025, 1, 1)))],
        );

        assert!(merged
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp));
    }

    #[tokio::test]
    async fn test_aggregate_end_to_end_ordering() {
        let fake = FakeCaseApi::new()
            .with_evidence(json!([{ "_id": "e1", "texto": "A", "createdAt": "2024-01-01" }]))
            .with_dental(json!([{ "_id": "d1", "parecer": "B", "dataEmissao": "2024-03-01" }]))
            .with_final_report(json!({ "_id": "f1", "texto": "C", "createdAt": "2024-02-01" }));
        let (_, aggregator) = aggregator(fake, Duration::ZERO);

        let reports = aggregator
            .aggregate_reports(&Credential::new("t"), "c1")
            .await;

        assert_eq!(ids(&reports), vec!["d1", "f1", "e1"]);
        let bodies: Vec<_> = reports.iter().map(|r| r.body.as_deref()).collect();
        assert_eq!(bodies, vec![Some("B"), Some("C"), Some("A")]);
        assert_eq!(reports[0].kind, ReportKind::DentalReport);
    }

    #[tokio::test]
    async fn test_failing_source_contributes_nothing() {
        let fake = FakeCaseApi::new()
            .with_evidence(json!([{ "_id": "e1", "texto": "A", "createdAt": "2024-01-01" }]))
            .with_dental_error(CaseApiError::Status {
                status: 500,
                body: "boom".to_string(),
            })
            .with_final_report(json!({ "_id": "f1", "texto": "C", "createdAt": "2024-02-01" }));
        let (_, aggregator) = aggregator(fake, Duration::ZERO);

        let reports = aggregator
            .aggregate_reports(&Credential::new("t"), "c1")
            .await;

        assert_eq!(ids(&reports), vec!["f1", "e1"]);
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_feed() {
        let fake = FakeCaseApi::new()
            .with_evidence_error(CaseApiError::Transport("timeout".to_string()))
            .with_dental_error(CaseApiError::Decode("bad json".to_string()))
            .with_final_report_error(CaseApiError::NotFound("/api/relatorios/c1".to_string()));
        let (_, aggregator) = aggregator(fake, Duration::ZERO);

        let reports = aggregator
            .aggregate_reports(&Credential::new("t"), "c1")
            .await;

        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn test_list_reports_uses_snapshot_until_refresh() {
        let fake = FakeCaseApi::new()
            .with_evidence(json!([{ "_id": "e1", "createdAt": "2024-01-01" }]));
        let (fake, aggregator) = aggregator(fake, Duration::from_secs(60));
        let credential = Credential::new("t");

        aggregator.list_reports(&credential, "c1", false).await;
        aggregator.list_reports(&credential, "c1", false).await;
        assert_eq!(fake.evidence_fetches(), 1);

        aggregator.list_reports(&credential, "c1", true).await;
        assert_eq!(fake.evidence_fetches(), 2);
    }

    #[tokio::test]
    async fn test_partial_feed_is_not_cached() {
        let fake = FakeCaseApi::new()
            .with_evidence(json!([{ "_id": "e1", "createdAt": "2024-01-01" }]))
            .with_dental_error(CaseApiError::Unauthorized(
                "HTTP 401 from /api/laudos-odontologicos".to_string(),
            ));
        let (fake, aggregator) = aggregator(fake, Duration::from_secs(60));
        let credential = Credential::new("t");

        let first = aggregator.list_reports(&credential, "c1", false).await;
        let second = aggregator.list_reports(&credential, "c1", false).await;

        assert_eq!(ids(&first), vec!["e1"]);
        assert_eq!(ids(&second), vec!["e1"]);
        assert_eq!(fake.evidence_fetches(), 2);
    }

    #[tokio::test]
    async fn test_missing_final_report_still_caches_feed() {
        let fake = FakeCaseApi::new()
            .with_evidence(json!([{ "_id": "e1", "createdAt": "2024-01-01" }]))
            .with_final_report_error(CaseApiError::NotFound("/api/relatorios/c1".to_string()));
        let (fake, aggregator) = aggregator(fake, Duration::from_secs(60));
        let credential = Credential::new("t");

        aggregator.list_reports(&credential, "c1", false).await;
        aggregator.list_reports(&credential, "c1", false).await;
        assert_eq!(fake.evidence_fetches(), 1);
    }

    #[tokio::test]
    async fn test_list_reports_without_cache_always_fetches() {
        let (fake, aggregator) = aggregator(FakeCaseApi::new(), Duration::ZERO);
        let credential = Credential::new("t");

        aggregator.list_reports(&credential, "c1", false).await;
        aggregator.list_reports(&credential, "c1", false).await;
        assert_eq!(fake.evidence_fetches(), 2);
    }

    #[tokio::test]
    async fn test_create_report_prepends_to_cached_feed() {
        let fake = FakeCaseApi::new()
            .with_evidence(json!([{ "_id": "e1", "createdAt": "2024-01-01" }]));
        let (fake, aggregator) = aggregator(fake, Duration::from_secs(60));
        let credential = Credential::new("t");

        aggregator.list_reports(&credential, "c1", false).await;

        let created = aggregator
            .create_report(
                &credential,
                "c1",
                CreateReportRequest::FinalReport {
                    case_id: "c1".to_string(),
                    title: "Conclusão".to_string(),
                    text: "Identificação positiva".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.kind, ReportKind::FinalReport);
        assert_eq!(created.title.as_deref(), Some("Conclusão"));
        assert_eq!(created.body.as_deref(), Some("Identificação positiva"));

        let feed = aggregator.list_reports(&credential, "c1", false).await;
        assert_eq!(ids(&feed), vec![created.id.as_str(), "e1"]);
        assert_eq!(fake.evidence_fetches(), 1);
        assert_eq!(fake.created_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_create_report_propagates_upstream_failure() {
        let fake = FakeCaseApi::new().with_create_error(CaseApiError::Unauthorized(
            "HTTP 401 from /api/laudos".to_string(),
        ));
        let (_, aggregator) = aggregator(fake, Duration::ZERO);

        let result = aggregator
            .create_report(
                &Credential::new("t"),
                "c1",
                CreateReportRequest::EvidenceLaudo {
                    case_id: "c1".to_string(),
                    evidence_ids: vec!["ev1".to_string()],
                    text: "Lesão".to_string(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(crate::core::error::AppError::Unauthorized(_))
        ));
    }
}
