use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportAggregator;

/// Case report routes; auth middleware is applied by the caller
pub fn routes(aggregator: Arc<ReportAggregator>) -> Router {
    let state = ReportState { aggregator };

    Router::new()
        .route(
            "/api/cases/{case_id}/reports",
            get(handlers::list_case_reports).post(handlers::create_case_report),
        )
        .with_state(state)
}

/// Public report metadata routes
pub fn public_routes() -> Router {
    Router::new().route("/api/reports/kinds", get(handlers::list_report_kinds))
}
