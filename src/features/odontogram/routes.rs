use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::odontogram::handlers;
use crate::features::odontogram::services::OdontogramService;

/// Victim chart routes; auth middleware is applied by the caller
pub fn routes(service: Arc<OdontogramService>) -> Router {
    Router::new()
        .route(
            "/api/victims/{victim_id}/odontogram",
            get(handlers::get_odontogram),
        )
        .route(
            "/api/victims/{victim_id}/odontogram/teeth/{number}",
            get(handlers::get_tooth).put(handlers::update_tooth),
        )
        .with_state(service)
}

/// Public legend route
pub fn public_routes() -> Router {
    Router::new().route("/api/odontogram/legend", get(handlers::get_legend))
}
