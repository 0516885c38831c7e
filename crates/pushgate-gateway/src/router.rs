//! Axum router wiring.
//!
//! Push on `/collectd`, scrape on `/metrics`, plus the operational routes.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let max_body = state.cfg().bridge.max_body_bytes;
    Router::new()
        .route("/", get(ops::index))
        .route("/collectd", post(transport::push::push))
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}
