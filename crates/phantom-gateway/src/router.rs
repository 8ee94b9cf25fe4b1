//! Axum router wiring.
//!
//! Ops routes are matched first; every other path and method falls through
//! to the ingest handler.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .fallback(transport::http::ingest)
        .with_state(state)
}
