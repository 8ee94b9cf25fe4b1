//! HTTP glue for the ingest handler.
//!
//! Maps handler outcomes to responses: 200 (empty or bulk ack) on success,
//! 400 with the error text as a plain body otherwise.

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use phantom_core::error::PhantomError;
use serde_json::json;

use crate::app_state::AppState;
use crate::config::ResponseMode;

/// Synthetic bulk-index acknowledgment returned in `bulk_ack` mode.
pub fn bulk_ack_json() -> String {
    json!({
        "took": 0,
        "errors": false,
        "items": []
    })
    .to_string()
}

pub fn error_response(err: &PhantomError) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("{err}\n"),
    )
        .into_response()
}

// --------------------
// Entry (catch-all route, any method)
// --------------------
pub async fn ingest(State(app): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let handler = app.ingest();
    match handler.handle(&headers, body).await {
        Ok(_) => match handler.settings().response {
            ResponseMode::Empty => StatusCode::OK.into_response(),
            ResponseMode::BulkAck => (
                StatusCode::OK,
                [(CONTENT_TYPE, "application/json")],
                bulk_ack_json(),
            )
                .into_response(),
        },
        Err(e) => {
            app.metrics()
                .posts_rejected
                .inc(&[("reason", e.client_code().as_str())]);
            error_response(&e)
        }
    }
}
