//! Health Check API Handler
//!
//! Simple liveness endpoint for monitoring.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /ping
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}
