//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod task;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/ping", get(health::ping))
        // Task endpoints
        .route("/tasks/run", post(task::run_tasks))
        .route("/tasks/getlogs", get(task::get_logs))
        .route("/tasks/status", get(task::get_status))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
