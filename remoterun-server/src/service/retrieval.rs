//! Log Retrieval Service
//!
//! Resolves a run identifier to its log file and returns the current
//! content. Runs that are still executing return whatever has been written
//! so far.

use remoterun_core::domain::run::BatchRun;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::repository::SinkError;
use crate::repository::log_sink::{log_path, read_log};
use crate::state::AppState;

/// Service error type
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Task not found")]
    NotFound(String),

    #[error("Failed to open log file")]
    Open(#[source] std::io::Error),

    #[error("Failed to read log file")]
    Read(#[source] SinkError),
}

pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Parses a caller-supplied identifier; anything that is not a UUID was never issued
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RetrievalError::NotFound(raw.to_string()))
}

/// Get the registered run record
pub fn get_run(state: &AppState, id: Uuid) -> Result<BatchRun> {
    state
        .registry
        .get(id)
        .ok_or_else(|| RetrievalError::NotFound(id.to_string()))
}

/// Get the current log content of a run as text
pub async fn get_log(state: &AppState, id: Uuid) -> Result<String> {
    let path = resolve_log_path(state, id);

    let content = read_log(&path).await.map_err(|e| match e {
        SinkError::Missing(_) => RetrievalError::NotFound(id.to_string()),
        SinkError::Open(source) => RetrievalError::Open(source),
        other => RetrievalError::Read(other),
    })?;

    tracing::debug!("Read {} byte(s) of log for task {}", content.len(), id);

    Ok(String::from_utf8_lossy(&content).into_owned())
}

/// Registered runs use their recorded path; runs from an earlier server
/// process fall back to the fixed `<logs_dir>/<id>.log` layout.
fn resolve_log_path(state: &AppState, id: Uuid) -> PathBuf {
    match state.registry.get(id) {
        Some(run) => PathBuf::from(run.log_path),
        None => log_path(state.logs_dir(), id),
    }
}
