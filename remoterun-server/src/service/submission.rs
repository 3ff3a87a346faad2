//! Submission Service
//!
//! Accepts a task list: validates and orders it, allocates an identifier and
//! log file, registers the run and hands it to the process runner in the
//! background. Returns as soon as the run is registered.

use remoterun_core::domain::run::BatchRun;
use remoterun_core::dto::task::CommandRequest;
use remoterun_core::sequencer::sequence;
use remoterun_core::validation::{ValidationError, validate_batch};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::repository::log_sink::log_path;
use crate::repository::{LogSink, RegistryError, SinkError};
use crate::state::AppState;

/// Service error type
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to create log directory")]
    LogDirectory(#[source] std::io::Error),

    #[error("Failed to create log file")]
    LogFile(#[source] SinkError),

    #[error("Failed to register task")]
    Registration(#[source] RegistryError),
}

/// An accepted task list
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub log_path: PathBuf,
}

/// Validates, registers and starts a task list
///
/// Nothing is launched and nothing is written to disk unless validation passes.
pub async fn submit(
    state: &AppState,
    requests: Vec<CommandRequest>,
) -> Result<Submission, SubmitError> {
    let batch = sequence(validate_batch(requests)?);

    tokio::fs::create_dir_all(state.logs_dir())
        .await
        .map_err(SubmitError::LogDirectory)?;

    let id = Uuid::new_v4();
    let path = log_path(state.logs_dir(), id);

    // create-new: an existing file means the identifier was already issued
    let sink = LogSink::create(path.clone())
        .await
        .map_err(SubmitError::LogFile)?;

    let run = BatchRun::new(id, path.display().to_string(), batch.len());
    if let Err(e) = state.registry.insert(run) {
        if let Err(close_err) = sink.close().await {
            tracing::warn!("Failed to close orphaned log file {:?}: {}", path, close_err);
        }
        if let Err(remove_err) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to remove orphaned log file {:?}: {}", path, remove_err);
        }
        return Err(SubmitError::Registration(e));
    }

    tracing::info!("Task {} accepted with {} command(s)", id, batch.len());

    let runner = Arc::clone(&state.runner);
    let sink = Arc::new(sink);
    tokio::spawn(async move {
        runner.run_batch(id, batch, sink).await;
    });

    Ok(Submission { id, log_path: path })
}
