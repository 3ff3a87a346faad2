//! Task API Handlers
//!
//! HTTP endpoints for submitting task lists and reading their logs.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use remoterun_core::domain::run::BatchRun;
use remoterun_core::dto::task::{CommandRequest, LogResponse, SubmitResponse, TaskQuery};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::service::{retrieval_service, submission_service};
use crate::state::AppState;

/// POST /tasks/run
/// Accept a task list and start executing it in the background
pub async fn run_tasks(
    State(state): State<AppState>,
    payload: Result<Json<Vec<CommandRequest>>, JsonRejection>,
) -> ApiResult<Json<SubmitResponse>> {
    let Json(requests) = payload.map_err(|rejection| {
        tracing::debug!("Rejected task list: {}", rejection);
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    tracing::info!("Submitting task list with {} command(s)", requests.len());

    let submission = submission_service::submit(&state, requests).await?;

    Ok(Json(SubmitResponse {
        task_id: submission.id,
        log_file_path: submission.log_path.display().to_string(),
    }))
}

/// GET /tasks/getlogs?taskid={id}
/// Get the current log content of a task list
pub async fn get_logs(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<LogResponse>> {
    let id = required_task_id(query)?;
    tracing::debug!("Getting logs for task: {}", id);

    let logs = retrieval_service::get_log(&state, id).await?;

    Ok(Json(LogResponse { task_id: id, logs }))
}

/// GET /tasks/status?taskid={id}
/// Get the run record of a task list
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<BatchRun>> {
    let id = required_task_id(query)?;
    tracing::debug!("Getting status for task: {}", id);

    let run = retrieval_service::get_run(&state, id)?;

    Ok(Json(run))
}

fn required_task_id(query: TaskQuery) -> ApiResult<Uuid> {
    match query.taskid.as_deref() {
        None | Some("") => Err(ApiError::BadRequest("taskid is required".to_string())),
        Some(raw) => Ok(retrieval_service::parse_id(raw)?),
    }
}
