//! Task DTOs

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One entry of a submitted task list, as sent by the client
///
/// A missing or `null` command decodes to an empty string so validation can
/// report it as an empty command; missing or `null` args mean no arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub command: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Vec<String>,
    pub order: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CommandRequest {
    pub fn new(command: impl Into<String>, args: &[&str], order: i64) -> Self {
        Self {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            order,
        }
    }
}

/// Response to an accepted task list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub task_id: Uuid,
    pub log_file_path: String,
}

/// Current log contents of a task list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    pub task_id: Uuid,
    pub logs: String,
}

/// Query string carrying the task identifier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQuery {
    pub taskid: Option<String>,
}
