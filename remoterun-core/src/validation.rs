//! Batch validation
//!
//! Turns a raw task list into a [`Batch`]. Rules are checked in a fixed
//! priority so the reported error does not depend on where in the list the
//! problem sits: empty list, then empty command, then duplicate order.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::command::{Batch, CommandDescriptor};
use crate::dto::task::CommandRequest;

/// Reasons a task list is rejected before anything runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task list cannot be empty")]
    EmptyBatch,

    #[error("Command cannot be empty")]
    MissingCommand { index: usize },

    #[error("Duplicate order found")]
    DuplicateOrder { order: i64 },
}

/// Validates a raw task list
///
/// Pure: performs no I/O and launches nothing.
pub fn validate_batch(requests: Vec<CommandRequest>) -> Result<Batch, ValidationError> {
    if requests.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    if let Some(index) = requests.iter().position(|r| r.command.is_empty()) {
        return Err(ValidationError::MissingCommand { index });
    }

    let mut seen = HashSet::with_capacity(requests.len());
    for request in &requests {
        if !seen.insert(request.order) {
            return Err(ValidationError::DuplicateOrder {
                order: request.order,
            });
        }
    }

    let commands = requests
        .into_iter()
        .map(|r| CommandDescriptor::new(r.command, r.args, r.order))
        .collect();

    Ok(Batch::new(commands))
}
