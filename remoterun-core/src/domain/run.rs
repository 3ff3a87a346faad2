//! Batch run domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Execution record of an accepted batch
///
/// Created by the submission path, mutated only by the process runner that owns
/// the batch's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    pub id: Uuid,
    pub log_path: String,
    pub status: RunStatus,
    pub command_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl BatchRun {
    /// Creates a run in the `Pending` state
    pub fn new(id: Uuid, log_path: String, command_count: usize) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            log_path,
            status: RunStatus::Pending,
            command_count,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Batch run lifecycle status
///
/// `Pending -> Running -> Completed | Failed`. Both `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// Whether a run in `self` may move to `next`
    pub fn can_transition_to(self, next: RunStatus) -> bool {
        match (self, next) {
            (RunStatus::Pending, RunStatus::Running) => true,
            // a batch whose first launch fails goes straight to failed
            (RunStatus::Pending, RunStatus::Failed) => true,
            (RunStatus::Running, RunStatus::Completed | RunStatus::Failed) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_pending() {
        let run = BatchRun::new(Uuid::new_v4(), "logs/x.log".to_string(), 2);
        assert_eq!(run.status, RunStatus::Pending);
        assert_eq!(run.created_at, run.updated_at);
    }

    #[test]
    fn test_terminal_states_do_not_transition() {
        for terminal in [RunStatus::Completed, RunStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                RunStatus::Pending,
                RunStatus::Running,
                RunStatus::Completed,
                RunStatus::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_valid_transitions() {
        assert!(RunStatus::Pending.can_transition_to(RunStatus::Running));
        assert!(RunStatus::Running.can_transition_to(RunStatus::Completed));
        assert!(RunStatus::Running.can_transition_to(RunStatus::Failed));
        assert!(!RunStatus::Pending.can_transition_to(RunStatus::Completed));
        assert!(!RunStatus::Running.can_transition_to(RunStatus::Pending));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RunStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
