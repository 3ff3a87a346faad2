//! Batch Registry
//!
//! Maps issued run identifiers to their `BatchRun` record. The only state
//! shared between runs: submissions insert concurrently, the process runner
//! updates status, retrieval reads.

use remoterun_core::domain::run::{BatchRun, RunStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use uuid::Uuid;

/// Registry error type
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("run {0} is already registered")]
    DuplicateId(Uuid),

    #[error("run {0} not found")]
    NotFound(Uuid),

    #[error("run {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: Uuid,
        from: RunStatus,
        to: RunStatus,
    },
}

/// Store of batch run records
///
/// Trait-based so a durable store can replace the in-memory one.
pub trait BatchRegistry: Send + Sync {
    /// Registers a new run; identifiers are never reused
    fn insert(&self, run: BatchRun) -> Result<(), RegistryError>;

    /// Returns a snapshot of a run
    fn get(&self, id: Uuid) -> Option<BatchRun>;

    /// Moves a run to `status` and stamps `updated_at`
    fn update_status(&self, id: Uuid, status: RunStatus) -> Result<BatchRun, RegistryError>;
}

/// In-memory implementation of BatchRegistry
///
/// Entries are whole values swapped under a write lock, so readers never see a
/// half-updated record.
#[derive(Clone, Default)]
pub struct InMemoryBatchRegistry {
    runs: Arc<RwLock<HashMap<Uuid, BatchRun>>>,
}

impl InMemoryBatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave an entry half-written, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, BatchRun>> {
        self.runs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, BatchRun>> {
        self.runs.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl BatchRegistry for InMemoryBatchRegistry {
    fn insert(&self, run: BatchRun) -> Result<(), RegistryError> {
        let mut runs = self.write();
        if runs.contains_key(&run.id) {
            return Err(RegistryError::DuplicateId(run.id));
        }
        runs.insert(run.id, run);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Option<BatchRun> {
        self.read().get(&id).cloned()
    }

    fn update_status(&self, id: Uuid, status: RunStatus) -> Result<BatchRun, RegistryError> {
        let mut runs = self.write();
        let run = runs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if !run.status.can_transition_to(status) {
            return Err(RegistryError::InvalidTransition {
                id,
                from: run.status,
                to: status,
            });
        }

        run.status = status;
        run.updated_at = chrono::Utc::now();
        Ok(run.clone())
    }
}
