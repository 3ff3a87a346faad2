//! Shared application state handed to every request handler

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::repository::{BatchRegistry, InMemoryBatchRegistry};
use crate::service::{ProcessRunner, StandardProcessRunner};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn BatchRegistry>,
    pub runner: Arc<dyn ProcessRunner>,
    logs_dir: Arc<PathBuf>,
}

impl AppState {
    /// Builds the production state: in-memory registry and child-process runner
    pub fn new(config: &Config) -> Self {
        let registry: Arc<dyn BatchRegistry> = Arc::new(InMemoryBatchRegistry::new());
        let runner = Arc::new(StandardProcessRunner::new(Arc::clone(&registry)));
        Self::with_parts(registry, runner, config.logs_dir.clone())
    }

    pub fn with_parts(
        registry: Arc<dyn BatchRegistry>,
        runner: Arc<dyn ProcessRunner>,
        logs_dir: PathBuf,
    ) -> Self {
        Self {
            registry,
            runner,
            logs_dir: Arc::new(logs_dir),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }
}
