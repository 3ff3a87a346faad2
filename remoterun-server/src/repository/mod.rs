//! Repository Module
//!
//! Storage layer for the server: the registry of batch runs and the
//! per-run log files.

pub mod log_sink;
pub mod registry;

pub use log_sink::{LogSink, SinkError};
pub use registry::{BatchRegistry, InMemoryBatchRegistry, RegistryError};
