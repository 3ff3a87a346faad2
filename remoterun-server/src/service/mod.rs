//! Service Module
//!
//! Business logic layer for the server.
//! Services orchestrate between the repositories and the process runner.

pub mod retrieval;
pub mod runner;
pub mod submission;

// Re-export for convenience
pub use retrieval as retrieval_service;
pub use runner::{ProcessRunner, StandardProcessRunner};
pub use submission as submission_service;
