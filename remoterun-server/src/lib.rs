//! Remoterun Server
//!
//! Accepts task lists over HTTP, runs their commands on this host one after
//! another and keeps each list's combined output in a log file that clients
//! poll by identifier.
//!
//! Architecture:
//! - API: axum handlers and error mapping
//! - Services: submission, process runner, log retrieval
//! - Repositories: batch run registry and per-run log sinks

pub mod api;
pub mod config;
pub mod repository;
pub mod service;
pub mod state;
