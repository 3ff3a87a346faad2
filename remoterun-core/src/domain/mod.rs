//! Core domain types
//!
//! This module contains the core domain structures used by the remoterun service.
//! A `Batch` is what the caller submits; a `BatchRun` is what the server tracks
//! once the batch has been accepted.

pub mod command;
pub mod run;
