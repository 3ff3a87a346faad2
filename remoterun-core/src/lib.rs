//! Remoterun Core
//!
//! Core types and pure logic for the remoterun task execution service.
//!
//! This crate contains:
//! - Domain types: Core business entities (CommandDescriptor, Batch, BatchRun)
//! - DTOs: Request and response bodies of the HTTP interface
//! - Validation and sequencing of submitted batches

pub mod domain;
pub mod dto;
pub mod sequencer;
pub mod validation;
