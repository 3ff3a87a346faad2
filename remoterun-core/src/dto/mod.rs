//! Data Transfer Objects for the HTTP interface
//!
//! Wire shapes accepted and returned by the remoterun server. These stay
//! separate from the domain types so the domain can enforce its invariants
//! while the wire format stays lenient enough to report precise errors.

pub mod task;
