//! Local persistence for workflows and the current-workflow pointer.
//!
//! # Responsibility
//! - Define the storage contract the editor service depends on.
//! - Keep SQL and JSON encoding details behind that contract.
//!
//! # Invariants
//! - Stored values are JSON text under fixed keys.
//! - Read paths report corrupt values instead of masking them.

pub mod workflow_storage;
