//! Workflow domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the store, storage and
//!   transfer layers.
//! - Keep one typed config union for every step type.
//!
//! # Invariants
//! - Every workflow, node and edge is identified by a stable UUID.
//! - Step configs are decoded against their declared step type.

pub mod step;
pub mod ui_state;
pub mod workflow;
