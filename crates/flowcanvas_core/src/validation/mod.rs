//! Advisory workflow checks shown by the editor.
//!
//! # Invariants
//! - Reports never block or alter a mutation.

pub mod report;
