//! Static step palette and editor rules.
//!
//! # Responsibility
//! - Describe every palette step (label, icon id, color, category).
//! - Hold per-type defaults, connection rules and validation limits.
//!
//! # Invariants
//! - Every palette entry references a subtype declared for its step type.
//! - Catalog data is immutable at runtime.

pub mod rules;
pub mod steps;
