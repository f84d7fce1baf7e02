//! Graph connection rules over the workflow model.
//!
//! # Responsibility
//! - Derive node handle layout from step type and subtype.
//! - Resolve requested connections to concrete handles.
//! - Infer semantic edge labels from handle ids and source subtypes.
//!
//! # Invariants
//! - Handle layout is a pure function of the node step config.
//! - Label inference never overrides a caller-provided label.

pub mod edge_label;
pub mod handles;
