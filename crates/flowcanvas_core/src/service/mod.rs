//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations with storage and file transfer.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod workflow_editor;
