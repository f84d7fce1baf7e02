//! Workflow file export and import.

pub mod workflow_file;
