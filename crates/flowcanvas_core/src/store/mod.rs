//! Reducer-style editor state.

pub mod workflow_store;
