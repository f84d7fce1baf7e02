//! Core domain logic for the FlowCanvas workflow editor.
//! This crate is the single source of truth for workflow graph invariants.

pub mod catalog;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod validation;

pub use catalog::steps::{find_step, step_categories, StepMetadata, AVAILABLE_STEPS};
pub use graph::edge_label::{outgoing_edge_labels, resolve_edge_label, EdgeLabelItem};
pub use graph::handles::{resolve_connection, ConnectionError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::step::{BaseStepConfig, EdgeLabelConfig, StepConfig, StepConfigError, StepType};
pub use model::ui_state::WorkflowUiState;
pub use model::workflow::{
    EdgeId, NodeId, Position, Workflow, WorkflowEdge, WorkflowId, WorkflowNode,
};
pub use service::workflow_editor::{EditorError, EditorResult, WorkflowEditor};
pub use storage::workflow_storage::{
    SqliteWorkflowStorage, StorageError, StorageResult, WorkflowStorage,
};
pub use store::workflow_store::{
    AddEdgeRequest, AddNodeRequest, NodeUpdate, StoreError, StoreResult, WorkflowMetadataPatch,
    WorkflowStore,
};
pub use transfer::workflow_file::{export_workflow, import_workflow, TransferError};
pub use validation::report::{validate_workflow, ValidationIssue, ValidationIssueKind};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
