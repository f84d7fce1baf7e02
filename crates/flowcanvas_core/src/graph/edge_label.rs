//! Edge label inference and per-node label listing.
//!
//! # Invariants
//! - Rules are evaluated top to bottom; the first match wins.
//! - An explicit, non-empty label always wins over inference and is kept
//!   as given.
//! - A configured `edgeLabels` entry whose source handle equals the edge's
//!   wins over built-in decision labels. Unnamed handles match each other.
//! - Empty strings count as no label; other text is never trimmed.

use crate::graph::handles::{HANDLE_FALSE, HANDLE_TRUE};
use crate::model::step::{DecisionStepSubtype, StepConfig};
use crate::model::workflow::{EdgeId, NodeId, Workflow};

pub const LABEL_YES: &str = "Yes";
pub const LABEL_NO: &str = "No";
pub const LABEL_SUCCESS: &str = "Success";
pub const LABEL_ERROR: &str = "Error";
pub const LABEL_CLASSIFICATION_OUTPUT: &str = "Classification Output";
/// Target name shown when an edge points at a missing node.
pub const UNKNOWN_TARGET_NAME: &str = "Unknown Target";

/// Picks the label for a new edge leaving a node with `source` config.
///
/// Returns `None` when no rule applies and no label was given.
pub fn resolve_edge_label(
    explicit: Option<&str>,
    source: &StepConfig,
    source_handle: Option<&str>,
) -> Option<String> {
    if let Some(label) = explicit.filter(|value| !value.is_empty()) {
        return Some(label.to_string());
    }
    infer_edge_label(source, source_handle).map(str::to_string)
}

/// Infers a semantic label from the source step and the handle used.
pub fn infer_edge_label<'a>(source: &'a StepConfig, source_handle: Option<&str>) -> Option<&'a str> {
    if let Some(configured) = source
        .edge_labels()
        .iter()
        .find(|entry| entry.source_handle.as_deref() == source_handle)
        .filter(|entry| !entry.label.is_empty())
    {
        return Some(configured.label.as_str());
    }

    let subtype = source.decision_subtype()?;
    match (subtype, source_handle) {
        (DecisionStepSubtype::ConditionalBranch, _) => Some(LABEL_CLASSIFICATION_OUTPUT),
        (DecisionStepSubtype::TryCatch, Some(HANDLE_TRUE)) => Some(LABEL_SUCCESS),
        (DecisionStepSubtype::TryCatch, Some(HANDLE_FALSE)) => Some(LABEL_ERROR),
        (_, Some(HANDLE_TRUE)) => Some(LABEL_YES),
        (_, Some(HANDLE_FALSE)) => Some(LABEL_NO),
        _ => None,
    }
}

/// Editable label row for one outgoing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabelItem {
    pub edge_id: EdgeId,
    pub label: String,
    pub target_node_name: String,
}

/// Lists labels of edges leaving `node_id`.
///
/// Label precedence: config `edgeLabels` entry with the same edge id, then the
/// edge's own label, then empty.
pub fn outgoing_edge_labels(workflow: &Workflow, node_id: NodeId) -> Vec<EdgeLabelItem> {
    let configured = workflow
        .node(node_id)
        .map(|node| node.config().edge_labels())
        .unwrap_or(&[]);

    workflow
        .outgoing_edges(node_id)
        .map(|edge| {
            let edge_key = edge.id.to_string();
            let label = configured
                .iter()
                .find(|entry| entry.id == edge_key)
                .map(|entry| entry.label.as_str())
                .filter(|label| !label.is_empty())
                .or_else(|| edge.label())
                .unwrap_or_default()
                .to_string();
            let target_node_name = workflow
                .node(edge.target)
                .map(|node| node.name().to_string())
                .unwrap_or_else(|| UNKNOWN_TARGET_NAME.to_string());
            EdgeLabelItem {
                edge_id: edge.id,
                label,
                target_node_name,
            }
        })
        .collect()
}
