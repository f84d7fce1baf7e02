//! Single state container for the workflow editor.
//!
//! # Responsibility
//! - Own the workflow list, the current-workflow pointer and UI state.
//! - Apply every graph/metadata mutation with its bookkeeping (timestamps,
//!   selection cleanup, label inference).
//!
//! # Invariants
//! - The current workflow is resolved by id inside `workflows`; no copy is
//!   kept, so list and current view never diverge.
//! - `current_workflow_id`, when set, names a workflow in `workflows`.
//! - Deleting a node removes every edge referencing it.
//! - New edges reference existing nodes on resolvable handles.
//! - Each graph or metadata mutation bumps `updated_at` of its workflow.

use crate::catalog::rules::default_timeout;
use crate::catalog::steps::find_step;
use crate::graph::edge_label::resolve_edge_label;
use crate::graph::handles::{resolve_connection, ConnectionError};
use crate::model::step::{BaseStepConfig, EdgeLabelConfig, StepConfig, StepConfigError, StepType};
use crate::model::ui_state::{clamp_zoom, WorkflowUiState};
use crate::model::workflow::{
    EdgeId, NodeId, Position, Workflow, WorkflowEdge, WorkflowId, WorkflowNode,
};
use chrono::Utc;
use log::{debug, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Operation needs a current workflow and none is selected.
    NoCurrentWorkflow,
    WorkflowNotFound(WorkflowId),
    NodeNotFound(NodeId),
    EdgeNotFound(EdgeId),
    /// Edge exists but does not leave the given node.
    EdgeNotFromNode { edge_id: EdgeId, node_id: NodeId },
    /// Replacement config has a different step type than the node.
    StepTypeMismatch { expected: StepType, actual: StepType },
    /// Palette has no entry for the requested step.
    UnknownCatalogStep { step_type: StepType, subtype: String },
    /// Workflow name is blank after trim.
    InvalidWorkflowName,
    StepConfig(StepConfigError),
    Connection(ConnectionError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCurrentWorkflow => write!(f, "no workflow selected"),
            Self::WorkflowNotFound(id) => write!(f, "workflow not found: {id}"),
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::EdgeNotFound(id) => write!(f, "edge not found: {id}"),
            Self::EdgeNotFromNode { edge_id, node_id } => {
                write!(f, "edge {edge_id} does not leave node {node_id}")
            }
            Self::StepTypeMismatch { expected, actual } => write!(
                f,
                "step config type `{actual}` does not match node type `{expected}`"
            ),
            Self::UnknownCatalogStep { step_type, subtype } => {
                write!(f, "no palette step for `{step_type}` / `{subtype}`")
            }
            Self::InvalidWorkflowName => write!(f, "workflow name must not be blank"),
            Self::StepConfig(err) => write!(f, "{err}"),
            Self::Connection(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StepConfig(err) => Some(err),
            Self::Connection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StepConfigError> for StoreError {
    fn from(value: StepConfigError) -> Self {
        Self::StepConfig(value)
    }
}

impl From<ConnectionError> for StoreError {
    fn from(value: ConnectionError) -> Self {
        Self::Connection(value)
    }
}

/// Partial metadata update for the current workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowMetadataPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Request for a new step node.
#[derive(Debug, Clone, PartialEq)]
pub struct AddNodeRequest {
    pub step_type: StepType,
    pub subtype: String,
    pub position: Position,
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub timeout: Option<u32>,
}

impl AddNodeRequest {
    pub fn new(step_type: StepType, subtype: impl Into<String>, position: Position) -> Self {
        Self {
            step_type,
            subtype: subtype.into(),
            position,
            name: None,
            description: None,
            enabled: None,
            timeout: None,
        }
    }
}

/// Partial node data update from the config panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub config: Option<StepConfig>,
    pub is_configured: Option<bool>,
    pub has_error: Option<bool>,
    /// `Some(None)` clears the message.
    pub error_message: Option<Option<String>>,
}

/// Request for a new edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddEdgeRequest {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub label: Option<String>,
    pub condition: Option<String>,
}

impl AddEdgeRequest {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            ..Self::default()
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Editor state: workflows, current pointer, UI state and status flags.
#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
    workflows: Vec<Workflow>,
    current_workflow_id: Option<WorkflowId>,
    ui: WorkflowUiState,
    is_loading: bool,
    error: Option<String>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn workflow(&self, id: WorkflowId) -> Option<&Workflow> {
        self.workflows.iter().find(|workflow| workflow.id == id)
    }

    pub fn current_workflow_id(&self) -> Option<WorkflowId> {
        self.current_workflow_id
    }

    pub fn current_workflow(&self) -> Option<&Workflow> {
        self.current_workflow_id.and_then(|id| self.workflow(id))
    }

    pub fn ui(&self) -> &WorkflowUiState {
        &self.ui
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Creates an empty workflow and makes it current.
    pub fn create_workflow(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> StoreResult<WorkflowId> {
        let name = normalize_workflow_name(name.into())?;
        let workflow = Workflow::new(name, description);
        let workflow_id = workflow.id;
        self.workflows.push(workflow);
        self.current_workflow_id = Some(workflow_id);
        info!("event=workflow_create module=store status=ok workflow_id={workflow_id}");
        Ok(workflow_id)
    }

    /// Makes an existing workflow current.
    pub fn load_workflow(&mut self, id: WorkflowId) -> StoreResult<()> {
        if self.workflow(id).is_none() {
            return Err(StoreError::WorkflowNotFound(id));
        }
        self.current_workflow_id = Some(id);
        Ok(())
    }

    /// Applies a partial metadata update to the current workflow.
    pub fn update_workflow_metadata(&mut self, patch: WorkflowMetadataPatch) -> StoreResult<()> {
        let name = patch.name.map(normalize_workflow_name).transpose()?;
        let workflow = self.current_workflow_mut()?;
        if let Some(name) = name {
            workflow.name = name;
        }
        if let Some(description) = patch.description {
            workflow.description = description;
        }
        if let Some(tags) = patch.tags {
            workflow.tags = tags;
        }
        if let Some(is_active) = patch.is_active {
            workflow.is_active = is_active;
        }
        workflow.touch();
        Ok(())
    }

    /// Removes a workflow; the first remaining one becomes current if needed.
    pub fn delete_workflow(&mut self, id: WorkflowId) -> StoreResult<()> {
        let before = self.workflows.len();
        self.workflows.retain(|workflow| workflow.id != id);
        if self.workflows.len() == before {
            return Err(StoreError::WorkflowNotFound(id));
        }

        if self.current_workflow_id == Some(id) {
            self.current_workflow_id = self.workflows.first().map(|workflow| workflow.id);
            self.ui.selected_node_id = None;
            self.ui.selected_edge_id = None;
            self.ui.is_config_panel_open = false;
        }
        info!("event=workflow_delete module=store status=ok workflow_id={id}");
        Ok(())
    }

    /// Adds a step node to the current workflow, then selects it.
    pub fn add_node(&mut self, request: AddNodeRequest) -> StoreResult<NodeId> {
        let base = BaseStepConfig {
            name: request
                .name
                .unwrap_or_else(|| format!("{} Step", request.step_type)),
            description: Some(request.description.unwrap_or_default()),
            enabled: request.enabled.unwrap_or(true),
            timeout: request.timeout,
        };
        let config = StepConfig::new_default(request.step_type, &request.subtype, base)?;
        let node = WorkflowNode::new(config, request.position);
        let node_id = node.id;

        let workflow = self.current_workflow_mut()?;
        workflow.nodes.push(node);
        workflow.touch();
        debug!(
            "event=node_add module=store status=ok workflow_id={} node_id={} step_type={}",
            workflow.id, node_id, request.step_type
        );

        self.ui.selected_node_id = Some(node_id);
        self.ui.selected_edge_id = None;
        self.ui.is_config_panel_open = true;
        Ok(node_id)
    }

    /// Adds a palette step, taking name and description from the catalog.
    ///
    /// The step gets the default timeout of its type.
    pub fn add_catalog_node(
        &mut self,
        step_type: StepType,
        subtype: &str,
        position: Position,
    ) -> StoreResult<NodeId> {
        let metadata =
            find_step(step_type, subtype).ok_or_else(|| StoreError::UnknownCatalogStep {
                step_type,
                subtype: subtype.to_string(),
            })?;
        let mut request = AddNodeRequest::new(step_type, metadata.subtype, position);
        request.name = Some(metadata.label.to_string());
        request.description = Some(metadata.description.to_string());
        request.enabled = Some(true);
        request.timeout = default_timeout(step_type);
        self.add_node(request)
    }

    /// Merges a partial data update into one node.
    pub fn update_node(&mut self, node_id: NodeId, update: NodeUpdate) -> StoreResult<()> {
        let workflow = self.current_workflow_mut()?;
        let node = workflow
            .node_mut(node_id)
            .ok_or(StoreError::NodeNotFound(node_id))?;

        if let Some(config) = update.config {
            let expected = node.step_type();
            let actual = config.step_type();
            if expected != actual {
                return Err(StoreError::StepTypeMismatch { expected, actual });
            }
            node.data.config = config;
        }
        if let Some(is_configured) = update.is_configured {
            node.data.is_configured = is_configured;
        }
        if let Some(has_error) = update.has_error {
            node.data.has_error = has_error;
        }
        if let Some(error_message) = update.error_message {
            node.data.error_message = error_message;
        }
        workflow.touch();
        Ok(())
    }

    /// Moves one node on the canvas.
    pub fn update_node_position(&mut self, node_id: NodeId, position: Position) -> StoreResult<()> {
        let workflow = self.current_workflow_mut()?;
        workflow
            .node_mut(node_id)
            .ok_or(StoreError::NodeNotFound(node_id))?
            .set_position(position);
        workflow.touch();
        Ok(())
    }

    /// Removes one node and every edge touching it.
    pub fn delete_node(&mut self, node_id: NodeId) -> StoreResult<()> {
        let workflow = self.current_workflow_mut()?;
        if workflow.node(node_id).is_none() {
            return Err(StoreError::NodeNotFound(node_id));
        }

        workflow.nodes.retain(|node| node.id != node_id);
        let edges_before = workflow.edges.len();
        workflow.edges.retain(|edge| !edge.references(node_id));
        let removed_edges = edges_before - workflow.edges.len();
        workflow.touch();
        debug!(
            "event=node_delete module=store status=ok node_id={node_id} removed_edges={removed_edges}"
        );

        let selected_edge_gone = self
            .ui
            .selected_edge_id
            .is_some_and(|edge_id| self.current_workflow().and_then(|w| w.edge(edge_id)).is_none());
        if selected_edge_gone {
            self.ui.selected_edge_id = None;
        }
        if self.ui.selected_node_id == Some(node_id) {
            self.ui.selected_node_id = None;
            self.ui.is_config_panel_open = false;
        }
        Ok(())
    }

    /// Connects two nodes, resolving handles and inferring the label.
    pub fn add_edge(&mut self, request: AddEdgeRequest) -> StoreResult<EdgeId> {
        let workflow = self.current_workflow_mut()?;
        let source = workflow
            .node(request.source)
            .ok_or(StoreError::NodeNotFound(request.source))?;
        let target = workflow
            .node(request.target)
            .ok_or(StoreError::NodeNotFound(request.target))?;

        let resolved = resolve_connection(
            source,
            request.source_handle.as_deref(),
            target,
            request.target_handle.as_deref(),
        )?;
        let label = resolve_edge_label(
            request.label.as_deref(),
            source.config(),
            resolved.source_handle.as_deref(),
        );

        let mut edge = WorkflowEdge::new(request.source, request.target);
        edge.source_handle = resolved.source_handle;
        edge.target_handle = resolved.target_handle;
        edge.data.label = label;
        edge.data.condition = request.condition;
        let edge_id = edge.id;

        workflow.edges.push(edge);
        workflow.touch();
        debug!(
            "event=edge_add module=store status=ok edge_id={} source={} target={}",
            edge_id, request.source, request.target
        );
        Ok(edge_id)
    }

    /// Removes one edge.
    pub fn delete_edge(&mut self, edge_id: EdgeId) -> StoreResult<()> {
        let workflow = self.current_workflow_mut()?;
        if workflow.edge(edge_id).is_none() {
            return Err(StoreError::EdgeNotFound(edge_id));
        }
        workflow.edges.retain(|edge| edge.id != edge_id);
        workflow.touch();

        if self.ui.selected_edge_id == Some(edge_id) {
            self.ui.selected_edge_id = None;
        }
        Ok(())
    }

    /// Sets labels of edges leaving `node_id`.
    ///
    /// Decision and analytics steps also keep the labels in config
    /// `edgeLabels`, keyed by edge id. Edges of the node missing from `labels`
    /// keep their current label.
    pub fn update_node_edge_labels(
        &mut self,
        node_id: NodeId,
        labels: &[(EdgeId, String)],
    ) -> StoreResult<()> {
        let workflow = self.current_workflow_mut()?;
        if workflow.node(node_id).is_none() {
            return Err(StoreError::NodeNotFound(node_id));
        }
        for (edge_id, _) in labels {
            let edge = workflow
                .edge(*edge_id)
                .ok_or(StoreError::EdgeNotFound(*edge_id))?;
            if edge.source != node_id {
                return Err(StoreError::EdgeNotFromNode {
                    edge_id: *edge_id,
                    node_id,
                });
            }
        }

        let mut configured = Vec::with_capacity(labels.len());
        for (edge_id, label) in labels {
            if let Some(edge) = workflow.edge_mut(*edge_id) {
                edge.data.label = (!label.is_empty()).then(|| label.clone());
                configured.push(EdgeLabelConfig {
                    id: edge_id.to_string(),
                    label: label.clone(),
                    source_handle: edge.source_handle.clone(),
                    target_handle: edge.target_handle.clone(),
                });
            }
        }

        if let Some(slot) = workflow
            .node_mut(node_id)
            .and_then(|node| node.data.config.edge_labels_mut())
        {
            let mut merged = slot.take().unwrap_or_default();
            merged.retain(|entry| configured.iter().all(|next| next.id != entry.id));
            merged.extend(configured);
            *slot = Some(merged);
        }
        workflow.touch();
        Ok(())
    }

    /// Selects a node (or clears selection with `None`).
    pub fn set_selected_node(&mut self, node_id: Option<NodeId>) {
        self.ui.selected_node_id = node_id;
        self.ui.selected_edge_id = None;
        self.ui.is_config_panel_open = node_id.is_some();
    }

    /// Selects an edge (or clears it with `None`). Closes the config panel.
    pub fn set_selected_edge(&mut self, edge_id: Option<EdgeId>) {
        self.ui.selected_edge_id = edge_id;
        self.ui.selected_node_id = None;
        self.ui.is_config_panel_open = false;
    }

    pub fn toggle_config_panel(&mut self) {
        self.ui.is_config_panel_open = !self.ui.is_config_panel_open;
    }

    pub fn set_config_panel_open(&mut self, open: bool) {
        self.ui.is_config_panel_open = open;
    }

    pub fn set_dragged_step_type(&mut self, step_type: Option<StepType>) {
        self.ui.dragged_step_type = step_type;
    }

    /// Records canvas pan/zoom. Zoom is clamped to the supported range.
    pub fn update_viewport(&mut self, x: f64, y: f64, zoom: f64) {
        self.ui.viewport = Position::new(x, y);
        self.ui.zoom = clamp_zoom(zoom);
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_collapsed = !self.ui.sidebar_collapsed;
    }

    /// Adds an imported workflow under a fresh id and makes it current.
    pub fn import_workflow(&mut self, mut workflow: Workflow) -> WorkflowId {
        let original_id = workflow.id;
        workflow.id = Uuid::new_v4();
        let workflow_id = workflow.id;
        self.workflows.push(workflow);
        self.current_workflow_id = Some(workflow_id);
        info!(
            "event=workflow_import module=store status=ok workflow_id={workflow_id} source_id={original_id}"
        );
        workflow_id
    }

    /// Replaces the workflow list with persisted workflows.
    ///
    /// Keeps the current pointer when it still resolves, otherwise falls back
    /// to the first workflow.
    pub fn load_workflows_from_storage(&mut self, workflows: Vec<Workflow>) {
        self.workflows = workflows;
        let current_resolves = self
            .current_workflow_id
            .is_some_and(|id| self.workflow(id).is_some());
        if !current_resolves {
            self.current_workflow_id = self.workflows.first().map(|workflow| workflow.id);
        }
    }

    /// Copies a workflow with fresh ids, preserving graph structure.
    ///
    /// The copy is appended but does not become current.
    pub fn duplicate_workflow(&mut self, id: WorkflowId) -> StoreResult<WorkflowId> {
        let original = self.workflow(id).ok_or(StoreError::WorkflowNotFound(id))?;
        let copy = duplicate_graph(original);
        let copy_id = copy.id;
        self.workflows.push(copy);
        info!("event=workflow_duplicate module=store status=ok source_id={id} workflow_id={copy_id}");
        Ok(copy_id)
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn current_workflow_mut(&mut self) -> StoreResult<&mut Workflow> {
        let id = self
            .current_workflow_id
            .ok_or(StoreError::NoCurrentWorkflow)?;
        self.workflows
            .iter_mut()
            .find(|workflow| workflow.id == id)
            .ok_or(StoreError::NoCurrentWorkflow)
    }
}

fn normalize_workflow_name(name: String) -> StoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidWorkflowName);
    }
    Ok(trimmed.to_string())
}

fn duplicate_graph(original: &Workflow) -> Workflow {
    let now = Utc::now();
    let node_ids: HashMap<NodeId, NodeId> = original
        .nodes
        .iter()
        .map(|node| (node.id, Uuid::new_v4()))
        .collect();
    let edge_ids: HashMap<EdgeId, EdgeId> = original
        .edges
        .iter()
        .map(|edge| (edge.id, Uuid::new_v4()))
        .collect();
    let edge_keys: HashMap<String, String> = edge_ids
        .iter()
        .map(|(old, new)| (old.to_string(), new.to_string()))
        .collect();

    let nodes = original
        .nodes
        .iter()
        .map(|node| {
            let mut copy = node.clone();
            copy.id = node_ids.get(&node.id).copied().unwrap_or_else(Uuid::new_v4);
            if let Some(Some(labels)) = copy.data.config.edge_labels_mut() {
                for entry in labels.iter_mut() {
                    if let Some(new_key) = edge_keys.get(&entry.id) {
                        entry.id = new_key.clone();
                    }
                }
            }
            copy
        })
        .collect();

    let edges = original
        .edges
        .iter()
        .map(|edge| {
            let mut copy = edge.clone();
            copy.id = edge_ids.get(&edge.id).copied().unwrap_or_else(Uuid::new_v4);
            copy.source = node_ids.get(&edge.source).copied().unwrap_or(edge.source);
            copy.target = node_ids.get(&edge.target).copied().unwrap_or(edge.target);
            copy
        })
        .collect();

    Workflow {
        id: Uuid::new_v4(),
        name: format!("{} (Copy)", original.name),
        description: original.description.clone(),
        version: original.version.clone(),
        created_at: now,
        updated_at: now,
        nodes,
        edges,
        is_active: original.is_active,
        tags: original.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_workflow_name, StoreError, WorkflowStore};

    #[test]
    fn workflow_name_is_trimmed_and_required() {
        assert_eq!(normalize_workflow_name("  Leads ".to_string()).unwrap(), "Leads");
        assert_eq!(
            normalize_workflow_name("   ".to_string()).unwrap_err(),
            StoreError::InvalidWorkflowName
        );
    }

    #[test]
    fn graph_mutations_require_current_workflow() {
        let mut store = WorkflowStore::new();
        let err = store.delete_edge(uuid::Uuid::new_v4()).unwrap_err();
        assert_eq!(err, StoreError::NoCurrentWorkflow);
    }
}
