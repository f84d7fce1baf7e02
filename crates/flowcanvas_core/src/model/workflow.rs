//! Workflow graph domain model.
//!
//! # Responsibility
//! - Define the workflow, node and edge records shared by store, storage and
//!   transfer paths.
//! - Keep the JSON shape compatible with the canvas node/edge format.
//!
//! # Invariants
//! - Node ids and edge ids are unique within one workflow.
//! - Edges reference existing node ids.
//! - `data.position` mirrors the node position.

use crate::model::step::{StepConfig, StepConfigError, StepType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

pub type WorkflowId = Uuid;
pub type NodeId = Uuid;
pub type EdgeId = Uuid;

/// Version assigned to newly created workflows.
pub const DEFAULT_WORKFLOW_VERSION: &str = "1.0.0";
/// Canvas renderer kind for step nodes.
pub const NODE_KIND_CUSTOM: &str = "custom";
/// Canvas renderer kind for edges.
pub const EDGE_KIND_SMOOTHSTEP: &str = "smoothstep";

/// Canvas coordinates in flow space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Step payload of one canvas node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNodeData")]
pub struct WorkflowNodeData {
    /// Typed config; its variant decides the node step type.
    pub config: StepConfig,
    pub position: Position,
    /// Set once the config panel has saved this step.
    pub is_configured: bool,
    pub has_error: bool,
    pub error_message: Option<String>,
}

impl WorkflowNodeData {
    pub fn step_type(&self) -> StepType {
        self.config.step_type()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNodeData {
    #[serde(rename = "type")]
    step_type: StepType,
    config: Value,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    is_configured: bool,
    #[serde(default)]
    has_error: bool,
    #[serde(default)]
    error_message: Option<String>,
}

impl TryFrom<RawNodeData> for WorkflowNodeData {
    type Error = StepConfigError;

    fn try_from(raw: RawNodeData) -> Result<Self, Self::Error> {
        Ok(Self {
            config: StepConfig::from_parts(raw.step_type, raw.config)?,
            position: raw.position,
            is_configured: raw.is_configured,
            has_error: raw.has_error,
            error_message: raw.error_message,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeDataWire<'a> {
    #[serde(rename = "type")]
    step_type: StepType,
    config: &'a StepConfig,
    position: Position,
    is_configured: bool,
    has_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<&'a str>,
}

impl Serialize for WorkflowNodeData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeDataWire {
            step_type: self.step_type(),
            config: &self.config,
            position: self.position,
            is_configured: self.is_configured,
            has_error: self.has_error,
            error_message: self.error_message.as_deref(),
        }
        .serialize(serializer)
    }
}

/// One step node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: NodeId,
    /// Renderer kind, always `custom` for nodes created by the editor.
    #[serde(rename = "type", default = "default_node_kind")]
    pub kind: String,
    pub position: Position,
    pub data: WorkflowNodeData,
}

impl WorkflowNode {
    /// Creates a node with a fresh id at `position`.
    pub fn new(config: StepConfig, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NODE_KIND_CUSTOM.to_string(),
            position,
            data: WorkflowNodeData {
                config,
                position,
                is_configured: false,
                has_error: false,
                error_message: None,
            },
        }
    }

    pub fn step_type(&self) -> StepType {
        self.data.step_type()
    }

    pub fn config(&self) -> &StepConfig {
        &self.data.config
    }

    pub fn name(&self) -> &str {
        self.data.config.name()
    }

    /// Moves the node and its mirrored data position together.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.data.position = position;
    }
}

fn default_node_kind() -> String {
    NODE_KIND_CUSTOM.to_string()
}

/// Edge payload: display label and free-form condition text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default = "default_edge_kind")]
    pub kind: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub data: EdgeData,
}

impl WorkflowEdge {
    /// Creates an animated smoothstep edge with a fresh id.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
            source_handle: None,
            target_handle: None,
            kind: EDGE_KIND_SMOOTHSTEP.to_string(),
            animated: true,
            data: EdgeData::default(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label.as_deref()
    }

    /// Whether this edge touches `node_id` on either end.
    pub fn references(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }
}

fn default_edge_kind() -> String {
    EDGE_KIND_SMOOTHSTEP.to_string()
}

/// Named graph of step nodes and directed edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Workflow {
    /// Creates an empty, inactive workflow with a fresh id.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            version: DEFAULT_WORKFLOW_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            nodes: Vec::new(),
            edges: Vec::new(),
            is_active: false,
            tags: Vec::new(),
        }
    }

    /// Bumps `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn node(&self, id: NodeId) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut WorkflowEdge> {
        self.edges.iter_mut().find(|edge| edge.id == id)
    }

    /// Edges leaving `node_id`, in insertion order.
    pub fn outgoing_edges(&self, node_id: NodeId) -> impl Iterator<Item = &WorkflowEdge> {
        self.edges.iter().filter(move |edge| edge.source == node_id)
    }
}

fn default_version() -> String {
    DEFAULT_WORKFLOW_VERSION.to_string()
}
