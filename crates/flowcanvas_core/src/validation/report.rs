//! Workflow validation report.
//!
//! # Responsibility
//! - Collect structural and config problems of one workflow in one pass.
//!
//! # Invariants
//! - Issues are ordered: workflow-level, then nodes, then edges.
//! - Checking is read-only.

use crate::catalog::rules::{can_connect, MAX_EDGES_PER_NODE, MAX_NODES_PER_WORKFLOW};
use crate::model::step::{ConditionOperator, StepConfig};
use crate::model::workflow::{EdgeId, NodeId, Workflow};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueKind {
    TooManyNodes,
    DuplicateNodeId,
    DuplicateEdgeId,
    EmptyStepName,
    TooManyOutgoingEdges,
    InvalidPattern,
    DanglingEdge,
    ForbiddenConnection,
}

impl ValidationIssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooManyNodes => "too_many_nodes",
            Self::DuplicateNodeId => "duplicate_node_id",
            Self::DuplicateEdgeId => "duplicate_edge_id",
            Self::EmptyStepName => "empty_step_name",
            Self::TooManyOutgoingEdges => "too_many_outgoing_edges",
            Self::InvalidPattern => "invalid_pattern",
            Self::DanglingEdge => "dangling_edge",
            Self::ForbiddenConnection => "forbidden_connection",
        }
    }
}

/// One problem found in a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: ValidationIssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<EdgeId>,
    pub message: String,
}

impl ValidationIssue {
    fn workflow(kind: ValidationIssueKind, message: String) -> Self {
        Self {
            kind,
            node_id: None,
            edge_id: None,
            message,
        }
    }

    fn node(kind: ValidationIssueKind, node_id: NodeId, message: String) -> Self {
        Self {
            kind,
            node_id: Some(node_id),
            edge_id: None,
            message,
        }
    }

    fn edge(kind: ValidationIssueKind, edge_id: EdgeId, message: String) -> Self {
        Self {
            kind,
            node_id: None,
            edge_id: Some(edge_id),
            message,
        }
    }
}

/// Checks `workflow` and returns every issue found. Empty means clean.
pub fn validate_workflow(workflow: &Workflow) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if workflow.nodes.len() > MAX_NODES_PER_WORKFLOW {
        issues.push(ValidationIssue::workflow(
            ValidationIssueKind::TooManyNodes,
            format!(
                "workflow has {} nodes, limit is {MAX_NODES_PER_WORKFLOW}",
                workflow.nodes.len()
            ),
        ));
    }

    let mut seen_nodes = HashSet::new();
    for node in &workflow.nodes {
        if !seen_nodes.insert(node.id) {
            issues.push(ValidationIssue::node(
                ValidationIssueKind::DuplicateNodeId,
                node.id,
                format!("node id {} is used more than once", node.id),
            ));
        }
    }
    let mut seen_edges = HashSet::new();
    for edge in &workflow.edges {
        if !seen_edges.insert(edge.id) {
            issues.push(ValidationIssue::edge(
                ValidationIssueKind::DuplicateEdgeId,
                edge.id,
                format!("edge id {} is used more than once", edge.id),
            ));
        }
    }

    let mut outgoing: HashMap<NodeId, usize> = HashMap::new();
    for edge in &workflow.edges {
        *outgoing.entry(edge.source).or_default() += 1;
    }

    for node in &workflow.nodes {
        if node.name().trim().is_empty() {
            issues.push(ValidationIssue::node(
                ValidationIssueKind::EmptyStepName,
                node.id,
                "step name is required".to_string(),
            ));
        }

        let edge_count = outgoing.get(&node.id).copied().unwrap_or_default();
        if edge_count > MAX_EDGES_PER_NODE {
            issues.push(ValidationIssue::node(
                ValidationIssueKind::TooManyOutgoingEdges,
                node.id,
                format!(
                    "step `{}` has {edge_count} outgoing edges, limit is {MAX_EDGES_PER_NODE}",
                    node.name()
                ),
            ));
        }

        for (location, pattern) in config_patterns(node.config()) {
            if let Err(err) = Regex::new(pattern) {
                issues.push(ValidationIssue::node(
                    ValidationIssueKind::InvalidPattern,
                    node.id,
                    format!("{location} pattern `{pattern}` does not compile: {err}"),
                ));
            }
        }
    }

    for edge in &workflow.edges {
        let source = workflow.node(edge.source);
        let target = workflow.node(edge.target);
        let (Some(source), Some(target)) = (source, target) else {
            issues.push(ValidationIssue::edge(
                ValidationIssueKind::DanglingEdge,
                edge.id,
                format!(
                    "edge {} references a missing node ({} -> {})",
                    edge.id, edge.source, edge.target
                ),
            ));
            continue;
        };

        if !can_connect(source.step_type(), target.step_type()) {
            issues.push(ValidationIssue::edge(
                ValidationIssueKind::ForbiddenConnection,
                edge.id,
                format!(
                    "`{}` steps cannot connect to `{}` steps",
                    source.step_type(),
                    target.step_type()
                ),
            ));
        }
    }

    issues
}

/// Regex patterns configured on a step, with a short location label.
fn config_patterns(config: &StepConfig) -> Vec<(&'static str, &str)> {
    let mut patterns = Vec::new();
    match config {
        StepConfig::Decision(decision) => {
            for condition in decision.conditions.iter().flatten() {
                if condition.operator == ConditionOperator::RegexMatch {
                    if let Value::String(pattern) = &condition.value {
                        patterns.push(("condition", pattern.as_str()));
                    }
                }
            }
            if let Some(condition) = decision
                .loop_condition
                .as_ref()
                .filter(|condition| condition.operator == ConditionOperator::RegexMatch)
            {
                if let Value::String(pattern) = &condition.value {
                    patterns.push(("loop condition", pattern.as_str()));
                }
            }
        }
        StepConfig::Processing(processing) => {
            for rule in processing.validation_rules.iter().flatten() {
                if let Some(pattern) = rule.pattern.as_deref() {
                    patterns.push(("validation rule", pattern));
                }
            }
        }
        _ => {}
    }
    patterns
}
