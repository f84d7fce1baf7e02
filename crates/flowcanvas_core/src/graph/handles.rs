//! Node handle layout and connection resolution.

use crate::model::step::{StepConfig, StepType};
use crate::model::workflow::{NodeId, WorkflowNode};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Positive branch of a two-way decision.
pub const HANDLE_TRUE: &str = "true";
/// Negative branch of a two-way decision.
pub const HANDLE_FALSE: &str = "false";
/// Single classification output of a conditional-branch decision.
pub const HANDLE_BRANCH: &str = "branch";

const UNNAMED_OUTPUT: &[Option<&str>] = &[None];
const DECISION_OUTPUTS: &[Option<&str>] = &[Some(HANDLE_TRUE), Some(HANDLE_FALSE)];
const BRANCH_OUTPUT: &[Option<&str>] = &[Some(HANDLE_BRANCH)];
const NO_OUTPUTS: &[Option<&str>] = &[];

/// Output handle ids of a node with `config`. `None` is the unnamed handle.
pub fn output_handles(config: &StepConfig) -> &'static [Option<&'static str>] {
    match config.step_type() {
        StepType::Output => NO_OUTPUTS,
        StepType::Decision if config.is_conditional_branch() => BRANCH_OUTPUT,
        StepType::Decision => DECISION_OUTPUTS,
        _ => UNNAMED_OUTPUT,
    }
}

/// Whether nodes of `step_type` accept incoming edges.
pub fn has_input_handle(step_type: StepType) -> bool {
    step_type != StepType::Source
}

/// Concrete handles picked for a new edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

/// Rejected connection attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Source node has no output handle at all.
    NoOutputHandle(NodeId),
    /// Target node has no input handle.
    NoInputHandle(NodeId),
    /// Requested source handle does not exist on the node.
    InvalidSourceHandle { node_id: NodeId, handle: String },
    /// Requested target handle does not exist on the node.
    InvalidTargetHandle { node_id: NodeId, handle: String },
    /// Source has several named outputs and none was picked.
    AmbiguousSourceHandle(NodeId),
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOutputHandle(id) => write!(f, "node has no output handle: {id}"),
            Self::NoInputHandle(id) => write!(f, "node has no input handle: {id}"),
            Self::InvalidSourceHandle { node_id, handle } => {
                write!(f, "unknown source handle `{handle}` on node {node_id}")
            }
            Self::InvalidTargetHandle { node_id, handle } => {
                write!(f, "unknown target handle `{handle}` on node {node_id}")
            }
            Self::AmbiguousSourceHandle(id) => {
                write!(f, "source handle must be chosen for node {id}")
            }
        }
    }
}

impl Error for ConnectionError {}

/// Resolves a requested connection to concrete handle ids.
///
/// Blank handle ids are treated as absent. A single named output is picked
/// automatically when the caller gives none.
pub fn resolve_connection(
    source: &WorkflowNode,
    source_handle: Option<&str>,
    target: &WorkflowNode,
    target_handle: Option<&str>,
) -> Result<ResolvedConnection, ConnectionError> {
    let outputs = output_handles(source.config());
    if outputs.is_empty() {
        return Err(ConnectionError::NoOutputHandle(source.id));
    }

    let requested = normalize_handle(source_handle);
    let source_handle = match requested {
        Some(handle) => {
            if !outputs.iter().any(|candidate| *candidate == Some(handle)) {
                return Err(ConnectionError::InvalidSourceHandle {
                    node_id: source.id,
                    handle: handle.to_string(),
                });
            }
            Some(handle.to_string())
        }
        None if outputs.contains(&None) => None,
        None => match outputs {
            [Some(only)] => Some((*only).to_string()),
            _ => return Err(ConnectionError::AmbiguousSourceHandle(source.id)),
        },
    };

    if !has_input_handle(target.step_type()) {
        return Err(ConnectionError::NoInputHandle(target.id));
    }
    if let Some(handle) = normalize_handle(target_handle) {
        return Err(ConnectionError::InvalidTargetHandle {
            node_id: target.id,
            handle: handle.to_string(),
        });
    }

    Ok(ResolvedConnection {
        source_handle,
        target_handle: None,
    })
}

fn normalize_handle(handle: Option<&str>) -> Option<&str> {
    handle.map(str::trim).filter(|value| !value.is_empty())
}
