//! Per-type defaults, connection rules and validation limits.

use crate::model::step::StepType;

/// Upper bound on nodes in one workflow.
pub const MAX_NODES_PER_WORKFLOW: usize = 100;
/// Upper bound on outgoing edges from one node.
pub const MAX_EDGES_PER_NODE: usize = 10;

/// Default timeout in seconds for steps of `step_type`.
pub fn default_timeout(step_type: StepType) -> Option<u32> {
    match step_type {
        StepType::Source => Some(30),
        StepType::Processing => Some(60),
        StepType::Decision => Some(10),
        StepType::Output => Some(30),
        _ => None,
    }
}

/// Step types an edge from `source` may point at.
///
/// `None` means the source type carries no rule and any target is accepted.
pub fn allowed_targets(source: StepType) -> Option<&'static [StepType]> {
    const FLOW_TARGETS: &[StepType] = &[StepType::Processing, StepType::Decision, StepType::Output];
    const NO_TARGETS: &[StepType] = &[];
    match source {
        StepType::Source | StepType::Processing | StepType::Decision => Some(FLOW_TARGETS),
        StepType::Output => Some(NO_TARGETS),
        _ => None,
    }
}

/// Whether the connection rules accept an edge `source -> target`.
pub fn can_connect(source: StepType, target: StepType) -> bool {
    allowed_targets(source).map_or(true, |targets| targets.contains(&target))
}
