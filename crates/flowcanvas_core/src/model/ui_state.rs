//! Editor UI state: selection, viewport and panel visibility.
//!
//! # Invariants
//! - At most one of `selected_node_id` / `selected_edge_id` is set.
//! - `zoom` stays within `[MIN_ZOOM, MAX_ZOOM]`.

use crate::model::step::StepType;
use crate::model::workflow::{EdgeId, NodeId, Position};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowUiState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_edge_id: Option<EdgeId>,
    pub is_config_panel_open: bool,
    /// Palette step currently being dragged onto the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragged_step_type: Option<StepType>,
    pub zoom: f64,
    pub viewport: Position,
    pub sidebar_collapsed: bool,
}

impl Default for WorkflowUiState {
    fn default() -> Self {
        Self {
            selected_node_id: None,
            selected_edge_id: None,
            is_config_panel_open: false,
            dragged_step_type: None,
            zoom: 1.0,
            viewport: Position::default(),
            sidebar_collapsed: false,
        }
    }
}

/// Clamps a zoom factor into the supported range. Non-finite input resets to 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if !zoom.is_finite() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
