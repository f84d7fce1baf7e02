use flowcanvas_core::graph::edge_label::UNKNOWN_TARGET_NAME;
use flowcanvas_core::graph::handles::ConnectionError;
use flowcanvas_core::{
    outgoing_edge_labels, AddEdgeRequest, AddNodeRequest, EdgeLabelConfig, Position, StepType,
    StoreError, WorkflowEdge, WorkflowStore,
};

struct Canvas {
    store: WorkflowStore,
}

impl Canvas {
    fn new() -> Self {
        let mut store = WorkflowStore::new();
        store.create_workflow("labels", None).unwrap();
        Self { store }
    }

    fn node(&mut self, step_type: StepType, subtype: &str) -> uuid::Uuid {
        self.store
            .add_node(AddNodeRequest::new(step_type, subtype, Position::default()))
            .unwrap()
    }

    fn connect(&mut self, request: AddEdgeRequest) -> Result<Option<String>, StoreError> {
        let edge_id = self.store.add_edge(request)?;
        Ok(self
            .store
            .current_workflow()
            .unwrap()
            .edge(edge_id)
            .unwrap()
            .label()
            .map(str::to_string))
    }
}

#[test]
fn two_way_decisions_label_true_and_false_handles() {
    let mut canvas = Canvas::new();
    let decision = canvas.node(StepType::Decision, "conditional");
    let target = canvas.node(StepType::Processing, "api_call");

    let yes = canvas
        .connect(AddEdgeRequest::new(decision, target).with_source_handle("true"))
        .unwrap();
    let no = canvas
        .connect(AddEdgeRequest::new(decision, target).with_source_handle("false"))
        .unwrap();

    assert_eq!(yes.as_deref(), Some("Yes"));
    assert_eq!(no.as_deref(), Some("No"));
}

#[test]
fn try_catch_labels_success_and_error() {
    let mut canvas = Canvas::new();
    let guard = canvas.node(StepType::Decision, "try_catch");
    let target = canvas.node(StepType::Output, "log_output");

    let ok = canvas
        .connect(AddEdgeRequest::new(guard, target).with_source_handle("true"))
        .unwrap();
    let failed = canvas
        .connect(AddEdgeRequest::new(guard, target).with_source_handle("false"))
        .unwrap();

    assert_eq!(ok.as_deref(), Some("Success"));
    assert_eq!(failed.as_deref(), Some("Error"));
}

#[test]
fn conditional_branch_uses_branch_handle_and_classification_label() {
    let mut canvas = Canvas::new();
    let branch = canvas.node(StepType::Decision, "conditional_branch");
    let target = canvas.node(StepType::Processing, "data_transformation");

    let label = canvas.connect(AddEdgeRequest::new(branch, target)).unwrap();
    assert_eq!(label.as_deref(), Some("Classification Output"));

    let workflow = canvas.store.current_workflow().unwrap();
    assert_eq!(workflow.edges[0].source_handle.as_deref(), Some("branch"));

    let err = canvas
        .connect(AddEdgeRequest::new(branch, target).with_source_handle("true"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Connection(ConnectionError::InvalidSourceHandle { .. })
    ));
}

#[test]
fn explicit_label_wins() {
    let mut canvas = Canvas::new();
    let decision = canvas.node(StepType::Decision, "switch");
    let target = canvas.node(StepType::Output, "log_output");

    let label = canvas
        .connect(
            AddEdgeRequest::new(decision, target)
                .with_source_handle("true")
                .with_label("Enterprise"),
        )
        .unwrap();
    assert_eq!(label.as_deref(), Some("Enterprise"));
}

#[test]
fn explicit_label_is_kept_as_given() {
    let mut canvas = Canvas::new();
    let source = canvas.node(StepType::Processing, "api_call");
    let target = canvas.node(StepType::Output, "log_output");

    let label = canvas
        .connect(AddEdgeRequest::new(source, target).with_label(" Go "))
        .unwrap();
    assert_eq!(label.as_deref(), Some(" Go "));
}

#[test]
fn analytics_labels_apply_to_later_unnamed_edges() {
    let mut canvas = Canvas::new();
    let analytics = canvas.node(StepType::Analytics, "document_processing");
    let first = canvas.node(StepType::Output, "log_output");
    let second = canvas.node(StepType::Output, "file_export");

    let edge_id = canvas
        .store
        .add_edge(AddEdgeRequest::new(analytics, first))
        .unwrap();
    canvas
        .store
        .update_node_edge_labels(analytics, &[(edge_id, "Parsed ".to_string())])
        .unwrap();

    let label = canvas
        .connect(AddEdgeRequest::new(analytics, second))
        .unwrap();
    assert_eq!(label.as_deref(), Some("Parsed "));
}

#[test]
fn plain_steps_get_no_label_and_decisions_need_a_handle() {
    let mut canvas = Canvas::new();
    let source = canvas.node(StepType::Source, "webhook");
    let decision = canvas.node(StepType::Decision, "loop");
    let output = canvas.node(StepType::Output, "log_output");

    assert_eq!(canvas.connect(AddEdgeRequest::new(source, decision)).unwrap(), None);

    let err = canvas
        .connect(AddEdgeRequest::new(decision, output))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Connection(ConnectionError::AmbiguousSourceHandle(_))
    ));

    let err = canvas
        .connect(AddEdgeRequest::new(output, source))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Connection(ConnectionError::NoOutputHandle(_))
    ));
}

#[test]
fn sources_accept_no_incoming_edges() {
    let mut canvas = Canvas::new();
    let processing = canvas.node(StepType::Processing, "api_call");
    let source = canvas.node(StepType::Source, "webhook");

    let err = canvas
        .connect(AddEdgeRequest::new(processing, source))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Connection(ConnectionError::NoInputHandle(_))
    ));
}

#[test]
fn updated_labels_feed_later_edges_and_label_listing() {
    let mut canvas = Canvas::new();
    let decision = canvas.node(StepType::Decision, "conditional");
    let first = canvas.node(StepType::Output, "log_output");
    let second = canvas.node(StepType::Output, "file_export");

    let edge_id = canvas
        .store
        .add_edge(AddEdgeRequest::new(decision, first).with_source_handle("false"))
        .unwrap();
    canvas
        .store
        .update_node_edge_labels(decision, &[(edge_id, "Rejected".to_string())])
        .unwrap();

    // The configured entry is bound to the `false` handle.
    let label = canvas
        .connect(AddEdgeRequest::new(decision, second).with_source_handle("false"))
        .unwrap();
    assert_eq!(label.as_deref(), Some("Rejected"));

    let workflow = canvas.store.current_workflow().unwrap();
    let items = outgoing_edge_labels(workflow, decision);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].edge_id, edge_id);
    assert_eq!(items[0].label, "Rejected");
    assert_eq!(items[0].target_node_name, "output Step");
    let config_labels: &[EdgeLabelConfig] = workflow.node(decision).unwrap().config().edge_labels();
    assert_eq!(config_labels.len(), 1);
    assert_eq!(config_labels[0].source_handle.as_deref(), Some("false"));
}

#[test]
fn label_updates_reject_foreign_edges() {
    let mut canvas = Canvas::new();
    let source = canvas.node(StepType::Source, "webhook");
    let decision = canvas.node(StepType::Decision, "conditional");
    let edge_id = canvas
        .store
        .add_edge(AddEdgeRequest::new(source, decision))
        .unwrap();

    let err = canvas
        .store
        .update_node_edge_labels(decision, &[(edge_id, "x".to_string())])
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::EdgeNotFromNode {
            edge_id,
            node_id: decision,
        }
    );
}

#[test]
fn non_decision_label_updates_touch_edges_only() {
    let mut canvas = Canvas::new();
    let source = canvas.node(StepType::Source, "webhook");
    let target = canvas.node(StepType::Processing, "api_call");
    let edge_id = canvas
        .store
        .add_edge(AddEdgeRequest::new(source, target))
        .unwrap();

    canvas
        .store
        .update_node_edge_labels(source, &[(edge_id, "Incoming".to_string())])
        .unwrap();

    let workflow = canvas.store.current_workflow().unwrap();
    assert_eq!(workflow.edge(edge_id).unwrap().label(), Some("Incoming"));
    assert!(workflow.node(source).unwrap().config().edge_labels().is_empty());
}

#[test]
fn listing_reports_missing_targets() {
    let mut canvas = Canvas::new();
    let source = canvas.node(StepType::Source, "webhook");
    let workflow_id = canvas.store.current_workflow_id().unwrap();

    let mut workflow = canvas.store.workflow(workflow_id).unwrap().clone();
    workflow
        .edges
        .push(WorkflowEdge::new(source, uuid::Uuid::new_v4()));

    let items = outgoing_edge_labels(&workflow, source);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "");
    assert_eq!(items[0].target_node_name, UNKNOWN_TARGET_NAME);
}
