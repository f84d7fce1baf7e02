//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `flowcanvas_core` linkage without the Flutter shell.
//! - Print the step palette and a sample graph for quick sanity checks.

use flowcanvas_core::graph::edge_label::outgoing_edge_labels;
use flowcanvas_core::{step_categories, AddEdgeRequest, Position, StepType, WorkflowStore};

fn main() {
    println!("flowcanvas_core ping={}", flowcanvas_core::ping());
    println!("flowcanvas_core version={}", flowcanvas_core::core_version());

    for (category, steps) in step_categories() {
        let subtypes: Vec<&str> = steps.iter().map(|step| step.subtype).collect();
        println!("catalog category={category} steps={}", subtypes.join(","));
    }

    match sample_decision_labels() {
        Ok(labels) => println!("sample decision labels={}", labels.join(",")),
        Err(err) => {
            eprintln!("sample workflow failed: {err}");
            std::process::exit(1);
        }
    }
}

fn sample_decision_labels() -> Result<Vec<String>, flowcanvas_core::StoreError> {
    let mut store = WorkflowStore::new();
    let workflow_id = store.create_workflow("CLI smoke", None)?;
    let check =
        store.add_catalog_node(StepType::Decision, "conditional", Position::new(0.0, 0.0))?;
    let approve =
        store.add_catalog_node(StepType::Output, "log_output", Position::new(200.0, -80.0))?;
    let reject = store.add_catalog_node(
        StepType::Output,
        "webhook_response",
        Position::new(200.0, 80.0),
    )?;
    store.add_edge(AddEdgeRequest::new(check, approve).with_source_handle("true"))?;
    store.add_edge(AddEdgeRequest::new(check, reject).with_source_handle("false"))?;

    let labels = store
        .workflow(workflow_id)
        .map(|workflow| {
            outgoing_edge_labels(workflow, check)
                .into_iter()
                .map(|item| format!("{}->{}", item.label, item.target_node_name))
                .collect()
        })
        .unwrap_or_default();
    Ok(labels)
}
