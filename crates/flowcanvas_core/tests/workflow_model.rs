use flowcanvas_core::model::step::{
    ConditionOperator, DecisionStepConfig, HttpMethod, IntegrationStepSubtype,
};
use flowcanvas_core::{BaseStepConfig, Position, StepConfig, StepType, Workflow, WorkflowNode};
use serde_json::{json, Value};

#[test]
fn node_serializes_in_canvas_shape() {
    let config =
        StepConfig::new_default(StepType::Source, "webhook", BaseStepConfig::new("Inbound"))
            .unwrap();
    let node = WorkflowNode::new(config, Position::new(10.0, 20.0));

    let value = serde_json::to_value(&node).unwrap();

    assert_eq!(value["type"], "custom");
    assert_eq!(value["position"], json!({ "x": 10.0, "y": 20.0 }));
    assert_eq!(value["data"]["type"], "source");
    assert_eq!(value["data"]["position"], value["position"]);
    assert_eq!(value["data"]["isConfigured"], false);
    assert_eq!(value["data"]["hasError"], false);
    assert!(value["data"].get("errorMessage").is_none());
    assert_eq!(
        value["data"]["config"],
        json!({ "name": "Inbound", "enabled": true, "subtype": "webhook" })
    );
}

#[test]
fn node_decodes_config_against_declared_type() {
    let raw = json!({
        "id": "0c3e8d3e-2a43-4a39-9d55-3f1f4b1b7a01",
        "position": { "x": 1, "y": 2 },
        "data": {
            "type": "decision",
            "config": {
                "name": "Score",
                "subtype": "conditional",
                "conditions": [{ "field": "score", "operator": "greater_than", "value": 80 }],
                "edgeLabels": [{ "id": "e1", "label": "Hot", "sourceHandle": "true" }]
            },
            "position": { "x": 1, "y": 2 }
        }
    });

    let node: WorkflowNode = serde_json::from_value(raw).unwrap();

    assert_eq!(node.kind, "custom");
    assert!(!node.data.is_configured);
    let StepConfig::Decision(DecisionStepConfig {
        conditions,
        edge_labels,
        base,
        ..
    }) = node.config()
    else {
        panic!("decision config expected");
    };
    assert!(base.enabled);
    assert_eq!(
        conditions.as_ref().unwrap()[0].operator,
        ConditionOperator::GreaterThan
    );
    assert_eq!(edge_labels.as_ref().unwrap()[0].label, "Hot");
}

#[test]
fn sample_steps_decode_with_integration_shape() {
    let config = StepConfig::from_parts(
        StepType::Sample,
        json!({
            "name": "Find accounts",
            "subtype": "account_search",
            "requestMethod": "POST",
            "selectedApiMethods": [{ "id": "apollo", "name": "Apollo", "enabled": true }]
        }),
    )
    .unwrap();

    assert_eq!(config.step_type(), StepType::Sample);
    let StepConfig::Sample(integration) = &config else {
        panic!("sample config expected");
    };
    assert_eq!(integration.subtype, IntegrationStepSubtype::AccountSearch);
    assert_eq!(integration.request_method, Some(HttpMethod::Post));
    assert_eq!(config.selected_api_methods()[0].name, "Apollo");
}

#[test]
fn mismatched_subtype_fails_node_decode() {
    let raw = json!({
        "id": "0c3e8d3e-2a43-4a39-9d55-3f1f4b1b7a01",
        "position": { "x": 0, "y": 0 },
        "data": { "type": "output", "config": { "name": "x", "subtype": "webhook" } }
    });
    let err = serde_json::from_value::<WorkflowNode>(raw).unwrap_err();
    assert!(err.to_string().contains("unknown subtype"));
}

#[test]
fn workflow_uses_camel_case_and_defaults() {
    let workflow = Workflow::new("Shape", None);
    let value = serde_json::to_value(&workflow).unwrap();
    for key in [
        "id",
        "name",
        "version",
        "createdAt",
        "updatedAt",
        "nodes",
        "edges",
        "isActive",
        "tags",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value.get("description").is_none());

    let mut minimal = value.clone();
    let object = minimal.as_object_mut().unwrap();
    object.remove("version");
    object.remove("tags");
    object.remove("isActive");
    let decoded: Workflow = serde_json::from_value(Value::Object(object.clone())).unwrap();
    assert_eq!(decoded.version, "1.0.0");
    assert!(decoded.tags.is_empty());
    assert!(!decoded.is_active);
}
