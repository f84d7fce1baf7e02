//! FFI use-case API for the Flutter editor shell.
//!
//! # Responsibility
//! - Expose one function per editor use case to Dart via FRB.
//! - Translate core errors into response envelopes with readable messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call restores the editor from storage and saves after mutations.
//! - Graph calls name their workflow explicitly and make it current.

use flowcanvas_core::catalog::steps::default_api_methods;
use flowcanvas_core::db::open_db;
use flowcanvas_core::graph::edge_label::outgoing_edge_labels;
use flowcanvas_core::service::workflow_editor::NO_WORKFLOW_TO_EXPORT_MESSAGE;
use flowcanvas_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    step_categories, validate_workflow, AddEdgeRequest, EditorError, NodeUpdate, Position,
    SqliteWorkflowStorage, StepConfig, StepType, StoreError, TransferError, Workflow,
    WorkflowEditor, WorkflowMetadataPatch, WorkflowStore,
};
use log::warn;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

const WORKFLOW_DB_FILE_NAME: &str = "flowcanvas_workflows.sqlite3";
const DB_PATH_ENV: &str = "FLOWCANVAS_DB_PATH";
static WORKFLOW_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
// Calls load and save the whole workflow list; one session at a time.
static EDITOR_SESSION: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action envelope for editor mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowActionResponse {
    pub ok: bool,
    /// Id of the created/affected entity, or the export file path.
    pub id: Option<String>,
    pub message: String,
}

impl WorkflowActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }

    fn from_result(action: &str, done: &str, result: Result<Option<String>, String>) -> Self {
        match result {
            Ok(id) => Self::success(done, id),
            Err(err) => Self::failure(format!("{action} failed: {err}")),
        }
    }
}

/// Row of the workflow picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub node_count: u32,
    pub edge_count: u32,
    pub updated_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowListResponse {
    pub items: Vec<WorkflowSummary>,
    pub current_workflow_id: Option<String>,
    pub message: String,
}

/// Canvas payload: one workflow as JSON in the node/edge wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowJsonResponse {
    pub ok: bool,
    pub json: Option<String>,
    pub message: String,
}

/// Palette entry for the step sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalogItem {
    pub category: String,
    pub step_type: String,
    pub subtype: String,
    pub label: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMethodItem {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

/// Editable label row of one outgoing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabelEntry {
    pub edge_id: String,
    pub label: String,
    pub target_node_name: String,
}

/// Label edit submitted by the edge label panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabelInput {
    pub edge_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationItem {
    pub kind: String,
    pub node_id: Option<String>,
    pub edge_id: Option<String>,
    pub message: String,
}

/// Lists saved workflows; seeds the first workflow on a fresh install.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_list() -> WorkflowListResponse {
    match with_editor(|editor| Ok(list_workflows(editor.store()))) {
        Ok(response) => response,
        Err(err) => WorkflowListResponse {
            items: Vec::new(),
            current_workflow_id: None,
            message: format!("workflow_list failed: {err}"),
        },
    }
}

/// JSON of the current workflow.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_current_json() -> WorkflowJsonResponse {
    let result = with_editor(|editor| match editor.store().current_workflow() {
        Some(workflow) => Ok(Some(encode_workflow(workflow)?)),
        None => Ok(None),
    });
    match result {
        Ok(Some(json)) => WorkflowJsonResponse {
            ok: true,
            json: Some(json),
            message: "Workflow loaded.".to_string(),
        },
        Ok(None) => WorkflowJsonResponse {
            ok: true,
            json: None,
            message: "No workflow selected.".to_string(),
        },
        Err(err) => WorkflowJsonResponse {
            ok: false,
            json: None,
            message: format!("workflow_current_json failed: {err}"),
        },
    }
}

/// Creates an empty workflow and makes it current.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_create(name: String, description: Option<String>) -> WorkflowActionResponse {
    let description = description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let result = with_editor(|editor| {
        editor
            .apply(|store| store.create_workflow(name, description))
            .map(|id| Some(id.to_string()))
    });
    WorkflowActionResponse::from_result("workflow_create", "Workflow created.", result)
}

/// Makes a workflow current.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_select(workflow_id: String) -> WorkflowActionResponse {
    let result = parse_id(&workflow_id).and_then(|id| {
        with_editor(|editor| {
            editor.apply(|store| store.load_workflow(id))?;
            Ok(Some(id.to_string()))
        })
    });
    WorkflowActionResponse::from_result("workflow_select", "Workflow selected.", result)
}

/// Updates workflow metadata. `None` fields stay unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_update_metadata(
    workflow_id: String,
    name: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    is_active: Option<bool>,
) -> WorkflowActionResponse {
    let patch = WorkflowMetadataPatch {
        name,
        description: description.map(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }),
        tags,
        is_active,
    };
    let result = with_workflow(&workflow_id, |store, _| store.update_workflow_metadata(patch));
    WorkflowActionResponse::from_result(
        "workflow_update_metadata",
        "Workflow updated.",
        result.map(|()| Some(workflow_id.trim().to_string())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn workflow_delete(workflow_id: String) -> WorkflowActionResponse {
    let result = parse_id(&workflow_id).and_then(|id| {
        with_editor(|editor| {
            editor.apply(|store| store.delete_workflow(id))?;
            Ok(editor.store().current_workflow_id().map(|id| id.to_string()))
        })
    });
    WorkflowActionResponse::from_result("workflow_delete", "Workflow deleted.", result)
}

/// Copies a workflow under fresh ids. Returns the copy id.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_duplicate(workflow_id: String) -> WorkflowActionResponse {
    let result = parse_id(&workflow_id).and_then(|id| {
        with_editor(|editor| {
            editor
                .apply(|store| store.duplicate_workflow(id))
                .map(|copy| Some(copy.to_string()))
        })
    });
    WorkflowActionResponse::from_result("workflow_duplicate", "Workflow duplicated.", result)
}

/// Adds a palette step at canvas coordinates. Returns the node id.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_add_step(
    workflow_id: String,
    step_type: String,
    subtype: String,
    x: f64,
    y: f64,
) -> WorkflowActionResponse {
    let result = StepType::parse(&step_type)
        .ok_or_else(|| format!("unknown step type `{}`", step_type.trim()))
        .and_then(|step_type| {
            with_workflow(&workflow_id, |store, _| {
                store.add_catalog_node(step_type, subtype.trim(), Position::new(x, y))
            })
        });
    WorkflowActionResponse::from_result(
        "workflow_add_step",
        "Step added.",
        result.map(|id| Some(id.to_string())),
    )
}

/// Replaces a node config from the config panel JSON.
///
/// The config keeps the node step type; a successful save marks the node
/// configured and clears its error.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_update_step_config(
    workflow_id: String,
    node_id: String,
    config_json: String,
) -> WorkflowActionResponse {
    let result = parse_id(&node_id).and_then(|node_id| {
        let value = parse_config_json(&config_json)?;
        with_workflow(&workflow_id, move |store, workflow_id| {
            let step_type = store
                .workflow(workflow_id)
                .and_then(|workflow| workflow.node(node_id))
                .map(|node| node.step_type())
                .ok_or(StoreError::NodeNotFound(node_id))?;
            let config = StepConfig::from_parts(step_type, value)?;
            store.update_node(
                node_id,
                NodeUpdate {
                    config: Some(config),
                    is_configured: Some(true),
                    has_error: Some(false),
                    error_message: Some(None),
                },
            )?;
            Ok(node_id)
        })
    });
    WorkflowActionResponse::from_result(
        "workflow_update_step_config",
        "Step saved.",
        result.map(|id| Some(id.to_string())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn workflow_move_step(
    workflow_id: String,
    node_id: String,
    x: f64,
    y: f64,
) -> WorkflowActionResponse {
    let result = parse_id(&node_id).and_then(|node_id| {
        with_workflow(&workflow_id, |store, _| {
            store.update_node_position(node_id, Position::new(x, y))
        })
    });
    WorkflowActionResponse::from_result(
        "workflow_move_step",
        "Step moved.",
        result.map(|()| Some(node_id.trim().to_string())),
    )
}

/// Removes a step and its edges.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_delete_step(workflow_id: String, node_id: String) -> WorkflowActionResponse {
    let result = parse_id(&node_id)
        .and_then(|node_id| with_workflow(&workflow_id, |store, _| store.delete_node(node_id)));
    WorkflowActionResponse::from_result(
        "workflow_delete_step",
        "Step deleted.",
        result.map(|()| None),
    )
}

/// Connects two steps. Returns the edge id.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_connect(
    workflow_id: String,
    source_node_id: String,
    target_node_id: String,
    source_handle: Option<String>,
    target_handle: Option<String>,
    label: Option<String>,
) -> WorkflowActionResponse {
    let result = parse_id(&source_node_id)
        .and_then(|source| Ok((source, parse_id(&target_node_id)?)))
        .and_then(|(source, target)| {
            let request = AddEdgeRequest {
                source,
                target,
                source_handle,
                target_handle,
                label,
                condition: None,
            };
            with_workflow(&workflow_id, |store, _| store.add_edge(request))
        });
    WorkflowActionResponse::from_result(
        "workflow_connect",
        "Steps connected.",
        result.map(|id| Some(id.to_string())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn workflow_disconnect(workflow_id: String, edge_id: String) -> WorkflowActionResponse {
    let result = parse_id(&edge_id)
        .and_then(|edge_id| with_workflow(&workflow_id, |store, _| store.delete_edge(edge_id)));
    WorkflowActionResponse::from_result(
        "workflow_disconnect",
        "Connection removed.",
        result.map(|()| None),
    )
}

/// Outgoing edge labels of one step, for the edge label panel.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_edge_labels(workflow_id: String, node_id: String) -> Vec<EdgeLabelEntry> {
    let result = parse_id(&workflow_id)
        .and_then(|workflow_id| Ok((workflow_id, parse_id(&node_id)?)))
        .and_then(|(workflow_id, node_id)| {
            with_editor(|editor| {
                let workflow = editor
                    .store()
                    .workflow(workflow_id)
                    .ok_or(StoreError::WorkflowNotFound(workflow_id))?;
                Ok(outgoing_edge_labels(workflow, node_id))
            })
        });
    match result {
        Ok(items) => items
            .into_iter()
            .map(|item| EdgeLabelEntry {
                edge_id: item.edge_id.to_string(),
                label: item.label,
                target_node_name: item.target_node_name,
            })
            .collect(),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=workflow_edge_labels error={err}");
            Vec::new()
        }
    }
}

/// Saves edited labels for edges leaving one step.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_set_edge_labels(
    workflow_id: String,
    node_id: String,
    labels: Vec<EdgeLabelInput>,
) -> WorkflowActionResponse {
    let parsed = parse_id(&node_id).and_then(|node_id| {
        let labels = labels
            .iter()
            .map(|input| Ok((parse_id(&input.edge_id)?, input.label.clone())))
            .collect::<Result<Vec<_>, String>>()?;
        Ok((node_id, labels))
    });
    let result = parsed.and_then(|(node_id, labels)| {
        with_workflow(&workflow_id, |store, _| {
            store.update_node_edge_labels(node_id, &labels)
        })
    });
    WorkflowActionResponse::from_result(
        "workflow_set_edge_labels",
        "Edge labels saved.",
        result.map(|()| Some(node_id.trim().to_string())),
    )
}

/// Advisory validation report for one workflow.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_validate(workflow_id: String) -> Vec<ValidationItem> {
    let result = parse_id(&workflow_id).and_then(|workflow_id| {
        with_editor(|editor| {
            let workflow = editor
                .store()
                .workflow(workflow_id)
                .ok_or(StoreError::WorkflowNotFound(workflow_id))?;
            Ok(validate_workflow(workflow))
        })
    });
    match result {
        Ok(issues) => issues
            .into_iter()
            .map(|issue| ValidationItem {
                kind: issue.kind.as_str().to_string(),
                node_id: issue.node_id.map(|id| id.to_string()),
                edge_id: issue.edge_id.map(|id| id.to_string()),
                message: issue.message,
            })
            .collect(),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=workflow_validate error={err}");
            Vec::new()
        }
    }
}

/// Writes an export file under `dir`. Returns the file path.
///
/// Exports `workflow_id` (making it current), or the current workflow when
/// no id is given.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_export(workflow_id: Option<String>, dir: String) -> WorkflowActionResponse {
    let workflow_id = match workflow_id.as_deref().map(parse_id).transpose() {
        Ok(id) => id,
        Err(err) => return WorkflowActionResponse::failure(format!("workflow_export failed: {err}")),
    };
    let result = with_editor(|editor| {
        if let Some(id) = workflow_id {
            editor.apply(|store| store.load_workflow(id))?;
        }
        match editor.export_current(dir.trim()) {
            Ok(path) => Ok(Ok(path.display().to_string())),
            Err(EditorError::Store(StoreError::NoCurrentWorkflow)) => {
                Ok(Err(NO_WORKFLOW_TO_EXPORT_MESSAGE.to_string()))
            }
            Err(err) => Err(err),
        }
    });
    match result {
        Ok(Ok(path)) => WorkflowActionResponse::success("Workflow exported.", Some(path)),
        Ok(Err(message)) => WorkflowActionResponse::failure(message),
        Err(err) => WorkflowActionResponse::failure(format!("workflow_export failed: {err}")),
    }
}

/// Imports a workflow document. It becomes current under a fresh id.
#[flutter_rust_bridge::frb(sync)]
pub fn workflow_import(json: String) -> WorkflowActionResponse {
    let result = with_editor(|editor| match editor.import_from_str(&json) {
        Ok(id) => Ok(Ok(id)),
        Err(EditorError::Transfer(_)) => Ok(Err(editor
            .store()
            .error()
            .unwrap_or_default()
            .to_string())),
        Err(err) => Err(err),
    });
    match result {
        Ok(Ok(id)) => WorkflowActionResponse::success("Workflow imported.", Some(id.to_string())),
        Ok(Err(message)) => WorkflowActionResponse::failure(message),
        Err(err) => WorkflowActionResponse::failure(format!("workflow_import failed: {err}")),
    }
}

/// Step palette, in sidebar category order.
#[flutter_rust_bridge::frb(sync)]
pub fn step_catalog() -> Vec<StepCatalogItem> {
    step_categories()
        .into_iter()
        .flat_map(|(category, steps)| {
            steps.into_iter().map(move |step| StepCatalogItem {
                category: category.to_string(),
                step_type: step.step_type.as_str().to_string(),
                subtype: step.subtype.to_string(),
                label: step.label.to_string(),
                description: step.description.to_string(),
                icon: step.icon.to_string(),
                color: step.color.to_string(),
            })
        })
        .collect()
}

/// API methods offered by the integration method selector, all disabled.
#[flutter_rust_bridge::frb(sync)]
pub fn integration_api_methods() -> Vec<ApiMethodItem> {
    default_api_methods()
        .into_iter()
        .map(|method| ApiMethodItem {
            id: method.id,
            name: method.name,
            enabled: method.enabled,
        })
        .collect()
}

fn list_workflows(store: &WorkflowStore) -> WorkflowListResponse {
    let items = store
        .workflows()
        .iter()
        .map(|workflow| WorkflowSummary {
            id: workflow.id.to_string(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            is_active: workflow.is_active,
            node_count: u32::try_from(workflow.nodes.len()).unwrap_or(u32::MAX),
            edge_count: u32::try_from(workflow.edges.len()).unwrap_or(u32::MAX),
            updated_at_ms: workflow.updated_at.timestamp_millis(),
        })
        .collect::<Vec<_>>();
    let message = format!("{} workflow(s).", items.len());
    WorkflowListResponse {
        items,
        current_workflow_id: store.current_workflow_id().map(|id| id.to_string()),
        message,
    }
}

fn encode_workflow(workflow: &Workflow) -> Result<String, EditorError> {
    serde_json::to_string(workflow).map_err(|err| EditorError::Transfer(TransferError::Json(err)))
}

fn parse_config_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("invalid config json: {err}"))
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid id `{}`: {err}", raw.trim()))
}

fn resolve_db_path() -> PathBuf {
    WORKFLOW_DB_PATH.get_or_init(default_db_path).clone()
}

#[cfg(not(test))]
fn default_db_path() -> PathBuf {
    configured_db_path(std::env::var(DB_PATH_ENV).ok())
}

// Unit tests never share a database file with the app or other runs.
#[cfg(test)]
fn default_db_path() -> PathBuf {
    tests::isolated_db_dir().join(WORKFLOW_DB_FILE_NAME)
}

/// `FLOWCANVAS_DB_PATH` when set and non-blank, else a file in the temp dir.
fn configured_db_path(env_value: Option<String>) -> PathBuf {
    env_value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(WORKFLOW_DB_FILE_NAME))
}

fn with_editor<T>(
    f: impl FnOnce(&mut WorkflowEditor<SqliteWorkflowStorage<'_>>) -> Result<T, EditorError>,
) -> Result<T, String> {
    let _session = EDITOR_SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let conn =
        open_db(resolve_db_path()).map_err(|err| format!("workflow DB open failed: {err}"))?;
    let storage = SqliteWorkflowStorage::try_new(&conn)
        .map_err(|err| format!("workflow storage init failed: {err}"))?;
    let mut editor = WorkflowEditor::new(storage);
    editor.bootstrap();
    if let Some(err) = editor.store().error() {
        return Err(format!("workflow load failed: {err}"));
    }
    f(&mut editor).map_err(|err| err.to_string())
}

/// Runs a store mutation against `workflow_id` after making it current.
fn with_workflow<T>(
    workflow_id: &str,
    mutation: impl FnOnce(&mut WorkflowStore, Uuid) -> Result<T, StoreError>,
) -> Result<T, String> {
    let workflow_id = parse_id(workflow_id)?;
    with_editor(|editor| {
        editor.apply(|store| {
            store.load_workflow(workflow_id)?;
            mutation(store, workflow_id)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::{
        configured_db_path, core_version, init_logging, integration_api_methods, ping,
        resolve_db_path, step_catalog, workflow_add_step, workflow_connect, workflow_create,
        workflow_current_json, workflow_delete, workflow_delete_step, workflow_edge_labels,
        workflow_export, workflow_import, workflow_list, workflow_set_edge_labels,
        workflow_update_step_config, workflow_validate, EdgeLabelInput, DB_PATH_ENV,
        WORKFLOW_DB_FILE_NAME,
    };
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

    pub(super) fn isolated_db_dir() -> &'static Path {
        static DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
        DB_DIR
            .get_or_init(|| tempfile::tempdir().expect("ffi test db dir"))
            .path()
    }

    /// Holds the test database for one whole test, across several calls.
    fn exclusive_db() -> MutexGuard<'static, ()> {
        static DB_TEST: Mutex<()> = Mutex::new(());
        DB_TEST.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create(name: &str) -> String {
        let created = workflow_create(name.to_string(), None);
        assert!(created.ok, "{}", created.message);
        created.id.expect("created workflow id")
    }

    fn add_step(workflow_id: &str, step_type: &str, subtype: &str) -> String {
        let added = workflow_add_step(
            workflow_id.to_string(),
            step_type.to_string(),
            subtype.to_string(),
            10.0,
            20.0,
        );
        assert!(added.ok, "{}", added.message);
        added.id.expect("node id")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn step_catalog_lists_every_palette_entry() {
        let catalog = step_catalog();
        assert_eq!(catalog.len(), 19);
        assert_eq!(catalog[0].category, "Sources");
        assert_eq!(integration_api_methods().len(), 4);
    }

    #[test]
    fn created_workflow_is_listed_and_current() {
        let _db = exclusive_db();
        let id = create("ffi list");
        let listed = workflow_list();
        assert!(listed.items.iter().any(|item| item.id == id));
        assert!(listed.current_workflow_id.is_some());
    }

    #[test]
    fn decision_connection_gets_inferred_label() {
        let _db = exclusive_db();
        let workflow_id = create("ffi connect");
        let decision = add_step(&workflow_id, "decision", "conditional");
        let output = add_step(&workflow_id, "output", "log_output");

        let edge = workflow_connect(
            workflow_id.clone(),
            decision.clone(),
            output,
            Some("false".to_string()),
            None,
            None,
        );
        assert!(edge.ok, "{}", edge.message);

        let labels = workflow_edge_labels(workflow_id.clone(), decision.clone());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label, "No");

        let saved = workflow_set_edge_labels(
            workflow_id.clone(),
            decision.clone(),
            vec![EdgeLabelInput {
                edge_id: labels[0].edge_id.clone(),
                label: "Rejected".to_string(),
            }],
        );
        assert!(saved.ok, "{}", saved.message);
        let labels = workflow_edge_labels(workflow_id, decision);
        assert_eq!(labels[0].label, "Rejected");
    }

    #[test]
    fn output_steps_cannot_start_connections() {
        let _db = exclusive_db();
        let workflow_id = create("ffi reject");
        let output = add_step(&workflow_id, "output", "file_export");
        let processing = add_step(&workflow_id, "processing", "api_call");
        let response = workflow_connect(workflow_id, output, processing, None, None, None);
        assert!(!response.ok);
        assert!(response.message.contains("no output handle"));
    }

    #[test]
    fn step_config_update_keeps_step_type() {
        let _db = exclusive_db();
        let workflow_id = create("ffi config");
        let node = add_step(&workflow_id, "processing", "api_call");

        let saved = workflow_update_step_config(
            workflow_id.clone(),
            node.clone(),
            r#"{"name":"Call CRM","enabled":true,"subtype":"api_call","apiEndpoint":"https://crm.local"}"#
                .to_string(),
        );
        assert!(saved.ok, "{}", saved.message);

        let rejected = workflow_update_step_config(
            workflow_id.clone(),
            node.clone(),
            r#"{"name":"x","subtype":"loop"}"#.to_string(),
        );
        assert!(!rejected.ok);

        let deleted = workflow_delete_step(workflow_id.clone(), node);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(workflow_validate(workflow_id).is_empty());
    }

    #[test]
    fn export_then_import_creates_new_current_workflow() {
        let _db = exclusive_db();
        let workflow_id = create("ffi export");
        add_step(&workflow_id, "source", "webhook");
        let dir = tempfile::tempdir().expect("temp dir");

        let exported = workflow_export(
            Some(workflow_id.clone()),
            dir.path().to_str().expect("utf-8 dir").to_string(),
        );
        assert!(exported.ok, "{}", exported.message);
        let path = exported.id.expect("export path");
        let json = std::fs::read_to_string(path).expect("read export");

        let imported = workflow_import(json);
        assert!(imported.ok, "{}", imported.message);
        let imported_id = imported.id.expect("imported id");
        assert_ne!(imported_id, workflow_id);

        let listed = workflow_list();
        let copy = listed
            .items
            .iter()
            .find(|item| item.id == imported_id)
            .expect("imported workflow listed");
        assert_eq!(copy.name, "ffi export");
        assert_eq!(copy.node_count, 1);

        let current = workflow_current_json();
        assert!(current.ok, "{}", current.message);
        assert!(current.json.is_some());
    }

    #[test]
    fn import_failure_uses_user_message() {
        let _db = exclusive_db();
        let response = workflow_import(r#"{"name":"missing id"}"#.to_string());
        assert!(!response.ok);
        assert_eq!(
            response.message,
            "Failed to import workflow. Please check the file format."
        );
    }

    #[test]
    fn tests_use_isolated_database() {
        assert_eq!(
            resolve_db_path(),
            isolated_db_dir().join(WORKFLOW_DB_FILE_NAME)
        );
    }

    #[test]
    fn db_path_prefers_non_blank_env_value() {
        assert_eq!(DB_PATH_ENV, "FLOWCANVAS_DB_PATH");
        assert_eq!(
            configured_db_path(Some("  /data/flows.sqlite3 ".to_string())),
            PathBuf::from("/data/flows.sqlite3")
        );
        let fallback = std::env::temp_dir().join(WORKFLOW_DB_FILE_NAME);
        assert_eq!(configured_db_path(Some("   ".to_string())), fallback);
        assert_eq!(configured_db_path(None), fallback);
    }

    #[test]
    fn deleting_every_workflow_stays_deleted() {
        let _db = exclusive_db();
        create("ffi delete");

        let listed = workflow_list();
        assert!(!listed.items.is_empty());
        for item in &listed.items {
            let deleted = workflow_delete(item.id.clone());
            assert!(deleted.ok, "{}", deleted.message);
        }

        let after = workflow_list();
        assert!(after.items.is_empty(), "{:?}", after.items);
        assert_eq!(after.current_workflow_id, None);
        let current = workflow_current_json();
        assert!(current.ok, "{}", current.message);
        assert_eq!(current.json, None);
    }
}
