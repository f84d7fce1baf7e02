//! Export document encoding and tolerant import decoding.
//!
//! # Responsibility
//! - Produce the portable JSON document for one workflow.
//! - Accept documents from this editor (and older saves) back into the model.
//!
//! # Invariants
//! - Export stamps `version`, `exportedAt` and `format`.
//! - Import requires `id`, `name`, `nodes` and `edges`; other fields default.
//! - Unknown top-level fields are ignored on import.
//! - A non-UUID `id` is accepted and replaced by a fresh UUID.

use crate::model::workflow::Workflow;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Value of `format` in exported documents.
pub const EXPORT_FORMAT: &str = "workflow-automation-v1";
/// Value written to `version` in exported documents.
pub const EXPORT_VERSION: &str = "1.0";

const REQUIRED_TEXT_FIELDS: [&str; 2] = ["id", "name"];
const REQUIRED_LIST_FIELDS: [&str; 2] = ["nodes", "edges"];

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug)]
pub enum TransferError {
    /// Input is not JSON, or the document could not be encoded.
    Json(serde_json::Error),
    /// Top-level value is not an object.
    NotAnObject,
    MissingField(&'static str),
    /// Required fields exist but the document does not decode as a workflow.
    InvalidWorkflow(String),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid workflow json: {err}"),
            Self::NotAnObject => write!(f, "workflow document must be a json object"),
            Self::MissingField(field) => write!(f, "workflow document is missing `{field}`"),
            Self::InvalidWorkflow(message) => write!(f, "invalid workflow format: {message}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Portable export document: the workflow plus export stamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExport {
    #[serde(flatten)]
    pub workflow: Workflow,
    pub exported_at: DateTime<Utc>,
    pub format: String,
}

impl WorkflowExport {
    /// Pretty-printed JSON, as written to export files.
    pub fn to_json_pretty(&self) -> TransferResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the export document for `workflow` stamped at `now`.
pub fn export_workflow(workflow: &Workflow, now: DateTime<Utc>) -> WorkflowExport {
    let mut workflow = workflow.clone();
    workflow.version = EXPORT_VERSION.to_string();
    WorkflowExport {
        workflow,
        exported_at: now,
        format: EXPORT_FORMAT.to_string(),
    }
}

/// File name for an export taken at `now`: `{name}-{epoch_millis}.json`.
///
/// Path separators in the name are replaced so the result stays one file.
pub fn export_file_name(workflow: &Workflow, now: DateTime<Utc>) -> String {
    let name: String = workflow
        .name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("{name}-{}.json", now.timestamp_millis())
}

/// Decodes an exported (or hand-written) workflow document.
pub fn import_workflow(json: &str) -> TransferResult<Workflow> {
    import_workflow_at(json, Utc::now())
}

/// Same as [`import_workflow`], using `now` for missing timestamps.
pub fn import_workflow_at(json: &str, now: DateTime<Utc>) -> TransferResult<Workflow> {
    let Value::Object(mut document) = serde_json::from_str::<Value>(json)? else {
        return Err(TransferError::NotAnObject);
    };

    for field in REQUIRED_TEXT_FIELDS {
        let present = document
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|value| !value.trim().is_empty());
        if !present {
            return Err(TransferError::MissingField(field));
        }
    }
    for field in REQUIRED_LIST_FIELDS {
        if document.get(field).map_or(true, Value::is_null) {
            return Err(TransferError::MissingField(field));
        }
    }

    let foreign_id = document
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| Uuid::parse_str(id.trim()).is_err());
    if foreign_id {
        document.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }

    let stamp = Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    fill_missing(&mut document, "createdAt", &stamp);
    fill_missing(&mut document, "updatedAt", &stamp);

    serde_json::from_value(Value::Object(document))
        .map_err(|err| TransferError::InvalidWorkflow(err.to_string()))
}

fn fill_missing(document: &mut Map<String, Value>, field: &str, value: &Value) {
    let missing = document.get(field).map_or(true, |current| match current {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    });
    if missing {
        document.insert(field.to_string(), value.clone());
    }
}
