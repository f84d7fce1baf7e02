//! Editor use-case service over the store and local storage.
//!
//! # Responsibility
//! - Restore editor state on startup and seed a first workflow.
//! - Persist state after mutations, the way the UI auto-saves.
//! - Run file export/import and surface failures through the store error.
//!
//! # Invariants
//! - The first workflow is seeded only when storage has never saved a list;
//!   a saved empty list stays empty.
//! - A failed import leaves the workflow list unchanged.

use crate::model::workflow::WorkflowId;
use crate::storage::workflow_storage::{StorageError, WorkflowStorage};
use crate::store::workflow_store::{StoreError, WorkflowStore};
use crate::transfer::workflow_file::{
    export_file_name, export_workflow, import_workflow, TransferError,
};
use chrono::Utc;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Name of the workflow created for a fresh install.
pub const FIRST_WORKFLOW_NAME: &str = "My First Workflow";
pub const FIRST_WORKFLOW_DESCRIPTION: &str = "A simple workflow to get you started";
/// Store error shown after any failed import.
pub const IMPORT_FAILED_MESSAGE: &str = "Failed to import workflow. Please check the file format.";
/// Message the UI shows when export runs without a current workflow.
pub const NO_WORKFLOW_TO_EXPORT_MESSAGE: &str = "No workflow selected to export";

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug)]
pub enum EditorError {
    Store(StoreError),
    Storage(StorageError),
    Transfer(TransferError),
    /// Reading an import file or writing an export file failed.
    Io(std::io::Error),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "workflow file io failed: {err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Transfer(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for EditorError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<StorageError> for EditorError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<TransferError> for EditorError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

impl From<std::io::Error> for EditorError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Editor session: in-memory store plus the storage it saves to.
pub struct WorkflowEditor<S: WorkflowStorage> {
    store: WorkflowStore,
    storage: S,
}

impl<S: WorkflowStorage> WorkflowEditor<S> {
    /// Creates an editor with an empty store. Call [`Self::bootstrap`] next.
    pub fn new(storage: S) -> Self {
        Self {
            store: WorkflowStore::new(),
            storage,
        }
    }

    pub fn store(&self) -> &WorkflowStore {
        &self.store
    }

    /// Direct store access for UI-only updates that need no save.
    pub fn store_mut(&mut self) -> &mut WorkflowStore {
        &mut self.store
    }

    /// Restores saved state, or seeds the first workflow on a fresh install.
    ///
    /// Storage failures never abort startup: they are logged, recorded as the
    /// store error, and the editor starts empty.
    pub fn bootstrap(&mut self) {
        self.store.set_loading(true);

        match self.restore() {
            Ok(true) => {
                info!(
                    "event=editor_bootstrap module=service status=ok workflows={}",
                    self.store.workflows().len()
                );
            }
            Ok(false) => self.seed_first_workflow(),
            Err(err) => {
                error!(
                    "event=editor_bootstrap module=service status=error error_code=storage_load_failed error={err}"
                );
                self.store.set_error(Some(err.to_string()));
            }
        }
        self.store.set_loading(false);
    }

    /// Loads saved state. `false` means storage never saved a workflow list.
    fn restore(&mut self) -> EditorResult<bool> {
        let Some(workflows) = self.storage.load_workflows()? else {
            return Ok(false);
        };
        let current_id = self.storage.load_current_workflow_id()?;
        self.store.load_workflows_from_storage(workflows);
        if let Some(id) = current_id {
            if let Err(err) = self.store.load_workflow(id) {
                warn!(
                    "event=editor_bootstrap module=service status=degraded error_code=current_not_found error={err}"
                );
            }
        }
        Ok(true)
    }

    fn seed_first_workflow(&mut self) {
        let created = self.store.create_workflow(
            FIRST_WORKFLOW_NAME,
            Some(FIRST_WORKFLOW_DESCRIPTION.to_string()),
        );
        match created.map_err(EditorError::from).and_then(|id| self.persist().map(|()| id)) {
            Ok(id) => info!("event=editor_seed module=service status=ok workflow_id={id}"),
            Err(err) => {
                error!("event=editor_seed module=service status=error error={err}");
                self.store.set_error(Some(err.to_string()));
            }
        }
    }

    /// Saves the workflow list, even when empty, and the current id.
    pub fn persist(&self) -> EditorResult<()> {
        self.storage.save_workflows(self.store.workflows())?;
        self.storage
            .save_current_workflow_id(self.store.current_workflow_id())?;
        Ok(())
    }

    /// Runs one store mutation, then saves.
    ///
    /// The mutation result is returned only when the save also succeeded.
    pub fn apply<T>(
        &mut self,
        mutation: impl FnOnce(&mut WorkflowStore) -> Result<T, StoreError>,
    ) -> EditorResult<T> {
        let value = mutation(&mut self.store)?;
        if let Err(err) = self.persist() {
            error!("event=editor_persist module=service status=error error={err}");
            self.store.set_error(Some(err.to_string()));
            return Err(err);
        }
        Ok(value)
    }

    /// Writes the current workflow as an export file under `dir`.
    ///
    /// # Errors
    /// - `Store(NoCurrentWorkflow)` when no workflow is selected.
    pub fn export_current(&self, dir: impl AsRef<Path>) -> EditorResult<PathBuf> {
        let workflow = self
            .store
            .current_workflow()
            .ok_or(StoreError::NoCurrentWorkflow)?;
        let now = Utc::now();
        let document = export_workflow(workflow, now).to_json_pretty()?;
        let path = dir.as_ref().join(export_file_name(workflow, now));

        std::fs::write(&path, document).map_err(|err| {
            error!(
                "event=workflow_export module=service status=error workflow_id={} error={err}",
                workflow.id
            );
            err
        })?;
        info!(
            "event=workflow_export module=service status=ok workflow_id={}",
            workflow.id
        );
        Ok(path)
    }

    /// Imports a workflow document; it becomes current under a fresh id.
    pub fn import_from_str(&mut self, json: &str) -> EditorResult<WorkflowId> {
        let workflow = match import_workflow(json) {
            Ok(workflow) => workflow,
            Err(err) => return Err(self.import_failed(err.into())),
        };
        self.store.clear_error();
        self.apply(|store| Ok(store.import_workflow(workflow)))
    }

    /// Reads `path` and imports it like [`Self::import_from_str`].
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> EditorResult<WorkflowId> {
        match std::fs::read_to_string(path) {
            Ok(json) => self.import_from_str(&json),
            Err(err) => Err(self.import_failed(err.into())),
        }
    }

    fn import_failed(&mut self, err: EditorError) -> EditorError {
        error!("event=workflow_import module=service status=error error={err}");
        self.store.set_error(Some(IMPORT_FAILED_MESSAGE.to_string()));
        err
    }
}
