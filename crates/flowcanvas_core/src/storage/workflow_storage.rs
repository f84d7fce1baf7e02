//! Key/value workflow storage over the `local_storage` table.
//!
//! # Invariants
//! - `WORKFLOWS_KEY` holds a JSON array of workflows, possibly empty. A
//!   missing key means nothing was ever saved.
//! - `CURRENT_WORKFLOW_KEY` holds the bare id text, and is absent when no
//!   workflow is current.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::workflow::{Workflow, WorkflowId};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Key of the persisted workflow list.
pub const WORKFLOWS_KEY: &str = "workflow-automation-workflows";
/// Key of the persisted current workflow id.
pub const CURRENT_WORKFLOW_KEY: &str = "workflow-automation-current";

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Connection schema is not at the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    Serialization(serde_json::Error),
    /// Stored value exists but cannot be decoded.
    InvalidData { key: &'static str, message: String },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "storage connection not migrated: expected schema {expected_version}, found {actual_version}"
            ),
            Self::Serialization(err) => write!(f, "failed to encode stored value: {err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored value for `{key}`: {message}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract used by the editor service.
pub trait WorkflowStorage {
    fn save_workflows(&self, workflows: &[Workflow]) -> StorageResult<()>;
    /// `None` when nothing was saved yet; a saved empty list is `Some(vec![])`.
    fn load_workflows(&self) -> StorageResult<Option<Vec<Workflow>>>;
    /// `None` removes the stored pointer.
    fn save_current_workflow_id(&self, id: Option<WorkflowId>) -> StorageResult<()>;
    fn load_current_workflow_id(&self) -> StorageResult<Option<WorkflowId>>;
}

/// SQLite-backed workflow storage.
pub struct SqliteWorkflowStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkflowStorage<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StorageError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", params![key])?;
        Ok(())
    }
}

impl WorkflowStorage for SqliteWorkflowStorage<'_> {
    fn save_workflows(&self, workflows: &[Workflow]) -> StorageResult<()> {
        let encoded = serde_json::to_string(workflows).map_err(StorageError::Serialization)?;
        self.write(WORKFLOWS_KEY, &encoded)?;
        debug!(
            "event=storage_save module=storage status=ok key={WORKFLOWS_KEY} count={}",
            workflows.len()
        );
        Ok(())
    }

    fn load_workflows(&self) -> StorageResult<Option<Vec<Workflow>>> {
        let Some(raw) = self.read(WORKFLOWS_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|err| {
            warn!(
                "event=storage_load module=storage status=error key={WORKFLOWS_KEY} error_code=invalid_data error={err}"
            );
            StorageError::InvalidData {
                key: WORKFLOWS_KEY,
                message: err.to_string(),
            }
        })
    }

    fn save_current_workflow_id(&self, id: Option<WorkflowId>) -> StorageResult<()> {
        match id {
            Some(id) => self.write(CURRENT_WORKFLOW_KEY, &id.to_string()),
            None => self.remove(CURRENT_WORKFLOW_KEY),
        }
    }

    fn load_current_workflow_id(&self) -> StorageResult<Option<WorkflowId>> {
        let Some(raw) = self.read(CURRENT_WORKFLOW_KEY)? else {
            return Ok(None);
        };
        Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(|err| StorageError::InvalidData {
                key: CURRENT_WORKFLOW_KEY,
                message: err.to_string(),
            })
    }
}
