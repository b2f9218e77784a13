//! Append-only task history model.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::profile::Profile;

/// A row from the `task_history` table. Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaskHistoryEntry {
    pub id: DbId,
    pub task_id: DbId,
    pub changed_by: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_timestamp: Timestamp,
}

/// A history entry with the acting user embedded as `changer`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryDetail {
    #[serde(flatten)]
    pub entry: TaskHistoryEntry,
    pub changer: Option<Profile>,
}
