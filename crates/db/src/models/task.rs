//! Task model, joined detail shape, and list filter types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::analytics::{AnalyticsTask, AssigneeRef};
use taskboard_core::error::CoreError;
use taskboard_core::tasks::{TaskPriority, TaskState, TaskStatus};
use taskboard_core::types::{deserialize_db_timestamp, DbId, Timestamp};

use crate::models::category::Category;
use crate::models::profile::Profile;

/// A row from the `tasks` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub due_date: Option<Timestamp>,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub is_deleted: bool,
}

impl Task {
    /// The editable columns, as input to the update planner.
    pub fn state(&self) -> TaskState {
        TaskState {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            category_id: self.category_id,
            assigned_to: self.assigned_to,
            completed_at: self.completed_at,
        }
    }
}

/// A task with its creator, assignee, and category embedded.
///
/// Serializes as the flat task columns plus `creator`, `assignee`, and
/// `category` objects (`null` when absent).
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub creator: Option<Profile>,
    pub assignee: Option<Profile>,
    pub category: Option<Category>,
}

/// DTO for creating a task. Missing fields take the column defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "deserialize_db_timestamp")]
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub assigned_to: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Columns a task listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSortColumn {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
    Priority,
    Status,
}

impl TaskSortColumn {
    pub const ALL: [TaskSortColumn; 6] = [
        TaskSortColumn::CreatedAt,
        TaskSortColumn::UpdatedAt,
        TaskSortColumn::DueDate,
        TaskSortColumn::Title,
        TaskSortColumn::Priority,
        TaskSortColumn::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DueDate => "due_date",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::Status => "status",
        }
    }

    /// SQL expression used in `ORDER BY`. Priority and status sort by their
    /// natural rank rather than alphabetically.
    pub(crate) fn order_expr(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DueDate => "due_date",
            Self::Title => "lower(title)",
            Self::Priority => {
                "CASE priority WHEN 'low' THEN 1 WHEN 'medium' THEN 2 \
                 WHEN 'high' THEN 3 WHEN 'urgent' THEN 4 END"
            }
            Self::Status => {
                "CASE status WHEN 'todo' THEN 1 WHEN 'in_progress' THEN 2 \
                 WHEN 'on_hold' THEN 3 WHEN 'completed' THEN 4 END"
            }
        }
    }
}

impl std::str::FromStr for TaskSortColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid sort_by '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Filters and ordering for `TaskRepo::list`. Deleted tasks are always
/// excluded regardless of the filter.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    pub sort_by: TaskSortColumn,
    pub ascending: bool,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Task row joined with category and assignee names, for analytics.
#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsRow {
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
    pub category_name: Option<String>,
    pub assignee_id: Option<DbId>,
    pub assignee_name: Option<String>,
    pub assignee_email: Option<String>,
}

impl From<AnalyticsRow> for AnalyticsTask {
    fn from(row: AnalyticsRow) -> Self {
        let assignee = row.assignee_id.map(|id| AssigneeRef {
            id,
            full_name: row.assignee_name.unwrap_or_default(),
            email: row.assignee_email.unwrap_or_default(),
        });
        AnalyticsTask {
            status: row.status,
            priority: row.priority,
            due_date: row.due_date,
            category_name: row.category_name,
            assignee,
        }
    }
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Serialize, FromRow)]
pub struct TaskCounts {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub overdue_tasks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_parses_known_names() {
        for column in TaskSortColumn::ALL {
            assert_eq!(column.as_str().parse::<TaskSortColumn>().unwrap(), column);
        }
    }

    #[test]
    fn sort_column_rejects_arbitrary_sql() {
        assert!("id; DROP TABLE tasks".parse::<TaskSortColumn>().is_err());
        assert!("is_deleted".parse::<TaskSortColumn>().is_err());
    }
}
