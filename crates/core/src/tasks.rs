//! Task enums, validation, and the mutation/history planner.
//!
//! [`plan_update`] compares a proposed [`TaskPatch`] against the current
//! [`TaskState`] and produces an [`UpdatePlan`]: the columns to write plus one
//! [`FieldChange`] per field whose value actually differs. The repository
//! layer executes the plan as a single `UPDATE` followed by one history insert.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{deserialize_db_timestamp, DbId, Timestamp};

/// Minimum title length in characters.
pub const MIN_TITLE_LENGTH: usize = 3;

/// History sentinel recorded when a task is created.
pub const HISTORY_CREATED: &str = "created";

/// History sentinel recorded when a task is soft-deleted.
pub const HISTORY_DELETED: &str = "deleted";

// ---------------------------------------------------------------------------
// Status / priority
// ---------------------------------------------------------------------------

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    OnHold,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::OnHold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

macro_rules! impl_text_enum {
    ($name:ident, $label:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        let valid: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        CoreError::Validation(format!(
                            "Invalid {} '{s}'. Must be one of: {}",
                            $label,
                            valid.join(", ")
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

impl_text_enum!(TaskStatus, "status");
impl_text_enum!(TaskPriority, "priority");

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject titles shorter than [`MIN_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.chars().count() < MIN_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at least {MIN_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// `completed_at` for a freshly created task.
pub fn completed_at_for_new(status: TaskStatus, now: Timestamp) -> Option<Timestamp> {
    status.is_completed().then_some(now)
}

// ---------------------------------------------------------------------------
// Current state / proposed patch
// ---------------------------------------------------------------------------

/// The editable columns of a task row, as currently stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskState {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<Timestamp>,
    pub category_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub completed_at: Option<Timestamp>,
}

/// A partial update restricted to the allow-listed fields.
///
/// Nullable columns use `Option<Option<T>>`: the outer `None` means "not in
/// the payload", `Some(None)` means "explicitly set to null". Any key outside
/// the allow-list is ignored during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "deserialize_nullable_due_date")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub category_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub assigned_to: Option<Option<DbId>>,
}

/// Distinguish a present `null` from an absent key.
fn deserialize_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// As [`deserialize_nullable`], truncating to what the column stores so an
/// unchanged due date diffs as equal.
fn deserialize_nullable_due_date<'de, D>(
    deserializer: D,
) -> Result<Option<Option<Timestamp>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_db_timestamp(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Columns staged for a single `UPDATE`. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<Timestamp>>,
    pub category_id: Option<Option<DbId>>,
    pub assigned_to: Option<Option<DbId>>,
    pub completed_at: Option<Option<Timestamp>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.category_id.is_none()
            && self.assigned_to.is_none()
            && self.completed_at.is_none()
    }
}

/// One audit row to append: a field name with stringified old/new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field_name: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl FieldChange {
    /// The entry written when a task is created.
    pub fn created(title: &str) -> Self {
        Self {
            field_name: HISTORY_CREATED,
            old_value: None,
            new_value: Some(title.to_string()),
        }
    }

    /// The entry written when a task is soft-deleted.
    pub fn deleted() -> Self {
        Self {
            field_name: HISTORY_DELETED,
            old_value: Some("false".to_string()),
            new_value: Some("true".to_string()),
        }
    }
}

/// Output of [`plan_update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePlan {
    pub update: TaskUpdate,
    pub changes: Vec<FieldChange>,
}

impl UpdatePlan {
    /// True when nothing would be written.
    pub fn is_noop(&self) -> bool {
        self.update.is_empty()
    }
}

/// Diff `patch` against `current` and derive the completion side effect.
///
/// Only fields that are present and differ by value are staged. The
/// completion rule keys off the proposed status alone: moving into
/// `completed` stamps `now`, and any non-completed status clears a set
/// `completed_at`.
pub fn plan_update(
    current: &TaskState,
    patch: &TaskPatch,
    now: Timestamp,
) -> Result<UpdatePlan, CoreError> {
    let mut changes = Vec::new();
    let mut update = TaskUpdate {
        title: stage(
            "title",
            &current.title,
            patch.title.as_ref(),
            render_text,
            &mut changes,
        ),
        description: stage(
            "description",
            &current.description,
            patch.description.as_ref(),
            render_text,
            &mut changes,
        ),
        priority: stage(
            "priority",
            &current.priority,
            patch.priority.as_ref(),
            |p| Some(p.as_str().to_string()),
            &mut changes,
        ),
        status: stage(
            "status",
            &current.status,
            patch.status.as_ref(),
            |s| Some(s.as_str().to_string()),
            &mut changes,
        ),
        due_date: stage(
            "due_date",
            &current.due_date,
            patch.due_date.as_ref(),
            |d| d.map(|ts| ts.to_rfc3339()),
            &mut changes,
        ),
        category_id: stage(
            "category_id",
            &current.category_id,
            patch.category_id.as_ref(),
            render_id,
            &mut changes,
        ),
        assigned_to: stage(
            "assigned_to",
            &current.assigned_to,
            patch.assigned_to.as_ref(),
            render_id,
            &mut changes,
        ),
        completed_at: None,
    };

    if let Some(title) = &update.title {
        validate_title(title)?;
    }

    update.completed_at = match patch.status {
        Some(TaskStatus::Completed) if !current.status.is_completed() => Some(Some(now)),
        Some(status) if !status.is_completed() && current.completed_at.is_some() => Some(None),
        _ => None,
    };

    Ok(UpdatePlan { update, changes })
}

/// Stage `proposed` if it differs from `current`, recording a history entry.
fn stage<T, F>(
    field_name: &'static str,
    current: &T,
    proposed: Option<&T>,
    render: F,
    changes: &mut Vec<FieldChange>,
) -> Option<T>
where
    T: PartialEq + Clone,
    F: Fn(&T) -> Option<String>,
{
    let proposed = proposed.filter(|p| *p != current)?;
    changes.push(FieldChange {
        field_name,
        old_value: render(current),
        new_value: render(proposed),
    });
    Some(proposed.clone())
}

/// Empty text is recorded as null, matching how blank values are displayed.
fn render_text(value: &String) -> Option<String> {
    (!value.is_empty()).then(|| value.clone())
}

fn render_id(value: &Option<DbId>) -> Option<String> {
    value.map(|id| id.to_string())
}
