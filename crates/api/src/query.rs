//! Query parameter types for list endpoints.

use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::task::{TaskFilter, TaskSortColumn};

/// Raw `GET /tasks` query string.
///
/// Every field arrives as text so that an empty value (`?status=`) can be
/// treated as "no filter" rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<String>,
    pub assigned_to: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl TaskListParams {
    /// Parse into a repository filter. Unknown enum values, non-numeric ids,
    /// or an unknown `sort_by`/`sort_order` are validation errors.
    pub fn into_filter(self) -> Result<TaskFilter, CoreError> {
        let ascending = match non_empty(self.sort_order).as_deref() {
            None | Some("desc") => false,
            Some("asc") => true,
            Some(other) => {
                return Err(CoreError::Validation(format!(
                    "Invalid sort_order '{other}'. Must be one of: asc, desc"
                )))
            }
        };

        Ok(TaskFilter {
            status: non_empty(self.status).map(|s| s.parse()).transpose()?,
            priority: non_empty(self.priority).map(|s| s.parse()).transpose()?,
            category_id: parse_id("category_id", self.category_id)?,
            assigned_to: parse_id("assigned_to", self.assigned_to)?,
            search: non_empty(self.search),
            sort_by: non_empty(self.sort_by)
                .map(|s| s.parse::<TaskSortColumn>())
                .transpose()?
                .unwrap_or_default(),
            ascending,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_id(name: &str, value: Option<String>) -> Result<Option<DbId>, CoreError> {
    non_empty(value)
        .map(|v| {
            v.trim()
                .parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("{name} must be an integer id")))
        })
        .transpose()
}
