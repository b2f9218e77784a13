//! Admin analytics over the active task set.
//!
//! [`aggregate`] makes a single pass over every non-deleted task and produces
//! grouped counts plus the overdue count and completion rate.

use indexmap::IndexMap;
use serde::Serialize;

use crate::tasks::{TaskPriority, TaskStatus};
use crate::types::{DbId, Timestamp};

/// Label used for tasks that have no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Number of assignees reported in [`TaskAnalytics::user_breakdown`].
pub const TOP_ASSIGNEE_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The slice of a task (plus joined names) that analytics needs.
#[derive(Debug, Clone)]
pub struct AnalyticsTask {
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
    pub category_name: Option<String>,
    pub assignee: Option<AssigneeRef>,
}

#[derive(Debug, Clone)]
pub struct AssigneeRef {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
}

impl AssigneeRef {
    /// Full name, or the email when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub todo: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub on_hold: i64,
}

impl StatusBreakdown {
    fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => self.todo += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::OnHold => self.on_hold += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub urgent: i64,
}

impl PriorityBreakdown {
    fn record(&mut self, priority: TaskPriority) {
        match priority {
            TaskPriority::Low => self.low += 1,
            TaskPriority::Medium => self.medium += 1,
            TaskPriority::High => self.high += 1,
            TaskPriority::Urgent => self.urgent += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeCount {
    pub id: DbId,
    pub name: String,
    pub count: i64,
}

/// Response body of `GET /admin/analytics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskAnalytics {
    pub total_tasks: i64,
    pub overdue: i64,
    pub completion_rate: i64,
    pub status_breakdown: StatusBreakdown,
    pub priority_breakdown: PriorityBreakdown,
    pub category_breakdown: Vec<CategoryCount>,
    pub user_breakdown: Vec<AssigneeCount>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// A task is overdue when its due date is strictly in the past and it is not
/// completed.
pub fn is_overdue(status: TaskStatus, due_date: Option<Timestamp>, now: Timestamp) -> bool {
    !status.is_completed() && due_date.is_some_and(|due| due < now)
}

/// `round(completed / total * 100)`, rounding halves up; 0 when there are no
/// tasks.
pub fn completion_rate(completed: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (completed * 200 + total) / (total * 2)
}

/// Compute every analytics figure in one pass over `tasks`.
///
/// Categories keep the order in which they were first seen. Assignees are
/// ranked by task count, ties broken by ascending id, and truncated to
/// [`TOP_ASSIGNEE_LIMIT`].
pub fn aggregate(tasks: &[AnalyticsTask], now: Timestamp) -> TaskAnalytics {
    let mut status_breakdown = StatusBreakdown::default();
    let mut priority_breakdown = PriorityBreakdown::default();
    let mut categories: IndexMap<&str, i64> = IndexMap::new();
    let mut assignees: IndexMap<DbId, AssigneeCount> = IndexMap::new();
    let mut overdue = 0;

    for task in tasks {
        status_breakdown.record(task.status);
        priority_breakdown.record(task.priority);

        let category = task.category_name.as_deref().unwrap_or(UNCATEGORIZED);
        *categories.entry(category).or_insert(0) += 1;

        if let Some(assignee) = &task.assignee {
            assignees
                .entry(assignee.id)
                .or_insert_with(|| AssigneeCount {
                    id: assignee.id,
                    name: assignee.display_name().to_string(),
                    count: 0,
                })
                .count += 1;
        }

        if is_overdue(task.status, task.due_date, now) {
            overdue += 1;
        }
    }

    let total_tasks = tasks.len() as i64;

    let category_breakdown = categories
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_string(),
            count,
        })
        .collect();

    let mut user_breakdown: Vec<AssigneeCount> = assignees.into_values().collect();
    user_breakdown.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
    user_breakdown.truncate(TOP_ASSIGNEE_LIMIT);

    TaskAnalytics {
        total_tasks,
        overdue,
        completion_rate: completion_rate(status_breakdown.completed, total_tasks),
        status_breakdown,
        priority_breakdown,
        category_breakdown,
        user_breakdown,
    }
}
