//! Repository for the `tasks` table.
//!
//! Every read and write here excludes soft-deleted rows. Joined
//! [`TaskDetail`] records are assembled by batch-loading the referenced
//! profiles and categories in two extra queries, regardless of how many
//! tasks are being returned.

use std::collections::HashMap;

use sqlx::PgPool;
use taskboard_core::tasks::{completed_at_for_new, TaskStatus, TaskUpdate};
use taskboard_core::types::{DbId, Timestamp};

use crate::models::task::{AnalyticsRow, CreateTask, Task, TaskCounts, TaskDetail, TaskFilter};
use crate::repositories::{CategoryRepo, ProfileRepo};

const COLUMNS: &str = "id, title, description, created_by, assigned_to, priority, status, \
                       due_date, category_id, created_at, updated_at, completed_at, is_deleted";

/// Number of tasks shown in the dashboard's recent list.
pub const RECENT_TASK_LIMIT: i64 = 5;

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task owned by `created_by`, applying column defaults for
    /// omitted fields. The caller validates the title beforehand.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateTask,
        now: Timestamp,
    ) -> Result<Task, sqlx::Error> {
        let priority = input.priority.unwrap_or_default();
        let status = input.status.unwrap_or_default();
        let query = format!(
            "INSERT INTO tasks (title, description, created_by, assigned_to, priority, status,
                                due_date, category_id, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(input.description.as_deref().unwrap_or(""))
            .bind(created_by)
            .bind(input.assigned_to)
            .bind(priority.as_str())
            .bind(status.as_str())
            .bind(input.due_date)
            .bind(input.category_id)
            .bind(completed_at_for_new(status, now))
            .fetch_one(pool)
            .await
    }

    /// Find a non-deleted task by id.
    pub async fn find_active_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-deleted task with its creator, assignee and category.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TaskDetail>, sqlx::Error> {
        match Self::find_active_by_id(pool, id).await? {
            Some(task) => Ok(Self::attach_relations(pool, vec![task]).await?.pop()),
            None => Ok(None),
        }
    }

    /// True when a non-deleted task with this id exists.
    pub async fn exists_active(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1 AND is_deleted = false)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// List non-deleted tasks matching `filter`, joined.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let (where_clause, bind_values) = build_task_filter(filter);
        let direction = if filter.ascending { "ASC" } else { "DESC" };
        let query = format!(
            "SELECT {COLUMNS} FROM tasks {where_clause} \
             ORDER BY {} {direction}, id {direction}",
            filter.sort_by.order_expr()
        );

        let mut q = sqlx::query_as::<_, Task>(&query);
        for val in &bind_values {
            match val {
                FilterBindValue::BigInt(v) => q = q.bind(*v),
                FilterBindValue::Text(v) => q = q.bind(v.as_str()),
            }
        }
        let tasks = q.fetch_all(pool).await?;

        Self::attach_relations(pool, tasks).await
    }

    /// The newest non-deleted tasks, joined.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE is_deleted = false \
             ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Self::attach_relations(pool, tasks).await
    }

    /// Write the staged columns in a single statement.
    ///
    /// Returns `None` when the task does not exist or is deleted. An empty
    /// update performs no write and returns the current row.
    pub async fn apply_update(
        pool: &PgPool,
        id: DbId,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, sqlx::Error> {
        let (sets, bind_values) = build_task_sets(update);

        if sets.is_empty() {
            return Self::find_active_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 AND is_deleted = false RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);
        for val in &bind_values {
            match val {
                SetBindValue::Text(v) => q = q.bind(v.as_str()),
                SetBindValue::NullableBigInt(v) => q = q.bind(*v),
                SetBindValue::NullableTimestamp(v) => q = q.bind(*v),
            }
        }

        q.fetch_optional(pool).await
    }

    /// Mark a non-deleted task as deleted.
    ///
    /// Returns `true` if a row was updated; `false` when the task is missing
    /// or already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tasks SET is_deleted = true WHERE id = $1 AND is_deleted = false")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every non-deleted task with its category name and assignee identity.
    pub async fn list_for_analytics(pool: &PgPool) -> Result<Vec<AnalyticsRow>, sqlx::Error> {
        sqlx::query_as::<_, AnalyticsRow>(
            "SELECT t.status, t.priority, t.due_date,
                    c.name AS category_name,
                    p.id AS assignee_id, p.full_name AS assignee_name, p.email AS assignee_email
             FROM tasks t
             LEFT JOIN task_categories c ON c.id = t.category_id
             LEFT JOIN profiles p ON p.id = t.assigned_to
             WHERE t.is_deleted = false
             ORDER BY t.created_at, t.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Headline counts over non-deleted tasks.
    pub async fn counts(pool: &PgPool, now: Timestamp) -> Result<TaskCounts, sqlx::Error> {
        sqlx::query_as::<_, TaskCounts>(
            "SELECT COUNT(*) AS total_tasks,
                    COUNT(*) FILTER (WHERE status = $1) AS completed_tasks,
                    COUNT(*) FILTER (WHERE status = $2) AS in_progress_tasks,
                    COUNT(*) FILTER (WHERE status <> $1 AND due_date < $3) AS overdue_tasks
             FROM tasks
             WHERE is_deleted = false",
        )
        .bind(TaskStatus::Completed.as_str())
        .bind(TaskStatus::InProgress.as_str())
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Embed creator, assignee and category into each task, preserving order.
    pub async fn attach_relations(
        pool: &PgPool,
        tasks: Vec<Task>,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let mut profile_ids: Vec<DbId> = tasks
            .iter()
            .flat_map(|t| std::iter::once(t.created_by).chain(t.assigned_to))
            .collect();
        profile_ids.sort_unstable();
        profile_ids.dedup();

        let mut category_ids: Vec<DbId> = tasks.iter().filter_map(|t| t.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let profiles: HashMap<DbId, _> = ProfileRepo::find_many(pool, &profile_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let categories: HashMap<DbId, _> = CategoryRepo::find_many(pool, &category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(tasks
            .into_iter()
            .map(|task| TaskDetail {
                creator: profiles.get(&task.created_by).cloned(),
                assignee: task.assigned_to.and_then(|id| profiles.get(&id).cloned()),
                category: task.category_id.and_then(|id| categories.get(&id).cloned()),
                task,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for the listing `WHERE` clause.
enum FilterBindValue {
    BigInt(i64),
    Text(String),
}

/// Typed bind value for the update `SET` clause.
enum SetBindValue {
    Text(String),
    NullableBigInt(Option<i64>),
    NullableTimestamp(Option<Timestamp>),
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the `WHERE` clause for a listing. Always starts with the
/// soft-delete exclusion; bind indices start at `$1`.
fn build_task_filter(filter: &TaskFilter) -> (String, Vec<FilterBindValue>) {
    let mut conditions: Vec<String> = vec!["is_deleted = false".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<FilterBindValue> = Vec::new();

    if let Some(status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(FilterBindValue::Text(status.as_str().to_string()));
    }

    if let Some(priority) = filter.priority {
        conditions.push(format!("priority = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(FilterBindValue::Text(priority.as_str().to_string()));
    }

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(FilterBindValue::BigInt(category_id));
    }

    if let Some(assigned_to) = filter.assigned_to {
        conditions.push(format!("assigned_to = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(FilterBindValue::BigInt(assigned_to));
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!("title ILIKE ${bind_idx} ESCAPE '\\'"));
        bind_values.push(FilterBindValue::Text(format!("%{}%", escape_like(search))));
    }

    (format!("WHERE {}", conditions.join(" AND ")), bind_values)
}

/// Build the `SET` assignments for a staged update; `$1` is reserved for id.
fn build_task_sets(update: &TaskUpdate) -> (Vec<String>, Vec<SetBindValue>) {
    let mut sets: Vec<String> = Vec::new();
    let mut bind_values: Vec<SetBindValue> = Vec::new();

    let mut push = |column: &str, value: SetBindValue| {
        let idx = sets.len() + 2;
        sets.push(format!("{column} = ${idx}"));
        bind_values.push(value);
    };

    if let Some(ref title) = update.title {
        push("title", SetBindValue::Text(title.clone()));
    }
    if let Some(ref description) = update.description {
        push("description", SetBindValue::Text(description.clone()));
    }
    if let Some(priority) = update.priority {
        push("priority", SetBindValue::Text(priority.as_str().to_string()));
    }
    if let Some(status) = update.status {
        push("status", SetBindValue::Text(status.as_str().to_string()));
    }
    if let Some(due_date) = update.due_date {
        push("due_date", SetBindValue::NullableTimestamp(due_date));
    }
    if let Some(category_id) = update.category_id {
        push("category_id", SetBindValue::NullableBigInt(category_id));
    }
    if let Some(assigned_to) = update.assigned_to {
        push("assigned_to", SetBindValue::NullableBigInt(assigned_to));
    }
    if let Some(completed_at) = update.completed_at {
        push("completed_at", SetBindValue::NullableTimestamp(completed_at));
    }

    (sets, bind_values)
}
