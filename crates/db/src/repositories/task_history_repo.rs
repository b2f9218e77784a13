//! Repository for the append-only `task_history` table.
//!
//! Only inserts and selects live here; history rows are never modified.

use std::collections::HashMap;

use sqlx::PgPool;
use taskboard_core::tasks::FieldChange;
use taskboard_core::types::DbId;

use crate::models::task_history::{HistoryDetail, TaskHistoryEntry};
use crate::repositories::ProfileRepo;

const COLUMNS: &str =
    "id, task_id, changed_by, field_name, old_value, new_value, change_timestamp";

pub struct TaskHistoryRepo;

impl TaskHistoryRepo {
    /// Append one row per change in a single statement, all attributed to
    /// `changed_by`. Returns the number of rows written.
    pub async fn append(
        pool: &PgPool,
        task_id: DbId,
        changed_by: DbId,
        changes: &[FieldChange],
    ) -> Result<u64, sqlx::Error> {
        if changes.is_empty() {
            return Ok(0);
        }

        let field_names: Vec<&str> = changes.iter().map(|c| c.field_name).collect();
        let old_values: Vec<Option<&str>> =
            changes.iter().map(|c| c.old_value.as_deref()).collect();
        let new_values: Vec<Option<&str>> =
            changes.iter().map(|c| c.new_value.as_deref()).collect();

        let result = sqlx::query(
            "INSERT INTO task_history (task_id, changed_by, field_name, old_value, new_value)
             SELECT $1, $2, f.field_name, f.old_value, f.new_value
             FROM UNNEST($3::text[], $4::text[], $5::text[])
                  AS f(field_name, old_value, new_value)",
        )
        .bind(task_id)
        .bind(changed_by)
        .bind(&field_names)
        .bind(&old_values)
        .bind(&new_values)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// History for a task, newest first, with the acting user embedded.
    /// Entries remain readable after the task is soft-deleted.
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<HistoryDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_history WHERE task_id = $1 \
             ORDER BY change_timestamp DESC, id DESC"
        );
        let entries = sqlx::query_as::<_, TaskHistoryEntry>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await?;

        let mut user_ids: Vec<DbId> = entries.iter().map(|e| e.changed_by).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let changers: HashMap<DbId, _> = ProfileRepo::find_many(pool, &user_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| HistoryDetail {
                changer: changers.get(&entry.changed_by).cloned(),
                entry,
            })
            .collect())
    }
}
