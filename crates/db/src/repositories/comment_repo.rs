//! Repository for the `task_comments` table.

use std::collections::HashMap;

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::comment::{Comment, CommentDetail};
use crate::repositories::ProfileRepo;

const COLUMNS: &str = "id, task_id, user_id, comment_text, created_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment. `comment_text` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        comment_text: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_comments (task_id, user_id, comment_text)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(comment_text)
            .fetch_one(pool)
            .await
    }

    /// All comments on a task, oldest first, with authors embedded.
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<CommentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_comments WHERE task_id = $1 ORDER BY created_at, id"
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await?;
        Self::attach_authors(pool, comments).await
    }

    pub async fn attach_authors(
        pool: &PgPool,
        comments: Vec<Comment>,
    ) -> Result<Vec<CommentDetail>, sqlx::Error> {
        let mut user_ids: Vec<DbId> = comments.iter().map(|c| c.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let authors: HashMap<DbId, _> = ProfileRepo::find_many(pool, &user_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| CommentDetail {
                user: authors.get(&comment.user_id).cloned(),
                comment,
            })
            .collect())
    }
}
