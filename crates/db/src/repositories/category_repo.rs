//! Repository for the `task_categories` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::category::{Category, CreateCategory};

const COLUMNS: &str = "id, name, description, color_hex, created_by, created_at";

/// Color assigned when a new category does not specify one.
pub const DEFAULT_COLOR_HEX: &str = "#6366f1";

pub struct CategoryRepo;

impl CategoryRepo {
    /// All categories by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_categories ORDER BY name, id");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Insert a category. A duplicate name violates `uq_task_categories_name`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
        created_by: DbId,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_categories (name, description, color_hex, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .bind(input.description.as_deref().unwrap_or(""))
            .bind(input.color_hex.as_deref().unwrap_or(DEFAULT_COLOR_HEX))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Batch-load categories by id.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Category>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM task_categories WHERE id = ANY($1)");
        sqlx::query_as::<_, Category>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
