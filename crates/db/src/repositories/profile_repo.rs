//! Repository for the `profiles` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::profile::{CreateProfile, Profile, ProfileCredentials, UpdateProfileAccess};

/// Public column list. `password_hash` is deliberately absent.
const COLUMNS: &str = "id, full_name, email, role, is_active, created_at, updated_at";

/// Provides account lookups and admin mutations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (full_name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Load the password hash for login verification.
    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<ProfileCredentials>, sqlx::Error> {
        sqlx::query_as::<_, ProfileCredentials>(
            "SELECT id, password_hash, is_active FROM profiles WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// All profiles, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }

    /// Active profiles ordered by name, for assignee pickers.
    pub async fn list_directory(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles WHERE is_active = true ORDER BY full_name, id"
        );
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }

    /// Batch-load profiles by id. Missing ids are silently skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Profile>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = ANY($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Apply the admin-editable fields present in `input`.
    ///
    /// Returns `None` if no profile with the given `id` exists. An empty
    /// `input` performs no write and returns the current row.
    pub async fn update_access(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfileAccess,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_idx = 2u32;
        let mut bind_values: Vec<AccessBindValue> = Vec::new();

        if let Some(role) = input.role {
            sets.push(format!("role = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(AccessBindValue::Text(role.as_str()));
        }

        if let Some(is_active) = input.is_active {
            sets.push(format!("is_active = ${bind_idx}"));
            bind_values.push(AccessBindValue::Bool(is_active));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE profiles SET {} WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Profile>(&query).bind(id);
        for val in &bind_values {
            match val {
                AccessBindValue::Text(v) => q = q.bind(*v),
                AccessBindValue::Bool(v) => q = q.bind(*v),
            }
        }

        q.fetch_optional(pool).await
    }

    /// Total number of profiles, active or not.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(pool)
            .await
    }
}

/// Typed bind value for the dynamic `SET` clause in `update_access`.
enum AccessBindValue {
    Text(&'static str),
    Bool(bool),
}
