//! Startup seeding of the initial admin account.

use taskboard_core::roles::UserRole;
use taskboard_db::models::profile::CreateProfile;
use taskboard_db::repositories::ProfileRepo;
use taskboard_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::SeedAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin profile unless one with that email exists.
///
/// Returns `true` when a profile was created. An existing profile is left
/// untouched, whatever its role.
pub async fn ensure_admin(pool: &DbPool, seed: &SeedAdmin) -> AppResult<bool> {
    let email = seed.email.trim().to_lowercase();
    if ProfileRepo::find_by_email(pool, &email).await?.is_some() {
        tracing::debug!(%email, "Seed admin already present");
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = ProfileRepo::create(
        pool,
        &CreateProfile {
            full_name: seed.full_name.clone(),
            email,
            password_hash,
            role: UserRole::Admin,
        },
    )
    .await?;

    tracing::info!(user_id = profile.id, "Seed admin created");
    Ok(true)
}
