//! Profile (user account) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::roles::UserRole;
use taskboard_core::types::{DbId, Timestamp};

/// Public profile row. Safe to serialize; carries no credentials.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Login lookup row. Contains the password hash -- NEVER serialize this.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileCredentials {
    pub id: DbId,
    pub password_hash: String,
    pub is_active: bool,
}

/// DTO for creating a new profile.
#[derive(Debug)]
pub struct CreateProfile {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Admin-editable account fields. Any other key in the request is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileAccess {
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateProfileAccess {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.is_active.is_none()
    }
}
