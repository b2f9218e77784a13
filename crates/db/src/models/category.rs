//! Task category model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `task_categories` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub color_hex: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 50, message = "Category name must be 1-50 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "validate_color_hex"))]
    #[serde(default)]
    pub color_hex: Option<String>,
}

/// Accept `#RRGGBB` only.
fn validate_color_hex(color: &str) -> Result<(), validator::ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("color_hex");
        err.message = Some("Color must be a hex value like #3b82f6".into());
        Err(err)
    }
}
