//! Task comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::profile::Profile;

/// A row from the `task_comments` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub comment_text: String,
    pub created_at: Timestamp,
}

/// A comment with its author embedded as `user`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: Option<Profile>,
}

/// Request body for posting a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub comment_text: String,
}
