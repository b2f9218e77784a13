//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Joined "detail" shapes where a row embeds its related entities

pub mod category;
pub mod comment;
pub mod profile;
pub mod task;
pub mod task_history;
