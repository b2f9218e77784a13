//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod comment_repo;
pub mod profile_repo;
pub mod task_history_repo;
pub mod task_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use profile_repo::ProfileRepo;
pub use task_history_repo::TaskHistoryRepo;
pub use task_repo::TaskRepo;
