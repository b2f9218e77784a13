pub mod admin;
pub mod analytics;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod history;
pub mod profiles;
pub mod tasks;
