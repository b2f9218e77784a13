//! Taskboard domain logic.
//!
//! Everything in this crate is pure: no database handles, no HTTP types. The
//! `db` and `api` crates call into these modules to validate input, plan task
//! mutations, decide authorization, and aggregate analytics.

pub mod analytics;
pub mod authz;
pub mod comments;
pub mod error;
pub mod roles;
pub mod tasks;
pub mod types;
