//! Authentication and authorization for Axum handlers.
//!
//! - [`auth`] -- `Identity` extractor from a JWT Bearer token plus the
//!   caller's current profile.
//! - [`rbac`] -- [`rbac::authorize`], the single gate every handler calls
//!   before touching data.

pub mod auth;
pub mod rbac;
