//! Authorization gate.
//!
//! Every handler describes the operation it is about to perform and calls
//! [`authorize`] before reading or writing anything restricted. The policy
//! itself lives in [`taskboard_core::authz::can`].

use taskboard_core::authz::{can, Action, Identity, Resource};
use taskboard_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// Fail with 403 Forbidden unless `identity` may perform `action` on `resource`.
///
/// ```ignore
/// async fn analytics(identity: Identity) -> AppResult<Json<()>> {
///     authorize(&identity, Action::Read, Resource::Analytics)?;
///     Ok(Json(()))
/// }
/// ```
pub fn authorize(identity: &Identity, action: Action, resource: Resource) -> AppResult<()> {
    if can(identity, action, resource) {
        return Ok(());
    }
    tracing::debug!(
        user_id = identity.user_id,
        role = %identity.role,
        ?action,
        resource = resource.as_str(),
        "Access denied",
    );
    let message = match resource {
        Resource::Analytics | Resource::UserAccounts | Resource::Category => "Admin role required",
        _ => "Not allowed",
    };
    Err(AppError::Core(CoreError::Forbidden(message.into())))
}
