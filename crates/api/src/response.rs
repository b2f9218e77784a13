//! Shared response shapes.
//!
//! Successful responses are bare JSON (no envelope). The only shared shapes
//! are the plain `{"message": ...}` acknowledgement and the "either the
//! updated record or a no-op message" result of a PATCH.

use serde::Serialize;

/// `{"message": "..."}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const NO_CHANGES: MessageResponse = MessageResponse {
        message: "No changes",
    };
}

/// Result of a partial update: the fresh record, or `{"message": "No changes"}`
/// when nothing in the request differed from what was stored.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Patched<T> {
    Updated(T),
    Unchanged(MessageResponse),
}

impl<T> Patched<T> {
    pub fn unchanged() -> Self {
        Patched::Unchanged(MessageResponse::NO_CHANGES)
    }
}
