//! Request body extraction with errors in the API's JSON error shape.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// Like [`axum::Json`], but a malformed or mistyped body (for example an
/// unknown `priority`) is rejected as a 400 `BAD_REQUEST` error body instead
/// of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T> FromRequest<AppState> for AppJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(AppJson(value))
    }
}
