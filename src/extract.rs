use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;

/// `Json<T>` with the rejection routed through [`AppError`], so a body that
/// fails to parse, carries unknown fields, or cannot be coerced to the DTO
/// surfaces as a 400 inside the standard response envelope.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                warn!(reason = %rejection.body_text(), "rejected request body");
                Err(AppError::Validation(rejection.body_text()))
            }
        }
    }
}
