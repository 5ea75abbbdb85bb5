//! Request extractors that report rejections in the service's error format

use crate::core::{AppError, ExtractionError, ValidationError};
use axum::Json;
use axum::extract::{FromRequest, Multipart, Request};
use serde_json::Value;

/// JSON body extractor
///
/// Unlike `axum::Json`, a malformed or non-JSON body is rejected with the
/// usual `{ "error", "code", "details" }` body and status 400.
///
/// ```rust,ignore
/// pub async fn create_invoice(JsonPayload(payload): JsonPayload) -> Result<..., AppError> {
///     // payload is a parsed serde_json::Value
/// }
/// ```
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(JsonPayload(payload)),
            Err(rejection) => Err(ValidationError::InvalidPayload {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}

/// Multipart extractor for PDF uploads
///
/// A request that is not `multipart/form-data` carries no file, so it is
/// rejected as a missing upload.
pub struct Upload(pub Multipart);

impl<S> FromRequest<S> for Upload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Upload(multipart)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Upload is not multipart");
                Err(ExtractionError::MissingFile.into())
            }
        }
    }
}
