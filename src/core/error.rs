//! Typed error handling for the invoice service
//!
//! Every handler returns `Result<_, AppError>`. Each variant knows its HTTP
//! status and a stable error code, and converts itself into a JSON body of
//! the shape `{ "error": ..., "code": ..., "details": ... }`.
//!
//! # Error Categories
//!
//! - [`InvoiceError`]: invoice document lookups and writes
//! - [`ValidationError`]: input validation of invoice payloads
//! - [`ExtractionError`]: PDF upload, text extraction and model replies
//! - [`StorageError`]: storage backend failures
//!
//! # Example
//!
//! ```rust,ignore
//! async fn load(service: &dyn DataService<Invoice>, id: Uuid) -> Result<Invoice, AppError> {
//!     service
//!         .get(&id)
//!         .await
//!         .map_err(AppError::storage)?
//!         .ok_or(AppError::Invoice(InvoiceError::NotFound { id: id.to_string() }))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the service
#[derive(Debug)]
pub enum AppError {
    /// Invoice document errors
    Invoice(InvoiceError),

    /// Payload validation errors
    Validation(ValidationError),

    /// Extraction pipeline errors
    Extraction(ExtractionError),

    /// Storage backend errors
    Storage(StorageError),

    /// Anything else (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Invoice(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Extraction(e) => write!(f, "{}", e.public_message()),
            AppError::Storage(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Invoice(e) => Some(e),
            AppError::Validation(e) => Some(e),
            AppError::Extraction(e) => Some(e),
            AppError::Storage(e) => Some(e),
            AppError::Internal(_) => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Wrap a storage-layer failure
    pub fn storage(err: anyhow::Error) -> Self {
        AppError::Storage(StorageError::OperationFailed {
            message: format!("{:#}", err),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Invoice(e) => e.status_code(),
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(e) => e.status_code(),
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Invoice(e) => e.error_code(),
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Extraction(e) => e.error_code(),
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Invoice(InvoiceError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            AppError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            AppError::Extraction(e) => e.cause().map(serde_json::Value::String),
            AppError::Storage(StorageError::OperationFailed { message }) => {
                Some(serde_json::Value::String(message.clone()))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), details = ?self.details(), "{}", self);
        } else {
            tracing::warn!(code = self.error_code(), "{}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Invoice Errors
// =============================================================================

/// Errors related to invoice documents
#[derive(Debug)]
pub enum InvoiceError {
    /// No invoice with that id
    NotFound { id: String },
}

impl fmt::Display for InvoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceError::NotFound { .. } => write!(f, "Invoice not found."),
        }
    }
}

impl std::error::Error for InvoiceError {}

impl InvoiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::NotFound { .. } => "INVOICE_NOT_FOUND",
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        AppError::Invoice(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Errors related to payload validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed
    FieldErrors(Vec<FieldViolation>),

    /// Body is not a JSON object
    InvalidPayload { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            ValidationError::InvalidPayload { message } => {
                write!(f, "Invalid payload: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors raised while turning an uploaded PDF into invoice JSON
///
/// Everything except a missing upload collapses to the same public message;
/// the underlying cause is only reported in `details`.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("No file provided for extraction.")]
    MissingFile,

    #[error("could not read PDF text: {0}")]
    PdfText(String),

    #[error("model request failed: {0}")]
    Model(String),

    #[error("model reply is not a JSON object: {0}")]
    InvalidReply(String),
}

impl ExtractionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractionError::MissingFile => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ExtractionError::MissingFile => "MISSING_FILE",
            _ => "EXTRACTION_FAILED",
        }
    }

    /// Message shown to API callers
    pub fn public_message(&self) -> String {
        match self {
            ExtractionError::MissingFile => self.to_string(),
            _ => "Failed to extract data from the PDF.".to_string(),
        }
    }

    fn cause(&self) -> Option<String> {
        match self {
            ExtractionError::MissingFile => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection to the backend failed
    ConnectionError { backend: String, message: String },

    /// A backend operation failed
    OperationFailed { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::OperationFailed { .. } => write!(f, "Storage operation failed"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}
