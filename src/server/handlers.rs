//! HTTP handlers for extraction and invoice CRUD

use super::extract::{JsonPayload, Upload};
use crate::core::{AppError, DataService, ExtractionError, InvoiceError, ListQuery, ValidationError};
use crate::entities::Invoice;
use crate::extraction::Extractor;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Multipart field carrying the PDF
pub const UPLOAD_FIELD: &str = "invoice";

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<dyn DataService<Invoice>>,
    pub extractor: Extractor,
}

/// Parse an id path segment; anything that is not a UUID cannot exist.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        AppError::Invoice(InvoiceError::NotFound {
            id: raw.to_string(),
        })
    })
}

fn not_found(id: &Uuid) -> AppError {
    AppError::Invoice(InvoiceError::NotFound { id: id.to_string() })
}

/// POST /api/extract
pub async fn extract_invoice(
    State(state): State<AppState>,
    Upload(mut multipart): Upload,
) -> Result<Json<Value>, AppError> {
    let mut pdf = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Validation(ValidationError::InvalidPayload {
            message: format!("Failed to read upload: {}", e),
        })
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            AppError::Validation(ValidationError::InvalidPayload {
                message: format!("Failed to read file data: {}", e),
            })
        })?;
        tracing::debug!(?file_name, bytes = bytes.len(), "Received invoice upload");
        pdf = Some(bytes.to_vec());
        break;
    }

    let pdf = pdf.ok_or(ExtractionError::MissingFile)?;
    let value = state.extractor.extract(pdf).await?;
    Ok(Json(value))
}

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let invoice = Invoice::from_payload(payload)?;
    let created = state
        .invoices
        .create(invoice)
        .await
        .map_err(AppError::storage)?;

    tracing::info!(id = %created.id, vendor = %created.content.vendor.name, "Created invoice");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/invoices?q=
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = match query.term() {
        Some(term) => state.invoices.search(term).await,
        None => state.invoices.list().await,
    }
    .map_err(AppError::storage)?;

    tracing::debug!(q = ?query.term(), count = invoices.len(), "Listed invoices");
    Ok(Json(invoices))
}

/// GET /api/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, AppError> {
    let id = parse_id(&id)?;
    let invoice = state
        .invoices
        .get(&id)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(invoice))
}

/// PUT /api/invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonPayload(patch): JsonPayload,
) -> Result<Json<Invoice>, AppError> {
    let id = parse_id(&id)?;
    let current = state
        .invoices
        .get(&id)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| not_found(&id))?;

    let updated = current.patched(patch)?;
    let stored = state
        .invoices
        .update(&id, updated)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(id = %stored.id, "Updated invoice");
    Ok(Json(stored))
}

/// DELETE /api/invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let deleted = state
        .invoices
        .delete(&id)
        .await
        .map_err(AppError::storage)?;

    if !deleted {
        return Err(not_found(&id));
    }

    tracing::info!(%id, "Deleted invoice");
    Ok(StatusCode::NO_CONTENT)
}
