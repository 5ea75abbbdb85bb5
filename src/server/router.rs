//! Route table

use super::handlers::{
    AppState, create_invoice, delete_invoice, extract_invoice, get_invoice, list_invoices,
    update_invoice,
};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

/// Build the `/api` routes
///
/// - POST   /api/extract        - PDF upload → extracted invoice JSON
/// - POST   /api/invoices       - Create an invoice
/// - GET    /api/invoices?q=    - List / search invoices
/// - GET    /api/invoices/{id}  - Get an invoice
/// - PUT    /api/invoices/{id}  - Update an invoice
/// - DELETE /api/invoices/{id}  - Delete an invoice
pub fn build_api_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/extract", post(extract_invoice))
        .route("/invoices", post(create_invoice).get(list_invoices))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .with_state(state);

    Router::new().nest("/api", api)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-desk"
    }))
}
