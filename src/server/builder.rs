//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::{build_api_routes, health_routes};
use crate::core::DataService;
use crate::entities::Invoice;
use crate::extraction::Extractor;
use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Default request body limit (PDF uploads)
const DEFAULT_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Builder for the invoice HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_invoice_service(InMemoryDataService::<Invoice>::new())
///     .with_extractor(Extractor::new(PdfExtractReader, GeminiModel::new(&config.extraction)?))
///     .build()?;
/// ```
pub struct ServerBuilder {
    invoices: Option<Arc<dyn DataService<Invoice>>>,
    extractor: Option<Extractor>,
    body_limit: usize,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            invoices: None,
            extractor: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Set the invoice storage service (required)
    pub fn with_invoice_service(mut self, service: impl DataService<Invoice> + 'static) -> Self {
        self.invoices = Some(Arc::new(service));
        self
    }

    /// Set an already shared invoice storage service (required)
    pub fn with_shared_invoice_service(mut self, service: Arc<dyn DataService<Invoice>>) -> Self {
        self.invoices = Some(service);
        self
    }

    /// Set the extraction pipeline (required)
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Maximum accepted request body size in bytes
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Build the final router with health and API routes
    pub fn build(self) -> Result<Router> {
        let invoices = self.invoices.ok_or_else(|| {
            anyhow::anyhow!("Invoice service is required. Call .with_invoice_service()")
        })?;
        let extractor = self
            .extractor
            .ok_or_else(|| anyhow::anyhow!("Extractor is required. Call .with_extractor()"))?;

        let state = AppState {
            invoices,
            extractor,
        };

        let app = health_routes().merge(build_api_routes(state));

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(self.body_limit)),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
