use anyhow::Result;
use invoice_desk::config::{AppConfig, StorageBackend};
use invoice_desk::core::DataService;
use invoice_desk::entities::Invoice;
use invoice_desk::extraction::{Extractor, GeminiModel, PdfExtractReader};
use invoice_desk::server::ServerBuilder;
use invoice_desk::storage::InMemoryDataService;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("invoice_desk=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;

    let invoices = invoice_store(&config).await?;

    if config.extraction.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; extraction requests will fail");
    }
    let extractor = Extractor::new(PdfExtractReader, GeminiModel::new(&config.extraction)?);

    ServerBuilder::new()
        .with_shared_invoice_service(invoices)
        .with_extractor(extractor)
        .with_body_limit(config.server.max_upload_bytes)
        .serve(&config.server.address())
        .await
}

async fn invoice_store(config: &AppConfig) -> Result<Arc<dyn DataService<Invoice>>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory invoice storage");
            Ok(Arc::new(InMemoryDataService::<Invoice>::new()))
        }
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => {
            use invoice_desk::storage::mongodb::{MongoDataService, connect};

            let database = connect(&config.storage.uri, &config.storage.database).await?;
            Ok(Arc::new(MongoDataService::<Invoice>::new(database)))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StorageBackend::Mongodb => anyhow::bail!(
            "MongoDB storage is configured but this build lacks the `mongodb_backend` feature"
        ),
    }
}
