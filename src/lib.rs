//! # Invoice Desk
//!
//! Invoice extraction and management: upload a PDF, let a generative model
//! pull the invoice fields out of its text, review the result and keep it
//! in a document store.
//!
//! ## Features
//!
//! - **Extraction**: PDF text → prompt → model reply → JSON object
//! - **Invoice collection**: create, list/search, get, update, delete
//! - **Review client**: typed HTTP client and an immutable editable draft
//! - **Pluggable storage**: in-memory by default, MongoDB behind `mongodb_backend`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_desk::prelude::*;
//!
//! let config = AppConfig::load()?;
//! let extractor = Extractor::new(PdfExtractReader, GeminiModel::new(&config.extraction)?);
//!
//! ServerBuilder::new()
//!     .with_invoice_service(InMemoryDataService::<Invoice>::new())
//!     .with_extractor(extractor)
//!     .serve(&config.server.address())
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod extraction;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        AppError, DataService, Entity, ExtractionError, ListQuery, Searchable,
    };

    // === Entities ===
    pub use crate::entities::{Invoice, InvoiceContent, InvoiceDetails, LineItem, Vendor};

    // === Extraction ===
    pub use crate::extraction::{Extractor, GeminiModel, PdfExtractReader, PdfTextReader, TextModel};

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === Client ===
    pub use crate::client::{ApiClient, ClientError, InvoiceDraft, ReviewSession};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{delete, get, post, put},
    };
}
