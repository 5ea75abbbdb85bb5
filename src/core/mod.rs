//! Core module containing fundamental traits and types

pub mod entity;
pub mod error;
pub mod query;
pub mod service;
pub mod validation;

pub use entity::{Entity, Searchable};
pub use error::{AppError, ExtractionError, InvoiceError, StorageError, ValidationError};
pub use query::ListQuery;
pub use service::DataService;
