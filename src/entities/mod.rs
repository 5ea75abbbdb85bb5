//! Persisted document types

pub mod invoice;

pub use invoice::{Invoice, InvoiceContent, InvoiceDetails, LineItem, Vendor};
