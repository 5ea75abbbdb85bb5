//! Client side of the invoice workflow
//!
//! [`ApiClient`] wraps the HTTP API; [`InvoiceDraft`] is the editable form
//! state; [`ReviewSession`] ties them together for the upload → review →
//! save flow.

pub mod api;
pub mod draft;
pub mod session;

pub use api::ApiClient;
pub use draft::{DetailsDraft, InvoiceDraft, LineItemDraft, VendorDraft};
pub use session::ReviewSession;

/// Errors surfaced to the user by the client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Required fields are empty; nothing was sent
    #[error("Please make sure {} are filled out.", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The server's response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}
