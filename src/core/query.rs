//! Query parameters for the invoice listing

use serde::Deserialize;

/// Query parameters accepted by `GET /api/invoices`
///
/// # Example
/// ```text
/// GET /api/invoices            -> every invoice
/// GET /api/invoices?q=acme     -> vendor name or invoice number contains "acme"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListQuery {
    /// Free-text filter
    pub q: Option<String>,
}

impl ListQuery {
    /// The search term, if one was given
    ///
    /// An empty `q` is the same as no `q` at all.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}
