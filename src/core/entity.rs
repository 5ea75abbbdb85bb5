//! Entity traits shared by the storage backends

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for persisted documents.
///
/// Every document has:
/// - id: store-assigned unique identifier
/// - created_at: creation timestamp, which orders listings
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name, used for URLs and collection names (e.g., "invoices")
    fn resource_name() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

/// Trait for entities that support free-text search.
///
/// A query matches an entity when it is a case-insensitive substring of
/// any of the `searchable_fields`.
pub trait Searchable: Entity {
    /// Dotted paths of the fields a query is matched against
    fn searchable_fields() -> &'static [&'static str];

    /// Get the text value of a searchable field by its dotted path
    fn field_text(&self, field: &str) -> Option<&str>;

    /// Case-insensitive substring match against every searchable field
    fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        Self::searchable_fields().iter().any(|field| {
            self.field_text(field)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        })
    }
}
