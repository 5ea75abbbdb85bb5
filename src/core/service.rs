//! Service trait for document storage

use crate::core::entity::Searchable;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing documents of one entity type
///
/// Implementations provide CRUD operations plus free-text search.
/// The HTTP layer is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait DataService<T: Searchable>: Send + Sync {
    /// Store a new entity and return the stored version
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities, newest first
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing entity
    ///
    /// Returns `Ok(None)` when no entity has that ID.
    async fn update(&self, id: &Uuid, entity: T) -> Result<Option<T>>;

    /// Delete an entity
    ///
    /// Returns `Ok(false)` when no entity has that ID.
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Case-insensitive substring search over `T::searchable_fields()`, newest first
    async fn search(&self, query: &str) -> Result<Vec<T>>;
}
