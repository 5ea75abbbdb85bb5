//! In-memory implementation of DataService for testing and development

use crate::core::{DataService, Searchable};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Cloning shares the underlying map.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    entities: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new, empty in-memory data service
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first<T: Searchable>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    items
}

#[async_trait]
impl<T: Searchable> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entities.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entities.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(newest_first(entities.values().cloned().collect()))
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<Option<T>> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(slot) = entities.get_mut(id) else {
            return Ok(None);
        };
        *slot = entity.clone();

        Ok(Some(entity))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(entities.remove(id).is_some())
    }

    async fn search(&self, query: &str) -> Result<Vec<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(newest_first(
            entities
                .values()
                .filter(|entity| entity.matches_query(query))
                .cloned()
                .collect(),
        ))
    }
}
