//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` backed by a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One collection per entity type, named after `T::resource_name()`
//! (`invoices`). Documents are serialized through `serde_json::Value`, then
//! converted to BSON. The `id` field is mapped to MongoDB's `_id`
//! convention and stored as a UUID string.

use crate::core::{DataService, Searchable, StorageError};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain entity convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Build the `$or` filter matching `query` as a literal, case-insensitive
/// substring of any of `fields`.
fn search_filter(fields: &[&str], query: &str) -> Document {
    let pattern = regex::escape(query);
    let clauses: Vec<Bson> = fields
        .iter()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
            Bson::Document(clause)
        })
        .collect();

    doc! { "$or": clauses }
}

fn connection_error(e: mongodb::error::Error) -> StorageError {
    StorageError::ConnectionError {
        backend: "MongoDB".to_string(),
        message: e.to_string(),
    }
}

/// Connect to MongoDB and select a database
///
/// The driver connects lazily, so the server is pinged once here to surface
/// a bad URI or an unreachable host at startup.
pub async fn connect(uri: &str, database: &str) -> std::result::Result<Database, StorageError> {
    let client = Client::with_uri_str(uri).await.map_err(connection_error)?;
    let database = client.database(database);
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(connection_error)?;
    tracing::info!(database = database.name(), "Connected to MongoDB");
    Ok(database)
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use invoice_desk::storage::mongodb::{connect, MongoDataService};
///
/// let db = connect("mongodb://localhost:27017", "invoices").await?;
/// let service = MongoDataService::<Invoice>::new(db);
/// let stored = service.create(invoice).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Searchable + Serialize + DeserializeOwned> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
    }

    async fn find_newest_first(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| anyhow!("Failed to query entities: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect entities: {}", e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }
}

#[async_trait]
impl<T: Searchable + Serialize + DeserializeOwned> DataService<T> for MongoDataService<T> {
    /// Insert a new entity and read it back to return the stored version.
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;
        let id_bson = uuid_bson(&entity.id());

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create entity: {}", e))?;

        let result = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| anyhow!("Failed to read back created entity: {}", e))?
            .ok_or_else(|| anyhow!("Entity not found after insert"))?;

        Self::document_to_entity(result)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get entity: {}", e))?;

        doc.map(Self::document_to_entity).transpose()
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.find_newest_first(doc! {}).await
    }

    /// Replace an existing entity, returning the document as stored.
    async fn update(&self, id: &Uuid, entity: T) -> Result<Option<T>> {
        let doc = Self::entity_to_document(&entity)?;

        let updated = self
            .collection()
            .find_one_and_replace(doc! { "_id": uuid_bson(id) }, doc)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| anyhow!("Failed to update entity: {}", e))?;

        updated.map(Self::document_to_entity).transpose()
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete entity: {}", e))?;

        Ok(result.deleted_count > 0)
    }

    async fn search(&self, query: &str) -> Result<Vec<T>> {
        self.find_newest_first(search_filter(T::searchable_fields(), query))
            .await
    }
}
