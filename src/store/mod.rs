// Document store abstraction
// Collections of JSON documents addressed by an opaque id, queried by field equality

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Field map of a stored document (everything except the id)
pub type Fields = Map<String, Value>;

/// Store handle shared by every repository
pub type SharedStore = Arc<dyn DocumentStore>;

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserialize the document into a typed record, exposing the id as an `id` field
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Serialize a record into document fields
pub fn encode<T: Serialize>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::NotAnObject(other.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule of the collection was violated on `field`
    #[error("unique constraint violated on field '{field}'")]
    Conflict { field: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("document body must be a JSON object, got {0}")]
    NotAnObject(String),
}

/// Persistence collaborator used by the credential and product repositories
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// List every document of a collection, oldest first
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// First document whose string field `field` equals `value` exactly
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a new document; the store assigns the id
    ///
    /// # Errors
    /// * `Conflict` - a unique field of the collection already holds this value
    async fn create(&self, collection: &str, fields: Fields) -> Result<Document, StoreError>;

    /// Merge `fields` into an existing document
    ///
    /// Returns `None` when no document has this id.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Option<Document>, StoreError>;

    /// Remove a document, returning whether it existed
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}
