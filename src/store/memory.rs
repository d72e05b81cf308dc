// In-memory document store
// Used when no database is configured, and by the test suite

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, Fields, StoreError};

/// Document store kept in process memory
///
/// Uniqueness checks and inserts run under a single write lock, so two
/// concurrent creates can never both claim the same unique value.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique_fields: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `field` unique within `collection`
    pub fn with_unique_field(mut self, collection: &str, field: &str) -> Self {
        self.unique_fields
            .entry(collection.to_string())
            .or_default()
            .push(field.to_string());
        self
    }

    /// Find the first unique field of `fields` already held by another document
    fn conflicting_field(
        &self,
        collection: &str,
        documents: &[Document],
        fields: &Fields,
        exclude_id: Option<&str>,
    ) -> Option<String> {
        let unique = self.unique_fields.get(collection)?;

        unique
            .iter()
            .find(|field| {
                let Some(candidate) = fields.get(field.as_str()) else {
                    return false;
                };
                documents.iter().any(|doc| {
                    Some(doc.id.as_str()) != exclude_id
                        && doc.fields.get(field.as_str()) == Some(candidate)
                })
            })
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| {
                docs.iter().find(|doc| {
                    matches!(doc.fields.get(field), Some(Value::String(s)) if s == value)
                })
            })
            .cloned())
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(field) = self.conflicting_field(collection, documents, &fields, None) {
            return Err(StoreError::Conflict { field });
        }

        let document = Document {
            id: Uuid::new_v4().simple().to_string(),
            fields,
        };
        documents.push(document.clone());

        tracing::debug!("Created document {} in {}", document.id, collection);
        Ok(document)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(None);
        };

        if let Some(field) = self.conflicting_field(collection, documents, &fields, Some(id)) {
            return Err(StoreError::Conflict { field });
        }

        let Some(document) = documents.iter_mut().find(|doc| doc.id == id) else {
            return Ok(None);
        };
        document.fields.extend(fields);

        Ok(Some(document.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        Ok(documents.len() != before)
    }
}
