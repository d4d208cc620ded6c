//! In-memory document store backend.
//!
//! Used by tests and local development. Behaves like the hosted store from
//! the consumer's point of view: opaque generated ids, server-assigned
//! timestamps, shallow-merge updates and full-snapshot change notification.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;

use crate::{Document, DocumentStore, StoreError, Subscription};

/// In-process [`DocumentStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

struct Collection {
    // BTreeMap keeps listing order deterministic for tests
    documents: BTreeMap<String, Document>,
    notifier: watch::Sender<Vec<Document>>,
}

impl Collection {
    fn new() -> Self {
        let (notifier, _) = watch::channel(Vec::new());
        Self {
            documents: BTreeMap::new(),
            notifier,
        }
    }

    fn snapshot(&self) -> Vec<Document> {
        self.documents.values().cloned().collect()
    }

    fn publish(&self) {
        self.notifier.send_replace(self.snapshot());
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<T>(&self, collection: &str, f: impl FnOnce(&mut Collection) -> T) -> T {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = collections
            .entry(collection.to_owned())
            .or_insert_with(Collection::new);
        f(entry)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.with_collection(collection, |c| c.snapshot()))
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.with_collection(collection, |c| c.documents.get(id).cloned())
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))
    }

    async fn create_document(
        &self,
        collection: &str,
        fields: Value,
    ) -> Result<Document, StoreError> {
        let document = Document {
            id: uuid::Uuid::new_v4().to_string(),
            fields,
            updated_at: Some(Utc::now()),
        };
        self.with_collection(collection, |c| {
            c.documents.insert(document.id.clone(), document.clone());
            c.publish();
        });
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<Document, StoreError> {
        self.with_collection(collection, |c| {
            let Some(existing) = c.documents.get_mut(id) else {
                return Err(StoreError::NotFound(format!("{collection}/{id}")));
            };
            merge_fields(&mut existing.fields, fields);
            existing.updated_at = Some(Utc::now());
            let updated = existing.clone();
            c.publish();
            Ok(updated)
        })
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.with_collection(collection, |c| {
            if c.documents.remove(id).is_some() {
                c.publish();
            }
        });
        Ok(())
    }

    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError> {
        Ok(self.with_collection(collection, |c| {
            // late subscribers start from the current snapshot
            c.notifier.send_replace(c.snapshot());
            c.notifier.subscribe()
        }))
    }
}

/// Shallow merge: each top-level key of `incoming` replaces the same key in
/// `target`. Non-object payloads replace the fields wholesale.
fn merge_fields(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target), Value::Object(incoming)) => {
            for (key, value) in incoming {
                target.insert(key, value);
            }
        }
        (target, incoming) => *target = incoming,
    }
}
