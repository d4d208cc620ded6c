//! Document store client for Cedars Subscriptions.
//!
//! The catalog's durable state lives in an externally operated document
//! database. This crate exposes that collaborator behind the
//! [`DocumentStore`] trait: plain document CRUD plus a subscription that
//! delivers the *full* current document set on every change, so consumers
//! can atomically replace their in-memory snapshot without partial-update
//! races.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process backend for tests and local development
//! - [`FirestoreStore`] - Firestore REST v1 backend with polling change
//!   detection and a short-lived read cache
//!
//! Unsubscribing is dropping the receiver; the backend stops publishing to
//! (and in the polling case, fetching for) closed channels.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod firestore;
mod memory;

pub use config::{StoreBackend, StoreConfig, StoreConfigError};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Collection names shared by every consumer of the store.
pub mod collections {
    /// The service catalog.
    pub const SERVICES: &str = "services";
    /// Admin credential; holds a single document.
    pub const ADMIN: &str = "admin";
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;

/// A raw document as held by the store: opaque string id, free-shape JSON
/// fields and the server-assigned last-modified timestamp.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub fields: Value,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend rejected the request.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Full-snapshot subscription handle; see [`DocumentStore::subscribe`].
pub type Subscription = watch::Receiver<Vec<Document>>;

/// Document CRUD and change notification against one named collection
/// namespace.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List the full current document set of a collection.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// One-shot read of a single document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// Create a document; the store assigns its id and timestamp.
    async fn create_document(&self, collection: &str, fields: Value)
    -> Result<Document, StoreError>;

    /// Shallow-merge the given top-level fields into an existing document
    /// and bump its timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<Document, StoreError>;

    /// Delete a document. Deleting an absent document is not an error.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Subscribe to a collection.
    ///
    /// The receiver starts at the current full document set and is updated
    /// with a complete replacement set on every subsequent change. Dropping
    /// the receiver unsubscribes.
    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError>;
}
