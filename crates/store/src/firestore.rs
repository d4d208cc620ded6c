//! Firestore REST v1 backend.
//!
//! Talks plain JSON to the `firestore.googleapis.com` documents API. Change
//! notification is polling-based: a background task re-lists the collection
//! on an interval and publishes the full document set whenever it differs
//! from the last snapshot. One-shot reads go through a short-lived cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::sync::watch;

use crate::{Document, DocumentStore, StoreError, Subscription};

const READ_CACHE_TTL: Duration = Duration::from_secs(60);
const READ_CACHE_CAPACITY: u64 = 1_000;

/// Firestore-backed [`DocumentStore`].
#[derive(Clone)]
pub struct FirestoreStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    /// API host, e.g. `https://firestore.googleapis.com/v1`. Overridable to
    /// point at the local emulator.
    base_url: String,
    /// `projects/{project}/databases/{database}/documents`
    documents_root: String,
    api_key: Option<SecretString>,
    cache: Cache<String, Document>,
    poll_interval: Duration,
}

impl FirestoreStore {
    /// Create a store against the public Firestore endpoint.
    #[must_use]
    pub fn new(
        project_id: &str,
        database: &str,
        api_key: Option<SecretString>,
        poll_interval: Duration,
    ) -> Self {
        Self::with_base_url(
            "https://firestore.googleapis.com/v1",
            project_id,
            database,
            api_key,
            poll_interval,
        )
    }

    /// Create a store against a custom endpoint (the Firestore emulator).
    #[must_use]
    pub fn with_base_url(
        base_url: &str,
        project_id: &str,
        database: &str,
        api_key: Option<SecretString>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
                documents_root: format!("projects/{project_id}/databases/{database}/documents"),
                api_key,
                cache: Cache::builder()
                    .max_capacity(READ_CACHE_CAPACITY)
                    .time_to_live(READ_CACHE_TTL)
                    .build(),
                poll_interval,
            }),
        }
    }
}

impl Inner {
    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}/{collection}", self.base_url, self.documents_root)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{id}", self.collection_url(collection))
    }

    fn auth_query(&self) -> Vec<(String, String)> {
        self.api_key
            .as_ref()
            .map(|key| vec![("key".to_owned(), key.expose_secret().to_owned())])
            .unwrap_or_default()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .query(&self.auth_query())
            .send()
            .await?
            .error_for_status()?;
        let body: ListResponse = response.json().await?;
        Ok(body.documents.into_iter().map(FsDocument::into_document).collect())
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection).await
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let key = format!("{collection}/{id}");
        if let Some(cached) = self.inner.cache.get(&key).await {
            return Ok(cached);
        }

        let response = self
            .inner
            .client
            .get(self.inner.document_url(collection, id))
            .query(&self.inner.auth_query())
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key));
        }
        let body: FsDocument = response.error_for_status()?.json().await?;
        let document = body.into_document();
        self.inner.cache.insert(key, document.clone()).await;
        Ok(document)
    }

    async fn create_document(
        &self,
        collection: &str,
        fields: Value,
    ) -> Result<Document, StoreError> {
        let response = self
            .inner
            .client
            .post(self.inner.collection_url(collection))
            .query(&self.inner.auth_query())
            .json(&json!({ "fields": fields_to_fs(&fields)? }))
            .send()
            .await?
            .error_for_status()?;
        let body: FsDocument = response.json().await?;
        Ok(body.into_document())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<Document, StoreError> {
        let fs_fields = fields_to_fs(&fields)?;

        // Restrict the write to the supplied top-level fields (shallow
        // merge) and require the document to exist.
        let mut query = self.inner.auth_query();
        query.push(("currentDocument.exists".to_owned(), "true".to_owned()));
        for field in fs_fields.keys() {
            query.push(("updateMask.fieldPaths".to_owned(), field.clone()));
        }

        let response = self
            .inner
            .client
            .patch(self.inner.document_url(collection, id))
            .query(&query)
            .json(&json!({ "fields": fs_fields }))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        let body: FsDocument = response.error_for_status()?.json().await?;
        self.inner.cache.invalidate(&format!("{collection}/{id}")).await;
        Ok(body.into_document())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner
            .client
            .delete(self.inner.document_url(collection, id))
            .query(&self.inner.auth_query())
            .send()
            .await?
            .error_for_status()?;
        self.inner.cache.invalidate(&format!("{collection}/{id}")).await;
        Ok(())
    }

    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError> {
        let initial = self.inner.list(collection).await?;
        let (tx, rx) = watch::channel(initial);

        let inner = Arc::clone(&self.inner);
        let collection = collection.to_owned();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    tracing::debug!(collection, "all subscribers gone, stopping poll");
                    break;
                }
                match inner.list(&collection).await {
                    Ok(snapshot) => {
                        tx.send_if_modified(|current| {
                            if *current == snapshot {
                                false
                            } else {
                                *current = snapshot;
                                true
                            }
                        });
                    }
                    // transient failures keep the last good snapshot
                    Err(error) => tracing::warn!(collection, %error, "collection poll failed"),
                }
            }
        });

        Ok(rx)
    }
}

/// Wire shape of a Firestore document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FsDocument {
    /// Full resource name; the document id is its last path segment.
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    update_time: Option<String>,
}

impl FsDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        let fields = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), fs_to_json(value)))
            .collect::<Map<_, _>>();
        let updated_at = self
            .update_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));
        Document {
            id,
            fields: Value::Object(fields),
            updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FsDocument>,
}

/// Encode document fields as Firestore typed values.
///
/// # Errors
///
/// Document fields must be a JSON object; anything else is rejected before
/// it reaches the wire.
fn fields_to_fs(fields: &Value) -> Result<Map<String, Value>, StoreError> {
    let Value::Object(map) = fields else {
        return Err(StoreError::Backend(
            "document fields must be a JSON object".to_owned(),
        ));
    };
    Ok(map
        .iter()
        .map(|(key, value)| (key.clone(), json_to_fs(value)))
        .collect())
}

fn json_to_fs(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => n.as_i64().map_or_else(
            || json!({ "doubleValue": n }),
            |i| json!({ "integerValue": i.to_string() }),
        ),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(json_to_fs).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({
            "mapValue": {
                "fields": map
                    .iter()
                    .map(|(k, v)| (k.clone(), json_to_fs(v)))
                    .collect::<Map<_, _>>()
            }
        }),
    }
}

fn fs_to_json(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return Value::Null;
    };
    if let Some(v) = map.get("stringValue").or_else(|| map.get("timestampValue")) {
        return v.clone();
    }
    if let Some(v) = map.get("booleanValue").or_else(|| map.get("doubleValue")) {
        return v.clone();
    }
    if let Some(v) = map.get("integerValue") {
        return v
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map_or(Value::Null, Value::from);
    }
    if map.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(Value::Object(array)) = map.get("arrayValue") {
        let values = match array.get("values") {
            Some(Value::Array(values)) => values.iter().map(fs_to_json).collect(),
            _ => Vec::new(),
        };
        return Value::Array(values);
    }
    if let Some(Value::Object(object)) = map.get("mapValue") {
        let fields = match object.get("fields") {
            Some(Value::Object(fields)) => fields
                .iter()
                .map(|(k, v)| (k.clone(), fs_to_json(v)))
                .collect(),
            _ => Map::new(),
        };
        return Value::Object(fields);
    }
    Value::Null
}
