//! Live catalog snapshot fed from the document store.
//!
//! Bridges the store's raw document subscription to a channel of normalized
//! [`Service`] values. Every store notification carries the complete
//! document set, so each published value here is a complete catalog the
//! handlers can swap in atomically.

use cedars_core::{Service, ServiceId};
use cedars_store::{Document, DocumentStore, StoreError, collections};
use tokio::sync::watch;

/// Handle to the current normalized catalog.
pub type CatalogFeed = watch::Receiver<Vec<Service>>;

/// Subscribe to the services collection and keep a normalized snapshot
/// current in the background. The task ends when the last receiver drops.
///
/// # Errors
///
/// Fails if the initial store subscription fails; later poll errors are the
/// store's concern and leave the last good snapshot in place.
pub async fn start(store: &dyn DocumentStore) -> Result<CatalogFeed, StoreError> {
    let mut documents = store.subscribe(collections::SERVICES).await?;
    let initial = normalize(&documents.borrow_and_update());
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        while documents.changed().await.is_ok() {
            let services = normalize(&documents.borrow_and_update());
            tracing::debug!(count = services.len(), "catalog snapshot updated");
            if tx.send(services).is_err() {
                break;
            }
        }
    });

    Ok(rx)
}

fn normalize(documents: &[Document]) -> Vec<Service> {
    documents
        .iter()
        .map(|doc| {
            Service::from_document(ServiceId::new(doc.id.as_str()), &doc.fields, doc.updated_at)
        })
        .collect()
}
