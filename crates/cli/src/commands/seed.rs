//! Catalog seeding command.
//!
//! # Usage
//!
//! ```bash
//! # Built-in sample catalog
//! cedars-cli seed
//!
//! # From a file: a JSON array of service documents
//! cedars-cli seed --file services.json
//! ```

use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use cedars_store::{StoreConfig, StoreError, collections};

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Store configuration failed.
    #[error("store configuration error: {0}")]
    Config(#[from] cedars_store::StoreConfigError),

    /// Store write failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Seed file could not be read.
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file did not parse.
    #[error("seed file parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Seed file held something other than an array of objects.
    #[error("seed file must hold a JSON array of service documents")]
    NotAnArray,
}

/// Seed the services collection from a file or the built-in sample.
pub async fn run(file: Option<&Path>) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let services = match file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            match serde_json::from_str::<Value>(&raw)? {
                Value::Array(entries) => entries,
                _ => return Err(SeedError::NotAnArray),
            }
        }
        None => sample_catalog(),
    };

    let store = StoreConfig::from_env()?.build()?;
    let count = services.len();
    for fields in services {
        let document = store.create_document(collections::SERVICES, fields).await?;
        tracing::info!(id = %document.id, "service seeded");
    }
    tracing::info!(count, "seeding complete");
    Ok(())
}

/// A small representative catalog for local development.
fn sample_catalog() -> Vec<Value> {
    vec![
        json!({
            "name": "Netflix",
            "category": "Streaming",
            "serviceNote": "Accounts delivered by email",
            "featured": true,
            "plans": [
                { "label": "1 Month", "type": "Shared", "duration": "Monthly",
                  "costPrice": "3", "sellPrice": "5", "discount": "0", "inStock": true },
                { "label": "1 Year", "type": "Shared", "duration": "Yearly",
                  "costPrice": "30", "sellPrice": "45", "discount": "5", "inStock": true }
            ]
        }),
        json!({
            "name": "Spotify",
            "category": "Streaming",
            "plans": [
                { "label": "1 Month Premium", "type": "Full Account", "duration": "Monthly",
                  "costPrice": "2", "sellPrice": "4", "discount": "0", "inStock": true }
            ]
        }),
        json!({
            "name": "Steam Wallet",
            "category": "Gift Cards",
            "plans": [
                { "label": "10 USD", "type": "Top-Up", "duration": "Instant",
                  "costPrice": "9", "sellPrice": "11", "discount": "0", "inStock": true },
                { "label": "50 USD", "type": "Top-Up", "duration": "Instant",
                  "costPrice": "46", "sellPrice": "53", "discount": "2", "inStock": false }
            ]
        }),
    ]
}
