//! Catalog report export command.
//!
//! # Usage
//!
//! ```bash
//! cedars-cli report --out cedars_report.csv
//! ```

use std::path::Path;

use thiserror::Error;

use cedars_core::{Service, ServiceId, report};
use cedars_store::{StoreConfig, StoreError, collections};

/// Errors that can occur during report export.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Store configuration failed.
    #[error("store configuration error: {0}")]
    Config(#[from] cedars_store::StoreConfigError),

    /// Store read failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Output file could not be written.
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Export the catalog report to a CSV file.
pub async fn run(out: &Path) -> Result<(), ReportError> {
    dotenvy::dotenv().ok();

    let store = StoreConfig::from_env()?.build()?;
    let documents = store.list_documents(collections::SERVICES).await?;
    let services: Vec<Service> = documents
        .iter()
        .map(|doc| {
            Service::from_document(ServiceId::new(doc.id.as_str()), &doc.fields, doc.updated_at)
        })
        .collect();

    let csv = report::report_csv(&services);
    std::fs::write(out, csv)?;
    tracing::info!(path = %out.display(), rows = services.iter().map(|s| s.plans.len()).sum::<usize>(), "report written");
    Ok(())
}
