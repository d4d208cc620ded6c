//! CSV report download handler.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use cedars_core::{Service, ServiceId, report};
use cedars_store::collections;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// `GET /report.csv` - one row per plan across the whole catalog.
pub async fn download(State(state): State<AppState>, _auth: RequireAdminAuth) -> Result<Response> {
    let documents = state.store().list_documents(collections::SERVICES).await?;
    let services: Vec<Service> = documents
        .iter()
        .map(|doc| {
            Service::from_document(ServiceId::new(doc.id.as_str()), &doc.fields, doc.updated_at)
        })
        .collect();

    let csv = report::report_csv(&services);
    let filename = format!("cedars_report_{}.csv", Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
