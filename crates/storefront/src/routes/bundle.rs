//! Bundle quoting handler.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cedars_core::pricing::{self, BundleConfig, BundleItem};
use cedars_core::types::format_amount;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<BundleItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub items: Vec<QuotedItem>,
    /// Sum of final prices before any volume discount.
    pub subtotal: String,
    pub discount_applied: bool,
    pub total: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedItem {
    pub service_name: String,
    pub plan_label: String,
    pub final_price: String,
}

/// `POST /bundle/quote` - price a caller-supplied bundle.
pub async fn quote(
    State(_state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let config = BundleConfig::default();
    let subtotal: Decimal = request
        .items
        .iter()
        .map(|item| pricing::final_price(&item.plan))
        .sum();
    let total = pricing::bundle_total(&request.items, &config);
    let discount_applied = request.items.len() >= config.discount_threshold;

    let items = request
        .items
        .into_iter()
        .map(|item| QuotedItem {
            final_price: format_amount(pricing::final_price(&item.plan)),
            service_name: item.service_name,
            plan_label: item.plan.label,
        })
        .collect();

    Ok(Json(QuoteResponse {
        items,
        subtotal: format_amount(subtotal),
        discount_applied,
        total: format_amount(total),
    }))
}
