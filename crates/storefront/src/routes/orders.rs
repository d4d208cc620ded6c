//! Order placement handlers.
//!
//! Checkout produces an outbound chat link rather than charging anything:
//! the order text is URL-encoded into a `wa.me` link pointing at the shop's
//! configured contact handle.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use cedars_core::order::{PendingOrder, help_message};
use cedars_core::prefs::LastOrder;
use cedars_core::{PlanId, ServiceId};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub service_id: ServiceId,
    pub plan_id: PlanId,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinkResponse {
    pub link: String,
    pub message: String,
}

fn chat_link(contact: &str, message: &str) -> String {
    format!("https://wa.me/{contact}?text={}", urlencoding::encode(message))
}

/// `POST /orders` - resolve the selected service and plan from the current
/// snapshot, build the outbound message link and remember the order.
pub async fn place(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<OrderLinkResponse>> {
    let catalog = state.catalog();
    let service = catalog
        .iter()
        .find(|service| service.id == request.service_id)
        .ok_or_else(|| AppError::NotFound(format!("service {}", request.service_id)))?;
    let plan = service
        .plans
        .iter()
        .find(|plan| plan.id == request.plan_id)
        .ok_or_else(|| AppError::NotFound(format!("plan {}", request.plan_id)))?;

    let order = PendingOrder {
        service: service.clone(),
        plan: plan.clone(),
        customer_email: request.customer_email,
        customer_phone: request.customer_phone,
    };
    let message = order.message();
    let link = chat_link(&state.config().order_contact, &message);

    state.prefs().set_last_order(&LastOrder {
        service_name: order.service.name,
        plan: order.plan,
        customer_email: order.customer_email,
        customer_phone: order.customer_phone,
        placed_at: Utc::now(),
    });

    tracing::info!(service = %request.service_id, plan = %request.plan_id, "order link produced");
    Ok(Json(OrderLinkResponse { link, message }))
}

/// `GET /orders/last` - the most recently placed order, if any.
pub async fn last(State(state): State<AppState>) -> Json<Option<LastOrder>> {
    Json(state.prefs().last_order())
}

/// `GET /help/link` - preformatted "need help" chat link.
pub async fn help_link(State(state): State<AppState>) -> Json<OrderLinkResponse> {
    let message = help_message().to_owned();
    let link = chat_link(&state.config().order_contact, &message);
    Json(OrderLinkResponse { link, message })
}
