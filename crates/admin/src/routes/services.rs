//! Service and plan management handlers.
//!
//! Reads go straight to the document store rather than a subscription
//! snapshot so the panel always edits the freshest document. Plan
//! operations address plans by their stable generated id and rewrite the
//! whole plans array, which is how the store holds them.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use cedars_core::types::format_amount;
use cedars_core::{Plan, PlanId, Service, ServiceId, pricing};
use cedars_store::{Document, collections};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

fn normalize(document: &Document) -> Service {
    Service::from_document(
        ServiceId::new(document.id.as_str()),
        &document.fields,
        document.updated_at,
    )
}

async fn load_service(state: &AppState, id: &str) -> Result<Service> {
    let document = state.store().get_document(collections::SERVICES, id).await?;
    Ok(normalize(&document))
}

/// Keep only client-writable fields of a patch body.
fn writable_fields(body: Value) -> Result<Value> {
    let Value::Object(mut map) = body else {
        return Err(AppError::BadRequest("expected a JSON object".to_string()));
    };
    map.remove("id");
    map.remove("updatedAt");
    Ok(Value::Object(map))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// `GET /services?search=` - all services, optionally filtered by a
/// case-insensitive name substring.
pub async fn list(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Service>>> {
    let documents = state.store().list_documents(collections::SERVICES).await?;
    let needle = query.search.unwrap_or_default().to_lowercase();
    let services = documents
        .iter()
        .map(normalize)
        .filter(|service| needle.is_empty() || service.name.to_lowercase().contains(&needle))
        .collect();
    Ok(Json(services))
}

/// `POST /services` - create a service with the panel's defaults.
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
) -> Result<(StatusCode, Json<Service>)> {
    // the store assigns the real id; the placeholder never persists
    let fields = Service::new_default(ServiceId::new("")).to_fields();
    let document = state
        .store()
        .create_document(collections::SERVICES, fields)
        .await?;
    tracing::info!(id = %document.id, "service created");
    Ok((StatusCode::CREATED, Json(normalize(&document))))
}

/// `PATCH /services/{id}` - shallow field update.
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Service>> {
    let fields = writable_fields(body)?;
    let document = state
        .store()
        .update_document(collections::SERVICES, &id, fields)
        .await?;
    Ok(Json(normalize(&document)))
}

/// `DELETE /services/{id}`
pub async fn delete(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state
        .store()
        .delete_document(collections::SERVICES, &id)
        .await?;
    tracing::info!(%id, "service deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /services/{id}/plans` - append a default plan with a fresh id.
pub async fn add_plan(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Plan>)> {
    let mut service = load_service(&state, &id).await?;
    let plan = Plan::new_default();
    service.plans.push(plan.clone());
    state
        .store()
        .update_document(collections::SERVICES, &id, json!({ "plans": service.plans }))
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// `PATCH /services/{id}/plans/{plan_id}` - update one plan by stable id.
pub async fn update_plan(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Path((id, plan_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Plan>> {
    let patch = writable_fields(body)?;
    let mut service = load_service(&state, &id).await?;
    let plan_id = PlanId::new(plan_id);

    let plan = service
        .plans
        .iter_mut()
        .find(|plan| plan.id == plan_id)
        .ok_or_else(|| AppError::NotFound(format!("plan {plan_id}")))?;

    let mut merged = serde_json::to_value(&*plan)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if let (Value::Object(target), Value::Object(incoming)) = (&mut merged, patch) {
        for (key, value) in incoming {
            target.insert(key, value);
        }
    }
    *plan = serde_json::from_value(merged).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let updated = plan.clone();

    state
        .store()
        .update_document(collections::SERVICES, &id, json!({ "plans": service.plans }))
        .await?;
    Ok(Json(updated))
}

/// `DELETE /services/{id}/plans/{plan_id}` - remove one plan by stable id.
pub async fn delete_plan(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Path((id, plan_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let mut service = load_service(&state, &id).await?;
    let plan_id = PlanId::new(plan_id);
    let before = service.plans.len();
    service.plans.retain(|plan| plan.id != plan_id);
    if service.plans.len() == before {
        return Err(AppError::NotFound(format!("plan {plan_id}")));
    }

    state
        .store()
        .update_document(collections::SERVICES, &id, json!({ "plans": service.plans }))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    pub service_id: ServiceId,
    pub name: String,
    pub total_profit: String,
    /// Yearly-over-monthly savings signal, 0 when not applicable.
    pub savings_percent: i64,
    pub plans: Vec<PlanProfit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProfit {
    pub plan_id: PlanId,
    pub label: String,
    pub final_price: String,
    pub profit: String,
}

/// `GET /services/{id}/profit` - derived margins for one service.
pub async fn profit(
    State(state): State<AppState>,
    _auth: RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<ProfitReport>> {
    let service = load_service(&state, &id).await?;
    let plans = service
        .plans
        .iter()
        .map(|plan| PlanProfit {
            plan_id: plan.id.clone(),
            label: plan.label.clone(),
            final_price: format_amount(pricing::final_price(plan)),
            profit: format_amount(pricing::plan_profit(plan)),
        })
        .collect();

    Ok(Json(ProfitReport {
        total_profit: format_amount(pricing::service_total_profit(&service)),
        savings_percent: pricing::savings_percent(&service),
        service_id: service.id,
        name: service.name,
        plans,
    }))
}
