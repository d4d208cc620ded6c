//! Shopper preference handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use cedars_core::{PlanType, ServiceId};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeBody {
    pub dark: bool,
}

/// `GET /prefs/theme`
pub async fn theme(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        dark: state.prefs().theme_dark(),
    })
}

/// `PUT /prefs/theme`
pub async fn set_theme(State(state): State<AppState>, Json(body): Json<ThemeBody>) -> Json<ThemeBody> {
    state.prefs().set_theme_dark(body.dark);
    Json(body)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTypeBody {
    /// `null` clears the preference.
    pub plan_type: Option<String>,
}

/// `GET /prefs/plan-type`
pub async fn plan_type(State(state): State<AppState>) -> Json<PlanTypeBody> {
    Json(PlanTypeBody {
        plan_type: state
            .prefs()
            .preferred_plan_type()
            .map(|t| t.as_str().to_owned()),
    })
}

/// `PUT /prefs/plan-type`
pub async fn set_plan_type(
    State(state): State<AppState>,
    Json(body): Json<PlanTypeBody>,
) -> Result<Json<PlanTypeBody>> {
    let parsed = match body.plan_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<PlanType>().map_err(AppError::BadRequest)?),
    };
    state.prefs().set_preferred_plan_type(parsed);
    Ok(Json(PlanTypeBody {
        plan_type: parsed.map(|t| t.as_str().to_owned()),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesBody {
    pub favorites: Vec<ServiceId>,
}

/// `GET /prefs/favorites`
pub async fn favorites(State(state): State<AppState>) -> Json<FavoritesBody> {
    let mut favorites: Vec<_> = state.prefs().favorites().0.into_iter().collect();
    favorites.sort();
    Json(FavoritesBody { favorites })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub id: ServiceId,
    pub favorite: bool,
}

/// `POST /prefs/favorites/{id}` - toggle membership.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ToggleResponse> {
    let id = ServiceId::new(id);
    let favorite = state.prefs().toggle_favorite(id.clone());
    Json(ToggleResponse { id, favorite })
}
