//! Catalog view handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use cedars_core::catalog::slugify;
use cedars_core::{
    Category, CatalogView, FilterState, PlanDuration, SortBy, pricing,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters of `GET /catalog`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub best_deals: Option<bool>,
    pub favorites: Option<bool>,
}

impl CatalogQuery {
    /// Build the engine filter state; unknown enum values are client errors
    /// here, unlike in stored documents where they fall back silently.
    fn into_filter(
        self,
        favorite_ids: std::collections::HashSet<cedars_core::ServiceId>,
    ) -> Result<FilterState> {
        let sort_by = match self.sort.as_deref() {
            None | Some("") => SortBy::default(),
            Some(raw) => raw.parse::<SortBy>().map_err(AppError::BadRequest)?,
        };
        let duration = match self.duration.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PlanDuration>().map_err(AppError::BadRequest)?),
        };
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Category>().map_err(AppError::BadRequest)?),
        };

        Ok(FilterState {
            search_text: self.search.unwrap_or_default(),
            sort_by,
            duration,
            category,
            only_in_stock: self.in_stock.unwrap_or(false),
            only_best_deals: self.best_deals.unwrap_or(false),
            only_favorites: self.favorites.unwrap_or(false),
            favorite_ids,
        })
    }
}

/// `GET /catalog` - filtered, sorted view plus the global best-deal signal.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogView>> {
    let favorite_ids = state.prefs().favorites().0;
    let filter = query.into_filter(favorite_ids)?;
    Ok(Json(cedars_core::filter::filter_catalog(
        &state.catalog(),
        &filter,
    )))
}

/// `GET /catalog/{slug}` - deep link by service name slug or category slug.
///
/// A category slug answers with the catalog narrowed to that category; a
/// service slug answers with just that service. The best-deal signal stays
/// global either way.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CatalogView>> {
    let catalog = state.catalog();

    if let Ok(category) = slug.parse::<Category>() {
        let filter = FilterState {
            category: Some(category),
            ..FilterState::default()
        };
        return Ok(Json(cedars_core::filter::filter_catalog(&catalog, &filter)));
    }

    let best_deal = pricing::best_deal(&catalog);
    let wanted = slugify(&slug);
    let service = catalog
        .iter()
        .find(|service| slugify(&service.name) == wanted)
        .cloned()
        .ok_or(AppError::NotFound(slug))?;

    Ok(Json(CatalogView {
        services: vec![service],
        best_deal,
    }))
}
