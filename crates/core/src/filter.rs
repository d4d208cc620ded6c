//! Filter/sort/search engine.
//!
//! Produces a filtered, sorted view of the catalog from the current filter
//! state. The state is passed in whole, favorites included; the engine never
//! reads preference storage mid-algorithm.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, PlanDuration, Service};
use crate::pricing::{self, BestDeal};
use crate::types::{ServiceId, parse_amount};

/// Plan ordering within each service card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Sell price, low to high.
    #[default]
    PriceLow,
    /// Sell price, high to low.
    PriceHigh,
    /// Plan label, A to Z.
    Name,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priceLow" => Ok(Self::PriceLow),
            "priceHigh" => Ok(Self::PriceHigh),
            "name" => Ok(Self::Name),
            _ => Err(format!("invalid sort: {s}")),
        }
    }
}

/// The complete filter state for one catalog view.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Case-insensitive substring matched against service name or plan label.
    pub search_text: String,
    pub sort_by: SortBy,
    /// `None` means "All".
    pub duration: Option<PlanDuration>,
    /// `None` means "All".
    pub category: Option<Category>,
    pub only_in_stock: bool,
    /// Keep only plans carrying a positive discount.
    pub only_best_deals: bool,
    pub only_favorites: bool,
    /// Favorite service ids, supplied by the caller from preference state.
    pub favorite_ids: HashSet<ServiceId>,
}

/// A filtered catalog together with the global best-deal signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub services: Vec<Service>,
    /// Computed over the unfiltered catalog: the best deal is a global
    /// signal, not a per-view one, and must not move when filters change.
    pub best_deal: Option<BestDeal>,
}

/// Apply the filter state to a catalog snapshot.
///
/// Per service: plans are narrowed by search text, stock, discount and
/// duration, then sorted; services left with no plans are dropped, and the
/// category and favorites filters apply at service level last.
#[must_use]
pub fn filter_catalog(services: &[Service], state: &FilterState) -> CatalogView {
    let best_deal = pricing::best_deal(services);
    let needle = state.search_text.to_lowercase();

    let services = services
        .iter()
        .filter(|service| {
            state
                .category
                .is_none_or(|category| service.category == category)
        })
        .filter(|service| !state.only_favorites || state.favorite_ids.contains(&service.id))
        .filter_map(|service| {
            let name_matches = service.name.to_lowercase().contains(&needle);
            let mut plans: Vec<_> = service
                .plans
                .iter()
                .filter(|plan| name_matches || plan.label.to_lowercase().contains(&needle))
                .filter(|plan| !state.only_in_stock || plan.in_stock)
                .filter(|plan| {
                    !state.only_best_deals || parse_amount(&plan.discount) > Decimal::ZERO
                })
                .filter(|plan| state.duration.is_none_or(|d| plan.duration == d))
                .cloned()
                .collect();

            if plans.is_empty() {
                return None;
            }

            match state.sort_by {
                SortBy::PriceLow => {
                    plans.sort_by_key(|plan| parse_amount(&plan.sell_price));
                }
                SortBy::PriceHigh => {
                    plans.sort_by_key(|plan| std::cmp::Reverse(parse_amount(&plan.sell_price)));
                }
                SortBy::Name => plans.sort_by(|a, b| a.label.cmp(&b.label)),
            }

            Some(Service {
                plans,
                ..service.clone()
            })
        })
        .collect();

    CatalogView {
        services,
        best_deal,
    }
}
