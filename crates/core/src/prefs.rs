//! Shopper preference value types.
//!
//! These are the values the storefront persists in its local key-value
//! store: theme flag, preferred plan type, favorite service ids and the
//! last placed order. The storage itself lives in the storefront crate;
//! this module only defines the shapes, their keys and their defaults, so
//! the filter engine and the API surface agree on them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Plan, PlanType};
use crate::types::ServiceId;

/// Storage keys, one per preference kind.
pub mod keys {
    pub const THEME_DARK: &str = "themeDark";
    pub const PREFERRED_PLAN_TYPE: &str = "preferredPlanType";
    pub const FAVORITE_SERVICE_IDS: &str = "favoriteServiceIds";
    pub const LAST_ORDER: &str = "lastOrder";
}

/// Favorite service ids with set semantics.
///
/// Serialized as a JSON array; membership, not order, is what round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteIds(pub HashSet<ServiceId>);

impl FavoriteIds {
    /// Toggle membership; returns whether the id is a favorite afterwards.
    pub fn toggle(&mut self, id: ServiceId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }
}

/// Snapshot of the most recently placed order.
///
/// Written when an order link is produced; purely a convenience memory, not
/// order persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOrder {
    pub service_name: String,
    pub plan: Plan,
    pub customer_email: String,
    pub customer_phone: String,
    pub placed_at: chrono::DateTime<chrono::Utc>,
}

/// All shopper preferences with their documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Dark theme unless explicitly switched.
    pub theme_dark: bool,
    pub preferred_plan_type: Option<PlanType>,
    pub favorites: FavoriteIds,
    pub last_order: Option<LastOrder>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme_dark: true,
            preferred_plan_type: None,
            favorites: FavoriteIds::default(),
            last_order: None,
        }
    }
}
