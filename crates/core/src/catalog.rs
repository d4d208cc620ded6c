//! Catalog model and the document normalizer.
//!
//! Services and plans live in the external document store as loosely shaped
//! JSON written by the admin panel. The normalizer maps a raw document into
//! the canonical [`Service`] shape, filling defaults for every optional field
//! so that nothing downstream ever sees a missing name, a missing plans list
//! or an unparsable enum. Normalizing an already-normalized service is a
//! no-op.

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{PlanId, ServiceId};

/// Service category used for the storefront's service-level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Category {
    Streaming,
    Productivity,
    Entertainment,
    Tools,
    Games,
    #[serde(rename = "Gift Cards")]
    GiftCards,
    #[default]
    Other,
}

impl Category {
    /// All selectable categories, in admin-panel display order.
    pub const ALL: [Self; 7] = [
        Self::Streaming,
        Self::Productivity,
        Self::Entertainment,
        Self::Tools,
        Self::Games,
        Self::GiftCards,
        Self::Other,
    ];

    /// Display name as stored in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Streaming => "Streaming",
            Self::Productivity => "Productivity",
            Self::Entertainment => "Entertainment",
            Self::Tools => "Tools",
            Self::Games => "Games",
            Self::GiftCards => "Gift Cards",
            Self::Other => "Other",
        }
    }

    /// URL-safe slug for category deep links.
    #[must_use]
    pub fn slug(self) -> String {
        slugify(self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Accepts the display name or its slug (deep links use slugs).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == slug)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

impl<'de> Deserialize<'de> for Category {
    /// Unknown or non-string category values from free-text documents map
    /// to `Other` without failing the surrounding document.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::Other))
    }
}

/// Purchasable account type of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum PlanType {
    #[default]
    #[serde(rename = "Full Account")]
    FullAccount,
    #[serde(rename = "1 User")]
    OneUser,
    Private,
    Shared,
    Coins,
    #[serde(rename = "Top-Up")]
    TopUp,
}

impl PlanType {
    /// All selectable plan types, in admin-panel display order.
    pub const ALL: [Self; 6] = [
        Self::FullAccount,
        Self::OneUser,
        Self::Private,
        Self::Shared,
        Self::Coins,
        Self::TopUp,
    ];

    /// Display name as stored in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullAccount => "Full Account",
            Self::OneUser => "1 User",
            Self::Private => "Private",
            Self::Shared => "Shared",
            Self::Coins => "Coins",
            Self::TopUp => "Top-Up",
        }
    }

    /// Coin-denominated plans are labelled in units rather than months.
    #[must_use]
    pub const fn is_coin_denominated(self) -> bool {
        matches!(self, Self::Coins | Self::TopUp)
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        Self::ALL
            .into_iter()
            .find(|t| slugify(t.as_str()) == slug)
            .ok_or_else(|| format!("invalid plan type: {s}"))
    }
}

impl<'de> Deserialize<'de> for PlanType {
    /// Unknown or non-string plan type values fall back to `Full Account`,
    /// the default the admin panel shows for untyped plans.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::FullAccount))
    }
}

/// Delivery / billing duration of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum PlanDuration {
    #[default]
    Instant,
    #[serde(rename = "1-24 Hours")]
    UpToDay,
    Monthly,
    Yearly,
}

impl PlanDuration {
    /// All selectable durations, in admin-panel display order.
    pub const ALL: [Self; 4] = [Self::Instant, Self::UpToDay, Self::Monthly, Self::Yearly];

    /// Display name as stored in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instant => "Instant",
            Self::UpToDay => "1-24 Hours",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        Self::ALL
            .into_iter()
            .find(|d| slugify(d.as_str()) == slug)
            .ok_or_else(|| format!("invalid duration: {s}"))
    }
}

impl<'de> Deserialize<'de> for PlanDuration {
    /// Unknown or non-string duration values fall back to `Instant`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::Instant))
    }
}

/// One purchasable variant of a service.
///
/// Price fields stay numeric-strings end to end; parsing happens at the
/// derivation sites via [`crate::parse_amount`]. The `id` is assigned once
/// at plan creation and is the stable identity for plan updates, deletes and
/// the best-deal signal (the plans list is still ordered, but order is no
/// longer identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default = "PlanId::generate")]
    pub id: PlanId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(rename = "type", default)]
    pub plan_type: PlanType,
    #[serde(default)]
    pub duration: PlanDuration,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cost_price: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sell_price: String,
    #[serde(default = "default_discount", deserialize_with = "lenient_string")]
    pub discount: String,
    #[serde(default = "default_true", deserialize_with = "lenient_in_stock")]
    pub in_stock: bool,
}

impl Plan {
    /// A fresh plan with the admin panel's creation defaults.
    #[must_use]
    pub fn new_default() -> Self {
        Self {
            id: PlanId::generate(),
            label: "New Plan".to_owned(),
            plan_type: PlanType::Coins,
            duration: PlanDuration::Instant,
            cost_price: "0".to_owned(),
            sell_price: "0".to_owned(),
            discount: "0".to_owned(),
            in_stock: true,
        }
    }
}

/// A sellable digital product family containing one or more plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_note: String,
    #[serde(default, deserialize_with = "lenient_featured")]
    pub featured: bool,
    #[serde(default, deserialize_with = "lenient_plans")]
    pub plans: Vec<Plan>,
    /// Server-assigned last-modified timestamp, set on every write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Service {
    /// Normalize a raw document into the canonical service shape.
    ///
    /// Total over arbitrary JSON: a document whose fields are not even an
    /// object yields a service with every field defaulted, and a malformed
    /// individual field never poisons its neighbours. Plans without a stable
    /// id get one generated here.
    #[must_use]
    pub fn from_document(
        id: ServiceId,
        fields: &Value,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut doc = match fields {
            Value::Object(map) => {
                let mut with_id = map.clone();
                with_id.insert("id".to_owned(), Value::String(id.as_str().to_owned()));
                serde_json::from_value::<Self>(Value::Object(with_id)).unwrap_or_else(|_| {
                    Self::empty(id)
                })
            }
            _ => Self::empty(id),
        };
        doc.updated_at = updated_at;
        doc
    }

    /// Document fields for a store write: the serialized service without its
    /// identity or the server-owned timestamp.
    #[must_use]
    pub fn to_fields(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("id");
            map.remove("updatedAt");
        }
        value
    }

    /// A fresh service with the admin panel's creation defaults.
    #[must_use]
    pub fn new_default(id: ServiceId) -> Self {
        Self {
            name: "New Service".to_owned(),
            ..Self::empty(id)
        }
    }

    /// URL-safe slug of the service name for deep links.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    fn empty(id: ServiceId) -> Self {
        Self {
            id,
            name: String::new(),
            category: Category::Other,
            service_note: String::new(),
            featured: false,
            plans: Vec::new(),
            updated_at: None,
        }
    }
}

/// Lowercase a display name into a URL-safe slug.
///
/// Runs of non-alphanumeric characters collapse into single hyphens;
/// `"Gift Cards"` becomes `"gift-cards"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

fn default_discount() -> String {
    "0".to_owned()
}

const fn default_true() -> bool {
    true
}

/// Accept a string or a bare JSON number where a numeric-string is expected.
///
/// Older documents hold prices as numbers; the admin panel writes strings.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Ok(String::new()),
    }
}

/// Absence of the field means in stock; anything except literal `false` does.
fn lenient_in_stock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(!matches!(Value::deserialize(deserializer)?, Value::Bool(false)))
}

/// Only literal `true` marks a service featured.
fn lenient_featured<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Deserialize a plans array, skipping entries that are not objects.
fn lenient_plans<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Plan>, D::Error> {
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizer_fills_defaults() {
        let fields = json!({ "name": "Netflix" });
        let service = Service::from_document(ServiceId::new("a"), &fields, None);

        assert_eq!(service.name, "Netflix");
        assert_eq!(service.category, Category::Other);
        assert_eq!(service.service_note, "");
        assert!(!service.featured);
        assert!(service.plans.is_empty());
    }

    #[test]
    fn test_normalizer_missing_name_is_empty_string() {
        let service = Service::from_document(ServiceId::new("a"), &json!({}), None);
        assert_eq!(service.name, "");
    }

    #[test]
    fn test_normalizer_tolerates_non_object_fields() {
        let service = Service::from_document(ServiceId::new("a"), &json!("garbage"), None);
        assert_eq!(service.name, "");
        assert!(service.plans.is_empty());
    }

    #[test]
    fn test_normalizer_is_idempotent() {
        let fields = json!({
            "name": "Spotify",
            "category": "Streaming",
            "serviceNote": "family plans available",
            "featured": true,
            "plans": [{
                "id": "p-1",
                "label": "1 Month",
                "type": "Shared",
                "duration": "Monthly",
                "costPrice": "3",
                "sellPrice": "5",
                "discount": "1",
                "inStock": true
            }]
        });
        let once = Service::from_document(ServiceId::new("a"), &fields, None);
        let again = Service::from_document(once.id.clone(), &once.to_fields(), None);
        assert_eq!(once, again);
    }

    #[test]
    fn test_plan_price_accepts_numbers() {
        let fields = json!({
            "name": "PUBG",
            "plans": [{ "id": "p-1", "label": "660 UC", "costPrice": 7.5, "sellPrice": 10 }]
        });
        let service = Service::from_document(ServiceId::new("a"), &fields, None);
        let plan = &service.plans[0];
        assert_eq!(plan.cost_price, "7.5");
        assert_eq!(plan.sell_price, "10");
        assert_eq!(plan.discount, "0");
        assert!(plan.in_stock);
    }

    #[test]
    fn test_plan_without_id_gets_one_generated() {
        let fields = json!({
            "name": "Canva",
            "plans": [{ "label": "Yearly", "sellPrice": "20" }]
        });
        let service = Service::from_document(ServiceId::new("a"), &fields, None);
        assert!(!service.plans[0].id.as_str().is_empty());
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let fields = json!({
            "name": "X",
            "category": "Mystery",
            "plans": [{ "id": "p", "type": "Lifetime", "duration": "Weekly" }]
        });
        let service = Service::from_document(ServiceId::new("a"), &fields, None);
        assert_eq!(service.category, Category::Other);
        assert_eq!(service.plans[0].plan_type, PlanType::FullAccount);
        assert_eq!(service.plans[0].duration, PlanDuration::Instant);
    }

    #[test]
    fn test_non_string_enum_values_default_without_dropping_the_rest() {
        let fields = json!({
            "name": "Netflix",
            "category": 5,
            "featured": "yes",
            "plans": [{ "id": "p", "label": "1 Month", "sellPrice": "5", "type": 3, "duration": 7 }]
        });
        let service = Service::from_document(ServiceId::new("a"), &fields, None);

        assert_eq!(service.name, "Netflix");
        assert_eq!(service.category, Category::Other);
        assert!(!service.featured);
        assert_eq!(service.plans.len(), 1);
        assert_eq!(service.plans[0].label, "1 Month");
        assert_eq!(service.plans[0].plan_type, PlanType::FullAccount);
        assert_eq!(service.plans[0].duration, PlanDuration::Instant);
    }

    #[test]
    fn test_in_stock_only_false_means_out() {
        let fields = json!({
            "name": "X",
            "plans": [
                { "id": "a", "inStock": false },
                { "id": "b", "inStock": "yes" },
                { "id": "c" }
            ]
        });
        let service = Service::from_document(ServiceId::new("a"), &fields, None);
        assert!(!service.plans[0].in_stock);
        assert!(service.plans[1].in_stock);
        assert!(service.plans[2].in_stock);
    }

    #[test]
    fn test_to_fields_strips_identity_and_timestamp() {
        let service = Service::new_default(ServiceId::new("a"));
        let fields = service.to_fields();
        assert!(fields.get("id").is_none());
        assert!(fields.get("updatedAt").is_none());
        assert_eq!(fields["name"], "New Service");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Gift Cards"), "gift-cards");
        assert_eq!(slugify("  Apple TV+ "), "apple-tv");
        assert_eq!(slugify("1-24 Hours"), "1-24-hours");
    }

    #[test]
    fn test_category_from_display_name_or_slug() {
        assert_eq!("Gift Cards".parse::<Category>().unwrap(), Category::GiftCards);
        assert_eq!("gift-cards".parse::<Category>().unwrap(), Category::GiftCards);
        assert!("mystery".parse::<Category>().is_err());
    }

    #[test]
    fn test_wire_names_match_documents() {
        let json = serde_json::to_value(PlanType::TopUp).unwrap();
        assert_eq!(json, "Top-Up");
        let json = serde_json::to_value(PlanDuration::UpToDay).unwrap();
        assert_eq!(json, "1-24 Hours");
    }
}
