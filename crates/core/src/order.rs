//! Pending order snapshot and the outbound message text.
//!
//! Checkout is an outbound chat link: the storefront formats an order (or a
//! "need help" request) as plain text, URL-encodes it and points the shopper
//! at the shop's contact handle. Nothing is charged or persisted here.

use serde::{Deserialize, Serialize};

use crate::catalog::{Plan, Service};

/// A transient order, alive from the "Buy Now" click until the outbound
/// message link is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub service: Service,
    pub plan: Plan,
    pub customer_email: String,
    pub customer_phone: String,
}

impl PendingOrder {
    /// The preformatted order message, before URL encoding.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Hi I want to order {} - {} (contact: {} / {})",
            self.service.name, self.plan.label, self.customer_email, self.customer_phone
        )
    }
}

/// The preformatted "need help" message, before URL encoding.
#[must_use]
pub fn help_message() -> &'static str {
    "Hi, I need help with my subscription order"
}
