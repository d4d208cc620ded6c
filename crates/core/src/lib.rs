//! Cedars Core - Shared domain types and pure engines.
//!
//! This crate provides the common types and derivation logic used across all
//! Cedars Subscriptions components:
//! - `storefront` - Public-facing shop API
//! - `admin` - Internal administration panel API
//! - `cli` - Command-line tools for seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no network
//! access, no document store client. Everything here is recomputed from a
//! catalog snapshot and a filter state; nothing reads ambient state
//! mid-algorithm.
//!
//! # Modules
//!
//! - [`types`] - Newtype id wrappers and numeric-string money parsing
//! - [`catalog`] - Service/Plan model and the document normalizer
//! - [`pricing`] - Profit, best-deal, savings and bundle derivations
//! - [`filter`] - Filter/sort/search over a catalog snapshot
//! - [`prefs`] - Shopper preference value types
//! - [`order`] - Pending order snapshot and outbound message text
//! - [`report`] - CSV report building

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod filter;
pub mod order;
pub mod prefs;
pub mod pricing;
pub mod report;
pub mod types;

pub use catalog::{Category, Plan, PlanDuration, PlanType, Service};
pub use filter::{CatalogView, FilterState, SortBy};
pub use pricing::{BestDeal, BundleConfig, BundleItem};
pub use types::*;
