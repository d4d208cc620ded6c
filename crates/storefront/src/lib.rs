//! Cedars Subscriptions storefront library.
//!
//! The storefront functionality as a library, so the routers can be driven
//! directly in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog_feed;
pub mod config;
pub mod error;
pub mod prefs;
pub mod routes;
pub mod state;
