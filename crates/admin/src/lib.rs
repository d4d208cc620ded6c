//! Cedars Subscriptions admin panel library.
//!
//! The admin functionality as a library, so the routers can be driven
//! directly in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
