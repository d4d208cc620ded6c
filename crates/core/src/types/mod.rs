//! Core types for Cedars Subscriptions.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{format_amount, parse_amount};
