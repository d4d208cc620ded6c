//! CLI command implementations.

pub mod admin;
pub mod report;
pub mod seed;
