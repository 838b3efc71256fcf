//! CLI command implementations

pub mod aggregate;
pub mod reports;
pub mod seed;
