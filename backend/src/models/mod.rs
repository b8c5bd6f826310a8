//! Domain models for SOW pricing tables

pub mod row;
pub mod scope;

// Re-exports
pub use row::PricingRow;
pub use scope::{aggregate_roles, ScopeBlock};
