//! Core numeric types shared by the catalog, allocator and validator

pub mod units;

pub use units::{scaled_budget, scaled_cost, scaled_to_cents, Hours, HOURS_SCALE};
