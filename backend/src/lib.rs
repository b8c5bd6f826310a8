//! SOW Pricing Core - Rust Engine
//!
//! Deterministic pricing for Statement-of-Work line items: turns suggested
//! role names and a tax-exclusive budget into `(role, hours, rate)` rows,
//! and checks priced (or hand-edited) tables against governance policy.
//!
//! # Architecture
//!
//! - **core**: Fixed-point hours and exact cost arithmetic
//! - **catalog**: Rate card and role name canonicalization
//! - **models**: Domain types (PricingRow, ScopeBlock)
//! - **allocation**: Governance selection and the budget allocator
//! - **policy**: Policy validator and adjustment proposer
//! - **engine**: Process-wide immutable catalog + configuration holder
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents); hours are i64 hundredths of an hour
//! 2. The allocator never exceeds the budget once governance is covered
//! 3. Rates are copied into rows, never referenced
//! 4. Everything is a pure function of its inputs (no globals, no I/O)

// Module declarations
pub mod allocation;
pub mod catalog;
pub mod core;
pub mod engine;
pub mod models;
pub mod policy;

// Re-exports for convenience
pub use crate::allocation::{
    allocate, select_governance, Allocation, AllocationConfig, AllocationError, GovernanceSelection,
    PmTier, UnmatchedRolePolicy, MAX_ADJUSTMENT_ITERATIONS, MAX_BUDGET_CENTS,
};
pub use crate::catalog::{CanonicalRole, CatalogError, RateCatalog, RateCatalogEntry};
pub use crate::core::units::Hours;
pub use crate::engine::{EngineConfig, EngineError, PricingEngine};
pub use crate::models::{aggregate_roles, PricingRow, ScopeBlock};
pub use crate::policy::{
    propose, validate, validate_against_budget, PolicyConfig, Severity, Suggestion,
    ValidationResult, Violation, ViolationCode,
};
