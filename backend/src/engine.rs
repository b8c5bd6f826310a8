//! Pricing Engine
//!
//! Process-wide, read-only holder for the rate catalog and the allocation
//! and policy configuration. Build it once at startup, then share it by
//! reference (or `Arc`) with every caller. Nothing in it is mutable, so
//! concurrent calls need no locking.
//!
//! # Configuration file
//!
//! ```json
//! {
//!   "rate_card": [{"name": "Tech - Integrations", "rate": 17000}],
//!   "allocation": {"pm_budget_threshold": 1500000, "hour_granularity": 0.5},
//!   "policy": {"qa_min_hours": 4}
//! }
//! ```
//!
//! Every section is optional; a missing `rate_card` means the built-in
//! card.

use crate::allocation::{allocate, Allocation, AllocationConfig, AllocationError};
use crate::catalog::{CatalogError, RateCatalog, RateCatalogEntry};
use crate::models::ScopeBlock;
use crate::policy::{
    propose, validate, validate_against_budget, PolicyConfig, Suggestion, ValidationResult,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while building an engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Rate card error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Allocation config error: {0}")]
    Allocation(#[from] AllocationError),
}

/// On-disk engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Replacement rate card; `None` keeps the built-in one
    pub rate_card: Option<Vec<RateCatalogEntry>>,
    pub allocation: AllocationConfig,
    pub policy: PolicyConfig,
}

/// Catalog plus configuration, immutable for its lifetime
///
/// # Example
/// ```
/// use sow_pricing_core::PricingEngine;
///
/// let engine = PricingEngine::standard();
/// let allocation = engine.allocate(&["Tech - Integrations"], 20_000_00).unwrap();
/// assert!(allocation.total_cost_cents() <= 20_000_00);
///
/// let result = engine.validate(&[]);
/// assert!(!result.ok);
/// ```
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: RateCatalog,
    allocation: AllocationConfig,
    policy: PolicyConfig,
}

impl PricingEngine {
    /// Build an engine, validating the allocation config up front
    pub fn new(
        catalog: RateCatalog,
        allocation: AllocationConfig,
        policy: PolicyConfig,
    ) -> Result<Self, EngineError> {
        allocation.validate()?;
        tracing::info!(roles = catalog.len(), "Pricing engine ready");
        Ok(Self {
            catalog,
            allocation,
            policy,
        })
    }

    /// Built-in rate card and default configuration
    pub fn standard() -> Self {
        Self {
            catalog: RateCatalog::standard(),
            allocation: AllocationConfig::default(),
            policy: PolicyConfig::default(),
        }
    }

    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        let catalog = match config.rate_card {
            Some(entries) => RateCatalog::new(entries)?,
            None => RateCatalog::standard(),
        };
        Self::new(catalog, config.allocation, config.policy)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::Parse(e.to_string()))?;
        Self::from_config(config)
    }

    /// Read a JSON engine config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn catalog(&self) -> &RateCatalog {
        &self.catalog
    }

    pub fn allocation_config(&self) -> &AllocationConfig {
        &self.allocation
    }

    pub fn policy_config(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Allocate with the engine's configuration
    pub fn allocate<S: AsRef<str>>(
        &self,
        role_names: &[S],
        budget_cents: i64,
    ) -> Result<Allocation, AllocationError> {
        allocate(&self.catalog, role_names, budget_cents, &self.allocation)
    }

    /// Allocate with a per-call configuration override
    pub fn allocate_with<S: AsRef<str>>(
        &self,
        role_names: &[S],
        budget_cents: i64,
        config: &AllocationConfig,
    ) -> Result<Allocation, AllocationError> {
        allocate(&self.catalog, role_names, budget_cents, config)
    }

    pub fn validate(&self, scopes: &[ScopeBlock]) -> ValidationResult {
        validate(scopes, &self.policy)
    }

    pub fn validate_against_budget(
        &self,
        scopes: &[ScopeBlock],
        target_budget_cents: i64,
    ) -> ValidationResult {
        validate_against_budget(scopes, target_budget_cents, &self.policy)
    }

    pub fn propose(&self, scopes: &[ScopeBlock]) -> Vec<Suggestion> {
        propose(scopes, &self.catalog, &self.policy)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::Hours;

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricingEngine>();
    }

    #[test]
    fn test_from_json_with_custom_card() {
        let engine = PricingEngine::from_json_str(
            r#"{
                "rate_card": [
                    {"name": "Tech - Head Of - Senior Project Management", "rate": 40000},
                    {"name": "Tech - Delivery - Project Management", "rate": 16000},
                    {"name": "Account Management - (Account Manager)", "rate": 20000},
                    {"name": "Developer", "rate": 10000}
                ],
                "allocation": {"hour_granularity": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(engine.catalog().len(), 4);
        assert_eq!(engine.allocation_config().hour_granularity, Hours::whole(1));
        assert_eq!(engine.policy_config(), &PolicyConfig::default());
    }

    #[test]
    fn test_empty_json_is_standard() {
        let engine = PricingEngine::from_json_str("{}").unwrap();
        assert_eq!(engine.catalog().len(), RateCatalog::standard().len());
    }

    #[test]
    fn test_invalid_allocation_config_rejected() {
        let err = PricingEngine::from_json_str(r#"{"allocation": {"hour_granularity": 0}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Allocation(AllocationError::InvalidGranularity(_))
        ));
    }

    #[test]
    fn test_parse_and_io_errors() {
        assert!(matches!(
            PricingEngine::from_json_str("{not json"),
            Err(EngineError::Parse(_))
        ));
        assert!(matches!(
            PricingEngine::load("/definitely/not/here.json"),
            Err(EngineError::Io { .. })
        ));
    }
}
