//! Rate Catalog
//!
//! The authoritative mapping from canonical role name to hourly rate.
//! A catalog is built once at process start and is read-only afterwards:
//! there is no update API, a changed rate card is a new catalog. Rows
//! produced from a catalog copy the rate by value, so replacing the
//! catalog never alters rows that already exist.
//!
//! All rates are i64 cents per hour.

pub mod canonical;
pub mod standard;

pub use canonical::{
    is_governance_role, is_qa_role, is_senior_execution_role, normalize_role_name, CanonicalRole,
};
pub use standard::STANDARD_RATE_CARD;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a catalog
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Role name must not be empty")]
    EmptyRoleName,

    #[error("Negative hourly rate for role '{role}': {rate}")]
    NegativeRate { role: String, rate: i64 },

    #[error("Role '{role}' collides with existing role '{existing}' after normalization")]
    DuplicateRole { role: String, existing: String },

    #[error("Invalid rate card JSON: {0}")]
    InvalidJson(String),
}

/// One rate card line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCatalogEntry {
    /// Unique canonical role name (e.g. "Tech - Integrations")
    #[serde(rename = "name")]
    pub canonical_name: String,

    /// Hourly rate in cents
    #[serde(rename = "rate")]
    pub hourly_rate: i64,
}

impl RateCatalogEntry {
    pub fn new(canonical_name: impl Into<String>, hourly_rate: i64) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            hourly_rate,
        }
    }
}

/// Immutable rate catalog with a normalized-name index
///
/// # Example
/// ```
/// use sow_pricing_core::catalog::{CanonicalRole, RateCatalog};
///
/// let catalog = RateCatalog::standard();
/// let entry = catalog.lookup("Tech - Integrations").unwrap();
/// assert_eq!(entry.hourly_rate, 170_00);
///
/// match catalog.canonicalize("tech-integrations") {
///     CanonicalRole::Matched(e) => assert_eq!(e.canonical_name, "Tech - Integrations"),
///     CanonicalRole::Unmatched(_) => panic!("should resolve"),
/// }
/// assert!(!catalog.canonicalize("Astronaut").is_matched());
/// ```
#[derive(Debug, Clone)]
pub struct RateCatalog {
    entries: Vec<RateCatalogEntry>,
    /// normalized name -> position in `entries`
    index: HashMap<String, usize>,
}

impl RateCatalog {
    /// Build a catalog, rejecting blank names, negative rates, and names
    /// that collide once normalized
    pub fn new(entries: Vec<RateCatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if entry.canonical_name.trim().is_empty() {
                return Err(CatalogError::EmptyRoleName);
            }
            if entry.hourly_rate < 0 {
                return Err(CatalogError::NegativeRate {
                    role: entry.canonical_name.clone(),
                    rate: entry.hourly_rate,
                });
            }
            let key = normalize_role_name(&entry.canonical_name);
            if let Some(&existing) = index.get(&key) {
                let existing: &RateCatalogEntry = &entries[existing];
                return Err(CatalogError::DuplicateRole {
                    role: entry.canonical_name.clone(),
                    existing: existing.canonical_name.clone(),
                });
            }
            index.insert(key, pos);
        }
        Ok(Self { entries, index })
    }

    /// The built-in agency rate card
    pub fn standard() -> Self {
        let entries = STANDARD_RATE_CARD
            .iter()
            .map(|(name, rate)| RateCatalogEntry::new(*name, *rate))
            .collect();
        // The built-in card is checked by test_standard_card_is_valid
        Self::new(entries).unwrap_or_else(|e| panic!("built-in rate card is invalid: {}", e))
    }

    /// Load a catalog from a JSON array of `{"name": ..., "rate": <cents>}`
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<RateCatalogEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::InvalidJson(e.to_string()))?;
        Self::new(entries)
    }

    /// Exact lookup by canonical name
    pub fn lookup(&self, name: &str) -> Option<&RateCatalogEntry> {
        self.entries.iter().find(|e| e.canonical_name == name)
    }

    /// Rate for an exact canonical name, 0 if absent
    pub fn rate_for(&self, name: &str) -> i64 {
        self.lookup(name).map_or(0, |e| e.hourly_rate)
    }

    /// Resolve a free-text role name to a catalog entry
    pub fn canonicalize(&self, raw_name: &str) -> CanonicalRole<'_> {
        match self.index.get(&normalize_role_name(raw_name)) {
            Some(&pos) => CanonicalRole::Matched(&self.entries[pos]),
            None => CanonicalRole::Unmatched(raw_name.trim().to_string()),
        }
    }

    pub fn entries(&self) -> &[RateCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RateCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
