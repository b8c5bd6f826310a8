//! Budget Allocation
//!
//! Turns a list of suggested role names and a tax-exclusive budget into a
//! priced row set: two governance rows (project management tier and account
//! management) followed by execution rows whose total lands at or just under
//! the budget.
//!
//! # Critical Invariants
//!
//! 1. The total never exceeds the budget once the budget covers the
//!    governance baseline
//! 2. Every execution row's hours are a multiple of the hour granularity
//! 3. Exactly one PM row and one account management row, governance first
//! 4. Rates are copied into rows at creation time
//! 5. Same inputs produce the same rows (no randomness, no hidden state)

pub mod allocator;
pub mod governance;

pub use allocator::{allocate, MAX_ADJUSTMENT_ITERATIONS, MAX_BUDGET_CENTS};
pub use governance::{
    select_governance, GovernanceSelection, PmTier, ACCOUNT_MANAGEMENT_ROLE, DELIVERY_PM_ROLE,
    SENIOR_PM_ROLE,
};

use crate::core::units::{scaled_to_cents, Hours};
use crate::models::PricingRow;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of governance rows at the head of every allocation
pub const GOVERNANCE_ROW_COUNT: usize = 2;

/// Errors that can occur during allocation
///
/// Unmatched roles, a zero budget, and an empty pool are not errors unless
/// the configuration asks for strict role matching.
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    #[error("Hour granularity must be positive, got {0}h")]
    InvalidGranularity(Hours),

    #[error("{field} must not be negative, got {hours}h")]
    NegativeGovernanceHours { field: &'static str, hours: Hours },

    #[error("{field} ({hours}h) is not a multiple of the {granularity}h granularity")]
    GovernanceHoursOffGrid {
        field: &'static str,
        hours: Hours,
        granularity: Hours,
    },

    #[error("Tolerance must be at most 10000 bps, got {0}")]
    InvalidTolerance(u32),

    #[error("Unmatched role names: {}", .0.join(", "))]
    UnmatchedRoles(Vec<String>),

    #[error("Budget of {budget_cents} cents exceeds the supported maximum of {max_cents}")]
    BudgetOutOfRange { budget_cents: i64, max_cents: i64 },
}

/// What the allocator does with role names that are not in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedRolePolicy {
    /// Leave them out of the pool and report them in `Allocation::unmatched`
    #[default]
    Exclude,
    /// Fail with `AllocationError::UnmatchedRoles`
    Reject,
}

/// Allocation configuration
///
/// Money in cents, hours as [`Hours`]. Every field has a default, so a
/// partial JSON object is a valid override.
///
/// # Example
/// ```
/// use sow_pricing_core::{AllocationConfig, Hours};
///
/// let config: AllocationConfig = serde_json::from_str(r#"{"hour_granularity": 0.25}"#).unwrap();
/// assert_eq!(config.hour_granularity, Hours::from_hundredths(25));
/// assert_eq!(config.pm_budget_threshold, 15_000_00);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Budgets strictly above this (cents) get the senior PM tier
    pub pm_budget_threshold: i64,

    /// Hours for the senior ("Head Of") PM tier
    pub senior_pm_hours: Hours,

    /// Hours for the delivery PM tier
    pub delivery_pm_hours: Hours,

    /// Hours for account management, regardless of tier
    pub account_management_hours: Hours,

    /// Smallest hours increment for any row
    pub hour_granularity: Hours,

    /// Tolerance band under the budget, in basis points (300 = 3%)
    ///
    /// The top-up pass aims for `total >= budget × (1 - tolerance)`.
    pub tolerance_bps: u32,

    /// Handling of role names missing from the catalog
    pub unmatched_roles: UnmatchedRolePolicy,

    /// Roles to distribute to when the suggested pool ends up empty
    pub fallback_roles: Vec<String>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            pm_budget_threshold: 15_000_00,                    // $15,000
            senior_pm_hours: Hours::whole(5),                  // 5h Head Of
            delivery_pm_hours: Hours::whole(5),                // 5h Delivery PM
            account_management_hours: Hours::whole(8),         // 8h AM
            hour_granularity: Hours::from_hundredths(50),      // half-hour steps
            tolerance_bps: 300,                                // 3%
            unmatched_roles: UnmatchedRolePolicy::Exclude,
            fallback_roles: Vec::new(),
        }
    }
}

impl AllocationConfig {
    /// Check the configuration before any allocation work
    pub fn validate(&self) -> Result<(), AllocationError> {
        let step = self.hour_granularity;
        if !step.is_positive() {
            return Err(AllocationError::InvalidGranularity(step));
        }
        if self.tolerance_bps > 10_000 {
            return Err(AllocationError::InvalidTolerance(self.tolerance_bps));
        }

        let governance_hours = [
            ("senior_pm_hours", self.senior_pm_hours),
            ("delivery_pm_hours", self.delivery_pm_hours),
            ("account_management_hours", self.account_management_hours),
        ];
        for (field, hours) in governance_hours {
            if hours.is_negative() {
                return Err(AllocationError::NegativeGovernanceHours { field, hours });
            }
            if !hours.is_multiple_of(step) {
                return Err(AllocationError::GovernanceHoursOffGrid {
                    field,
                    hours,
                    granularity: step,
                });
            }
        }
        Ok(())
    }
}

/// Result of one allocation call
///
/// `rows` holds the governance rows first, then the execution rows in pool
/// order. The remaining fields report how the tightening pass went; none
/// of them are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub rows: Vec<PricingRow>,

    /// Suggested names that matched no catalog entry and were left out
    pub unmatched: Vec<String>,

    /// Single-step adjustments attempted by the trim and top-up passes
    pub adjustment_iterations: usize,

    /// A pass stopped at `MAX_ADJUSTMENT_ITERATIONS`
    pub cap_exhausted: bool,

    /// The total reached the tolerance floor under the budget
    pub tolerance_met: bool,
}

impl Allocation {
    /// Exact total in scaled cents (cents × 100)
    pub fn total_cost_scaled(&self) -> i128 {
        self.rows.iter().map(PricingRow::scaled_cost).sum()
    }

    /// Total rounded to whole cents
    pub fn total_cost_cents(&self) -> i64 {
        scaled_to_cents(self.total_cost_scaled())
    }

    /// The PM row followed by the account management row
    pub fn governance_rows(&self) -> &[PricingRow] {
        &self.rows[..GOVERNANCE_ROW_COUNT.min(self.rows.len())]
    }

    /// Rows priced from the suggested role pool
    pub fn execution_rows(&self) -> &[PricingRow] {
        &self.rows[GOVERNANCE_ROW_COUNT.min(self.rows.len())..]
    }

    pub fn into_rows(self) -> Vec<PricingRow> {
        self.rows
    }

    /// SHA256 over the row data, stable across runs and platforms
    ///
    /// Two allocations with the same fingerprint priced the same roles with
    /// the same hours and rates in the same order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for row in &self.rows {
            hasher.update(row.role.as_bytes());
            hasher.update([0u8]);
            hasher.update(row.description.as_bytes());
            hasher.update([0u8]);
            hasher.update(row.hours.hundredths().to_le_bytes());
            hasher.update(row.rate.to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}
