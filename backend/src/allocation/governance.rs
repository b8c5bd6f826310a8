//! Governance Selector
//!
//! Every priced SOW carries exactly one project management row and one
//! account management row. The PM tier depends on the budget: budgets
//! strictly above `pm_budget_threshold` get the senior "Head Of" tier,
//! everything else gets delivery project management.
//!
//! Selection is total: it never fails, even for a zero budget.

use super::AllocationConfig;
use crate::catalog::{CanonicalRole, RateCatalog};
use crate::core::units::Hours;
use crate::models::PricingRow;
use serde::{Deserialize, Serialize};

/// Senior PM tier role
pub const SENIOR_PM_ROLE: &str = "Tech - Head Of - Senior Project Management";

/// Delivery PM tier role
pub const DELIVERY_PM_ROLE: &str = "Tech - Delivery - Project Management";

/// Account management role priced into every allocation
pub const ACCOUNT_MANAGEMENT_ROLE: &str = "Account Management - (Account Manager)";

/// Project management tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PmTier {
    /// "Head Of" senior project management
    Senior,
    /// Delivery project management
    Delivery,
}

impl PmTier {
    /// Tier for a budget in cents
    pub fn for_budget(budget_cents: i64, config: &AllocationConfig) -> Self {
        if budget_cents > config.pm_budget_threshold {
            PmTier::Senior
        } else {
            PmTier::Delivery
        }
    }

    pub fn role_name(self) -> &'static str {
        match self {
            PmTier::Senior => SENIOR_PM_ROLE,
            PmTier::Delivery => DELIVERY_PM_ROLE,
        }
    }

    pub fn hours(self, config: &AllocationConfig) -> Hours {
        match self {
            PmTier::Senior => config.senior_pm_hours,
            PmTier::Delivery => config.delivery_pm_hours,
        }
    }

    fn description(self) -> &'static str {
        match self {
            PmTier::Senior => "Strategic oversight",
            PmTier::Delivery => "Project delivery management",
        }
    }
}

/// The two governance rows and what they cost together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceSelection {
    pub tier: PmTier,
    pub pm_row: PricingRow,
    pub am_row: PricingRow,
    /// `pm_row` cost + `am_row` cost, in scaled cents
    pub baseline_cost: i128,
}

impl GovernanceSelection {
    pub fn into_rows(self) -> Vec<PricingRow> {
        vec![self.pm_row, self.am_row]
    }
}

/// Choose the PM tier and build both governance rows
///
/// # Example
/// ```
/// use sow_pricing_core::allocation::{select_governance, PmTier};
/// use sow_pricing_core::{AllocationConfig, Hours, RateCatalog};
///
/// let catalog = RateCatalog::standard();
/// let config = AllocationConfig::default();
///
/// let small = select_governance(&catalog, 10_000_00, &config);
/// assert_eq!(small.tier, PmTier::Delivery);
/// assert_eq!(small.am_row.hours, Hours::whole(8));
///
/// let large = select_governance(&catalog, 20_000_00, &config);
/// assert_eq!(large.tier, PmTier::Senior);
/// ```
pub fn select_governance(
    catalog: &RateCatalog,
    budget_cents: i64,
    config: &AllocationConfig,
) -> GovernanceSelection {
    let tier = PmTier::for_budget(budget_cents, config);

    let pm_row = governance_row(catalog, tier.role_name(), tier.hours(config))
        .with_description(tier.description());
    let am_row = governance_row(catalog, ACCOUNT_MANAGEMENT_ROLE, config.account_management_hours)
        .with_description("Client comms & governance");

    let baseline_cost = pm_row.scaled_cost() + am_row.scaled_cost();

    GovernanceSelection {
        tier,
        pm_row,
        am_row,
        baseline_cost,
    }
}

fn governance_row(catalog: &RateCatalog, role: &str, hours: Hours) -> PricingRow {
    match catalog.canonicalize(role) {
        CanonicalRole::Matched(entry) => {
            PricingRow::new(entry.canonical_name.clone(), hours, entry.hourly_rate)
        }
        CanonicalRole::Unmatched(name) => {
            tracing::warn!(role = %name, "Governance role missing from rate catalog, pricing at 0");
            PricingRow::new(name, hours, 0)
        }
    }
}
