//! Pricing row model
//!
//! One line of a priced SOW table: a role, the hours allotted to it, and the
//! hourly rate that applied when the row was created.
//!
//! CRITICAL: `rate` is a value snapshot (i64 cents per hour). A row never
//! refers back to the catalog it was priced from.

use crate::core::units::{scaled_cost, scaled_to_cents, Hours};
use serde::{Deserialize, Serialize};

/// A priced `(role, hours, rate)` line
///
/// # Example
/// ```
/// use sow_pricing_core::{Hours, PricingRow};
///
/// let row = PricingRow::new("Tech - Integrations", Hours::from_hundredths(250), 170_00);
/// assert_eq!(row.cost_cents(), 425_00); // 2.5h × $170
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRow {
    /// Role name (canonical catalog name when produced by the allocator)
    pub role: String,

    /// Free-text description shown next to the role
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Hours allotted
    pub hours: Hours,

    /// Hourly rate in cents, copied at creation time
    pub rate: i64,
}

impl PricingRow {
    pub fn new(role: impl Into<String>, hours: Hours, rate: i64) -> Self {
        Self {
            role: role.into(),
            description: String::new(),
            hours,
            rate,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Exact cost in scaled cents (cents × 100)
    pub fn scaled_cost(&self) -> i128 {
        scaled_cost(self.hours, self.rate)
    }

    /// Cost rounded to whole cents
    pub fn cost_cents(&self) -> i64 {
        scaled_to_cents(self.scaled_cost())
    }

    /// Hours must be non-negative and billable hours need a positive rate
    pub fn has_valid_values(&self) -> bool {
        !self.hours.is_negative() && !(self.hours.is_positive() && self.rate <= 0)
    }
}
