//! Project size tiers
//!
//! Governance staffing minimums scale with the size of the build, measured
//! in execution hours.

use crate::core::units::Hours;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSizeTier {
    Small,
    Medium,
    Large,
}

impl fmt::Display for ProjectSizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectSizeTier::Small => "small",
            ProjectSizeTier::Medium => "medium",
            ProjectSizeTier::Large => "large",
        };
        f.write_str(name)
    }
}

/// Upper execution-hour bounds (inclusive) for the small and medium tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub small_max: Hours,
    pub medium_max: Hours,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            small_max: Hours::whole(80),
            medium_max: Hours::whole(200),
        }
    }
}

impl TierThresholds {
    /// # Example
    /// ```
    /// use sow_pricing_core::policy::{ProjectSizeTier, TierThresholds};
    /// use sow_pricing_core::Hours;
    ///
    /// let tiers = TierThresholds::default();
    /// assert_eq!(tiers.tier_for(Hours::whole(80)), ProjectSizeTier::Small);
    /// assert_eq!(tiers.tier_for(Hours::whole(81)), ProjectSizeTier::Medium);
    /// assert_eq!(tiers.tier_for(Hours::whole(500)), ProjectSizeTier::Large);
    /// ```
    pub fn tier_for(&self, execution_hours: Hours) -> ProjectSizeTier {
        if execution_hours <= self.small_max {
            ProjectSizeTier::Small
        } else if execution_hours <= self.medium_max {
            ProjectSizeTier::Medium
        } else {
            ProjectSizeTier::Large
        }
    }
}

/// Minimum hours for one role in each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMinimums {
    pub small: Hours,
    pub medium: Hours,
    pub large: Hours,
}

impl TierMinimums {
    pub const fn whole(small: i64, medium: i64, large: i64) -> Self {
        Self {
            small: Hours::whole(small),
            medium: Hours::whole(medium),
            large: Hours::whole(large),
        }
    }

    pub fn for_tier(&self, tier: ProjectSizeTier) -> Hours {
        match tier {
            ProjectSizeTier::Small => self.small,
            ProjectSizeTier::Medium => self.medium,
            ProjectSizeTier::Large => self.large,
        }
    }
}

impl Default for TierMinimums {
    fn default() -> Self {
        Self::whole(0, 0, 0)
    }
}
