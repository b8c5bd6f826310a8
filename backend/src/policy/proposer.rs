//! Adjustment Proposer
//!
//! Turns policy findings into concrete edits. Advisory only: nothing here
//! mutates the input, and neither the allocator nor the validator calls it.

use super::validator::StaffingSummary;
use super::PolicyConfig;
use crate::catalog::{is_qa_role, RateCatalog};
use crate::core::units::Hours;
use crate::models::ScopeBlock;
use serde::{Deserialize, Serialize};

/// A suggested edit to a pricing structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Suggestion {
    /// Add a role that is not present
    AddRole {
        role: String,
        hours: Hours,
        /// Catalog rate in cents, `None` when the role is not in the catalog
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rate: Option<i64>,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        description: String,
    },
    /// Set an existing role's total hours
    UpdateRoleHours { role: String, hours: Hours },
}

impl Suggestion {
    pub fn role(&self) -> &str {
        match self {
            Suggestion::AddRole { role, .. } | Suggestion::UpdateRoleHours { role, .. } => role,
        }
    }

    pub fn hours(&self) -> Hours {
        match self {
            Suggestion::AddRole { hours, .. } | Suggestion::UpdateRoleHours { hours, .. } => *hours,
        }
    }
}

/// Suggest edits that would clear the mandatory-role, staffing and QA findings
///
/// - missing mandatory role: add it with its default hours (raised to the
///   tier minimum) at the catalog rate
/// - understaffed mandatory role: raise it to the tier minimum
/// - QA below baseline: top up the existing QA role, or add the configured
///   QA role with the required hours
///
/// # Example
/// ```
/// use sow_pricing_core::policy::{propose, PolicyConfig, Suggestion};
/// use sow_pricing_core::{Hours, RateCatalog};
///
/// let suggestions = propose(&[], &RateCatalog::standard(), &PolicyConfig::default());
/// assert_eq!(suggestions.len(), 3);
/// assert_eq!(
///     suggestions[0],
///     Suggestion::AddRole {
///         role: "Tech - Head Of - Senior Project Management".to_string(),
///         hours: Hours::whole(3),
///         rate: Some(365_00),
///         description: "Strategic oversight".to_string(),
///     }
/// );
/// ```
pub fn propose(
    scopes: &[ScopeBlock],
    catalog: &RateCatalog,
    policy: &PolicyConfig,
) -> Vec<Suggestion> {
    let summary = StaffingSummary::from_scopes(scopes, policy);
    let mut suggestions = Vec::new();

    for mandatory in &policy.mandatory_roles {
        let minimum = mandatory.minimums.for_tier(summary.tier);
        match summary.mandatory_staffing(mandatory) {
            None => suggestions.push(Suggestion::AddRole {
                role: mandatory.role.clone(),
                hours: mandatory.default_hours.max(minimum),
                rate: catalog.canonicalize(&mandatory.role).entry().map(|e| e.hourly_rate),
                description: mandatory.description.clone(),
            }),
            // other spellings keep their hours, this row takes up the slack
            Some((row, total)) if total < minimum => suggestions.push(Suggestion::UpdateRoleHours {
                role: row.role.clone(),
                hours: row.hours + (minimum - total),
            }),
            Some(_) => {}
        }
    }

    if summary.qa_shortfall() {
        let shortfall = summary.required_qa_hours - summary.qa_hours;
        match summary.aggregated.iter().find(|r| is_qa_role(&r.role)) {
            Some(qa) => suggestions.push(Suggestion::UpdateRoleHours {
                role: qa.role.clone(),
                hours: qa.hours + shortfall,
            }),
            None => suggestions.push(Suggestion::AddRole {
                role: policy.qa_role_name.clone(),
                hours: summary.required_qa_hours,
                rate: catalog.canonicalize(&policy.qa_role_name).entry().map(|e| e.hourly_rate),
                description: "Quality assurance".to_string(),
            }),
        }
    }

    tracing::debug!(count = suggestions.len(), "Proposed pricing adjustments");
    suggestions
}
