//! Scope blocks and role aggregation
//!
//! A SOW groups its pricing rows into scope blocks (phases, deliverables).
//! Policy checks look at the roles across every block, merged by
//! normalized role name.

use crate::catalog::normalize_role_name;
use crate::core::units::Hours;
use crate::models::row::PricingRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A titled group of pricing rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeBlock {
    pub title: String,
    #[serde(default)]
    pub roles: Vec<PricingRow>,
}

impl ScopeBlock {
    pub fn new(title: impl Into<String>, roles: Vec<PricingRow>) -> Self {
        Self {
            title: title.into(),
            roles,
        }
    }
}

/// Merge rows across all scopes by normalized role name
///
/// Hours are summed. The first spelling of a role name is kept, as is the
/// first non-zero rate seen for it. Rows with a blank role are ignored.
/// Output order follows first appearance.
///
/// # Example
/// ```
/// use sow_pricing_core::{aggregate_roles, Hours, PricingRow, ScopeBlock};
///
/// let scopes = vec![
///     ScopeBlock::new("Build", vec![PricingRow::new("QA Engineer", Hours::whole(2), 0)]),
///     ScopeBlock::new("Launch", vec![PricingRow::new("qa  engineer", Hours::whole(3), 150_00)]),
/// ];
/// let merged = aggregate_roles(&scopes);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].role, "QA Engineer");
/// assert_eq!(merged[0].hours, Hours::whole(5));
/// assert_eq!(merged[0].rate, 150_00);
/// ```
pub fn aggregate_roles(scopes: &[ScopeBlock]) -> Vec<PricingRow> {
    let mut merged: Vec<PricingRow> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in scopes.iter().flat_map(|s| s.roles.iter()) {
        let key = normalize_role_name(&row.role);
        if key.is_empty() {
            continue;
        }
        match positions.get(&key) {
            Some(&pos) => {
                let prev = &mut merged[pos];
                prev.hours += row.hours;
                if prev.rate == 0 {
                    prev.rate = row.rate;
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(PricingRow::new(row.role.clone(), row.hours, row.rate));
            }
        }
    }

    merged
}

/// Sum of hours across rows matching `predicate`
pub(crate) fn hours_where<F>(rows: &[PricingRow], predicate: F) -> Hours
where
    F: Fn(&PricingRow) -> bool,
{
    rows.iter().filter(|r| predicate(r)).map(|r| r.hours).sum()
}
