//! Role name canonicalization
//!
//! Free-text role names coming from suggestions or hand edits are compared
//! against the catalog after normalization: case folded, whitespace runs
//! collapsed, and spaces around hyphens removed, so `"Tech - Head Of- X"`
//! and `"tech-head of - x"` resolve to the same entry.

use super::RateCatalogEntry;

/// Normalize a role name for comparison
///
/// # Example
/// ```
/// use sow_pricing_core::catalog::normalize_role_name;
///
/// assert_eq!(
///     normalize_role_name("  Tech - Head Of-  Senior   Project Management "),
///     "tech-head of-senior project management"
/// );
/// ```
pub fn normalize_role_name(raw: &str) -> String {
    let collapsed = raw
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed.replace(" -", "-").replace("- ", "-")
}

/// Result of resolving a free-text role name against the catalog
///
/// There is no silent fallback: callers decide what an `Unmatched` role
/// means for them (error, warning, or intentional exclusion).
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRole<'a> {
    /// The name resolved to this catalog entry
    Matched(&'a RateCatalogEntry),
    /// No catalog entry matched; carries the trimmed input
    Unmatched(String),
}

impl<'a> CanonicalRole<'a> {
    pub fn is_matched(&self) -> bool {
        matches!(self, CanonicalRole::Matched(_))
    }

    /// Catalog name when matched, the raw input otherwise
    pub fn name(&self) -> &str {
        match self {
            CanonicalRole::Matched(entry) => &entry.canonical_name,
            CanonicalRole::Unmatched(raw) => raw,
        }
    }

    /// Catalog rate when matched, 0 otherwise
    pub fn rate(&self) -> i64 {
        match self {
            CanonicalRole::Matched(entry) => entry.hourly_rate,
            CanonicalRole::Unmatched(_) => 0,
        }
    }

    pub fn entry(&self) -> Option<&'a RateCatalogEntry> {
        match self {
            CanonicalRole::Matched(entry) => Some(entry),
            CanonicalRole::Unmatched(_) => None,
        }
    }
}

/// True for project-management tiers (any "Head Of" or "Project Management"
/// role) and account-management roles
///
/// These are governance roles: the allocator prices them through the
/// governance selector and never distributes budget to them.
pub fn is_governance_role(name: &str) -> bool {
    let n = normalize_role_name(name);
    n.contains("head of") || n.contains("project management") || n.starts_with("account management")
}

/// True for roles that staff quality assurance ("QA Engineer",
/// "Senior QA Engineer", "Quality Assurance Lead", ...)
pub fn is_qa_role(name: &str) -> bool {
    let n = normalize_role_name(name);
    n.contains("quality assurance")
        || n
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| token == "qa")
}

/// True for senior execution roles (architects, senior consultants, and
/// anything titled senior) that are not governance roles
pub fn is_senior_execution_role(name: &str) -> bool {
    if is_governance_role(name) {
        return false;
    }
    let n = normalize_role_name(name);
    n.contains("sr.")
        || n
            .split(|c: char| !c.is_alphanumeric())
            .any(|t| t == "senior" || t == "srn")
}
