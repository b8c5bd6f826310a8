//! Pricing Policy Module
//!
//! Business rules for a finished (or hand-edited) SOW pricing structure.
//!
//! # Overview
//!
//! The validator reads the rows of every scope block and reports rule
//! breaches as [`Violation`] data. It never mutates rows and never fails:
//! error-severity violations should block downstream acceptance (sending a
//! SOW to a client), warnings are advisory.
//!
//! The proposer turns the same findings into concrete [`Suggestion`]s.
//! Suggestions are never applied automatically.
//!
//! # Rules
//!
//! | Code                             | Severity | Rule                                                  |
//! |----------------------------------|----------|-------------------------------------------------------|
//! | `MANDATORY_ROLE_MISSING`         | error    | each mandatory governance role appears somewhere      |
//! | `INVALID_ROW_VALUES`             | error    | no negative hours, no billable hours at rate ≤ 0      |
//! | `QA_BASELINE_MISSING`            | warning  | QA hours ≥ max(4h, ⌈5% of execution hours⌉)           |
//! | `MANDATORY_ROLE_UNDERSTAFFED`    | warning  | mandatory role hours ≥ project-size tier minimum      |
//! | `SENIOR_EXECUTION_CAP_EXCEEDED`  | warning  | senior execution hours ≤ 30% of execution hours       |
//! | `BUDGET_VARIANCE_EXCEEDED`       | warning  | total within ±2% of a target budget (when given)      |

pub mod proposer;
pub mod tiers;
pub mod validator;

pub use proposer::{propose, Suggestion};
pub use tiers::{ProjectSizeTier, TierMinimums, TierThresholds};
pub use validator::{validate, validate_against_budget};

use crate::allocation::SENIOR_PM_ROLE;
use crate::catalog::normalize_role_name;
use crate::core::units::Hours;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Delivery coordination role required on every SOW
pub const PROJECT_COORDINATION_ROLE: &str = "Tech - Delivery - Project Coordination";

/// Senior account management role required on every SOW
pub const SENIOR_ACCOUNT_MANAGEMENT_ROLE: &str = "Account Management - (Senior Account Manager)";

/// A governance role that must appear in every priced SOW
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryRole {
    /// Canonical role name
    pub role: String,

    /// Other spellings accepted as this role
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Description used when the proposer adds the role
    #[serde(default)]
    pub description: String,

    /// Hours used when the proposer adds the role
    pub default_hours: Hours,

    /// Minimum hours per project-size tier
    #[serde(default)]
    pub minimums: TierMinimums,
}

impl MandatoryRole {
    /// True if `name` is this role or one of its aliases, after normalization
    pub fn matches(&self, name: &str) -> bool {
        let n = normalize_role_name(name);
        normalize_role_name(&self.role) == n
            || self.aliases.iter().any(|a| normalize_role_name(a) == n)
    }
}

/// Policy configuration
///
/// Percentages are basis points. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub mandatory_roles: Vec<MandatoryRole>,

    /// QA share of execution hours (500 = 5%)
    pub qa_baseline_bps: u32,

    /// QA hours floor regardless of project size
    pub qa_min_hours: Hours,

    /// Role the proposer adds when no QA role is present
    pub qa_role_name: String,

    pub tier_thresholds: TierThresholds,

    /// Senior share of execution hours (3000 = 30%)
    pub senior_execution_cap_bps: u32,

    /// Allowed deviation from a target budget (200 = ±2%)
    pub budget_variance_bps: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mandatory_roles: vec![
                MandatoryRole {
                    role: SENIOR_PM_ROLE.to_string(),
                    aliases: Vec::new(),
                    description: "Strategic oversight".to_string(),
                    default_hours: Hours::whole(3),
                    minimums: TierMinimums::whole(2, 3, 4),
                },
                MandatoryRole {
                    role: PROJECT_COORDINATION_ROLE.to_string(),
                    aliases: Vec::new(),
                    description: "Delivery coordination".to_string(),
                    default_hours: Hours::whole(6),
                    minimums: TierMinimums::whole(6, 10, 14),
                },
                MandatoryRole {
                    role: SENIOR_ACCOUNT_MANAGEMENT_ROLE.to_string(),
                    aliases: vec!["Account Management - Senior Account Manager".to_string()],
                    description: "Client comms & governance".to_string(),
                    default_hours: Hours::whole(8),
                    minimums: TierMinimums::whole(8, 10, 12),
                },
            ],
            qa_baseline_bps: 500,         // 5% of execution hours
            qa_min_hours: Hours::whole(4), // never below 4h
            qa_role_name: "QA Engineer".to_string(),
            tier_thresholds: TierThresholds::default(),
            senior_execution_cap_bps: 3_000, // ≤30%
            budget_variance_bps: 200,        // ±2%
        }
    }
}

impl PolicyConfig {
    pub fn is_mandatory(&self, name: &str) -> bool {
        self.mandatory_roles.iter().any(|m| m.matches(name))
    }
}

/// Rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    MandatoryRoleMissing,
    InvalidRowValues,
    QaBaselineMissing,
    MandatoryRoleUnderstaffed,
    SeniorExecutionCapExceeded,
    BudgetVarianceExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One rule breach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl Violation {
    pub fn error(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: Severity::Error,
            details: BTreeMap::new(),
        }
    }

    pub fn warning(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: Severity::Warning,
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of a validation run
///
/// `ok` is true iff there are no error-severity violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: !violations.iter().any(Violation::is_error),
            violations,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_error())
    }

    pub fn has(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_json_shape() {
        let v = Violation::error(ViolationCode::MandatoryRoleMissing, "missing")
            .with_detail("role", SENIOR_PM_ROLE);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["code"], "MANDATORY_ROLE_MISSING");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["details"]["role"], SENIOR_PM_ROLE);
    }

    #[test]
    fn test_warnings_do_not_flip_ok() {
        let result = ValidationResult::from_violations(vec![Violation::warning(
            ViolationCode::QaBaselineMissing,
            "qa",
        )]);
        assert!(result.ok);
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors().count(), 0);

        let result = ValidationResult::from_violations(vec![Violation::error(
            ViolationCode::InvalidRowValues,
            "bad",
        )]);
        assert!(!result.ok);
    }

    #[test]
    fn test_mandatory_alias_matching() {
        let policy = PolicyConfig::default();
        assert!(policy.is_mandatory("Account Management - Senior Account Manager"));
        assert!(policy.is_mandatory("account management-(senior account manager)"));
        assert!(policy.is_mandatory("Tech - Head Of- Senior Project Management"));
        assert!(!policy.is_mandatory("Account Management - (Account Manager)"));
    }

    #[test]
    fn test_policy_config_partial_json() {
        let json = r#"{"qa_min_hours": 6, "qa_role_name": "Senior QA Engineer"}"#;
        let policy: PolicyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(policy.qa_min_hours, Hours::whole(6));
        assert_eq!(policy.qa_role_name, "Senior QA Engineer");
        assert_eq!(policy.mandatory_roles.len(), 3);
        assert_eq!(policy.qa_baseline_bps, 500);
    }
}
