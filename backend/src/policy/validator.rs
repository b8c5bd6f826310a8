//! Policy Validator
//!
//! Every check is independent and reports data, never panics or errors.

use super::{
    MandatoryRole, PolicyConfig, ProjectSizeTier, ValidationResult, Violation, ViolationCode,
};
use crate::catalog::{is_governance_role, is_qa_role, is_senior_execution_role, normalize_role_name};
use crate::core::units::{clamp_to_i64, div_ceil, scaled_budget, scaled_to_cents, Hours};
use crate::models::scope::hours_where;
use crate::models::{aggregate_roles, PricingRow, ScopeBlock};
use serde_json::Value;

/// Validate a pricing structure against the policy rules
///
/// # Example
/// ```
/// use sow_pricing_core::policy::{validate, PolicyConfig, ViolationCode};
/// use sow_pricing_core::{Hours, PricingRow, ScopeBlock};
///
/// let scopes = vec![ScopeBlock::new(
///     "Build",
///     vec![
///         PricingRow::new("Tech - Head Of - Senior Project Management", Hours::whole(3), 365_00),
///         PricingRow::new("Tech - Delivery - Project Coordination", Hours::whole(6), 110_00),
///         PricingRow::new("Tech - Producer - Development", Hours::whole(40), 120_00),
///     ],
/// )];
///
/// let result = validate(&scopes, &PolicyConfig::default());
/// assert!(!result.ok);
/// assert!(result.has(ViolationCode::MandatoryRoleMissing));
/// ```
pub fn validate(scopes: &[ScopeBlock], policy: &PolicyConfig) -> ValidationResult {
    finish(collect_violations(scopes, policy))
}

/// [`validate`] plus a budget variance check against `target_budget_cents`
///
/// A non-positive target skips the variance check.
pub fn validate_against_budget(
    scopes: &[ScopeBlock],
    target_budget_cents: i64,
    policy: &PolicyConfig,
) -> ValidationResult {
    let mut violations = collect_violations(scopes, policy);
    violations.extend(check_budget_variance(scopes, target_budget_cents, policy));
    finish(violations)
}

fn collect_violations(scopes: &[ScopeBlock], policy: &PolicyConfig) -> Vec<Violation> {
    let summary = StaffingSummary::from_scopes(scopes, policy);

    let mut violations = Vec::new();
    violations.extend(check_mandatory_roles(&summary, policy));
    violations.extend(check_row_values(scopes));
    violations.extend(check_qa_baseline(&summary));
    violations.extend(check_senior_execution_cap(&summary, policy));
    violations
}

fn finish(violations: Vec<Violation>) -> ValidationResult {
    let result = ValidationResult::from_violations(violations);
    tracing::info!(
        ok = result.ok,
        errors = result.errors().count(),
        warnings = result.warnings().count(),
        "Pricing validation complete"
    );
    result
}

/// Aggregated staffing figures shared by the validator and the proposer
#[derive(Debug, Clone)]
pub(crate) struct StaffingSummary {
    /// Rows merged across scopes by normalized role name
    pub aggregated: Vec<PricingRow>,
    /// Hours of roles that are neither governance nor mandatory
    pub execution_hours: Hours,
    pub senior_hours: Hours,
    pub qa_hours: Hours,
    pub required_qa_hours: Hours,
    pub tier: ProjectSizeTier,
}

impl StaffingSummary {
    pub(crate) fn from_scopes(scopes: &[ScopeBlock], policy: &PolicyConfig) -> Self {
        let aggregated = aggregate_roles(scopes);
        let is_execution =
            |r: &PricingRow| !is_governance_role(&r.role) && !policy.is_mandatory(&r.role);

        let execution_hours = hours_where(&aggregated, is_execution);
        let senior_hours = hours_where(&aggregated, |r| {
            is_execution(r) && is_senior_execution_role(&r.role)
        });
        let qa_hours = hours_where(&aggregated, |r| is_qa_role(&r.role));

        // ⌈bps × E⌉ in whole hours, never below the floor
        let share = div_ceil(
            execution_hours.hundredths() as i128 * policy.qa_baseline_bps as i128,
            10_000,
        );
        let required_qa_hours = Hours::from_hundredths(share as i64)
            .ceil_whole()
            .max(policy.qa_min_hours);

        Self {
            tier: policy.tier_thresholds.tier_for(execution_hours),
            aggregated,
            execution_hours,
            senior_hours,
            qa_hours,
            required_qa_hours,
        }
    }

    /// Aggregated row for a role name (normalized comparison)
    pub(crate) fn find(&self, name: &str) -> Option<&PricingRow> {
        let key = normalize_role_name(name);
        self.aggregated.iter().find(|r| normalize_role_name(&r.role) == key)
    }

    /// First aggregated row of a mandatory role and its hours summed over
    /// every spelling the role accepts
    pub(crate) fn mandatory_staffing(
        &self,
        mandatory: &MandatoryRole,
    ) -> Option<(&PricingRow, Hours)> {
        let mut matching = self.aggregated.iter().filter(|r| mandatory.matches(&r.role));
        let first = matching.next()?;
        Some((first, first.hours + matching.map(|r| r.hours).sum::<Hours>()))
    }

    pub(crate) fn qa_shortfall(&self) -> bool {
        self.execution_hours.is_positive() && self.qa_hours < self.required_qa_hours
    }
}

fn hours_value(hours: Hours) -> Value {
    Value::from(hours.as_f64())
}

fn check_mandatory_roles(summary: &StaffingSummary, policy: &PolicyConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for mandatory in &policy.mandatory_roles {
        match summary.mandatory_staffing(mandatory) {
            None => violations.push(
                Violation::error(
                    ViolationCode::MandatoryRoleMissing,
                    format!("Mandatory role missing: {}", mandatory.role),
                )
                .with_detail("role", mandatory.role.as_str()),
            ),
            Some((_, hours)) => {
                let minimum = mandatory.minimums.for_tier(summary.tier);
                if hours < minimum {
                    violations.push(
                        Violation::warning(
                            ViolationCode::MandatoryRoleUnderstaffed,
                            format!(
                                "{} has {}h, {} projects need at least {}h",
                                mandatory.role, hours, summary.tier, minimum
                            ),
                        )
                        .with_detail("role", mandatory.role.as_str())
                        .with_detail("hours", hours_value(hours))
                        .with_detail("minimum_hours", hours_value(minimum))
                        .with_detail("tier", summary.tier.to_string()),
                    );
                }
            }
        }
    }
    violations
}

fn check_row_values(scopes: &[ScopeBlock]) -> Option<Violation> {
    let bad: Vec<&PricingRow> = scopes
        .iter()
        .flat_map(|s| s.roles.iter())
        .filter(|r| !r.has_valid_values())
        .collect();
    if bad.is_empty() {
        return None;
    }

    let roles: Vec<String> = bad.iter().map(|r| r.role.clone()).collect();
    Some(
        Violation::error(
            ViolationCode::InvalidRowValues,
            format!(
                "Found {} pricing rows with invalid values \
                 (negative hours or non-positive rate with hours > 0).",
                bad.len()
            ),
        )
        .with_detail("count", bad.len())
        .with_detail("roles", roles),
    )
}

fn check_qa_baseline(summary: &StaffingSummary) -> Option<Violation> {
    if !summary.qa_shortfall() {
        return None;
    }
    Some(
        Violation::warning(
            ViolationCode::QaBaselineMissing,
            format!(
                "QA baseline not met: {}h provided, {}h recommended for {}h of execution.",
                summary.qa_hours, summary.required_qa_hours, summary.execution_hours
            ),
        )
        .with_detail("qa_hours", hours_value(summary.qa_hours))
        .with_detail("execution_hours", hours_value(summary.execution_hours))
        .with_detail("required_qa_hours", hours_value(summary.required_qa_hours)),
    )
}

fn check_senior_execution_cap(
    summary: &StaffingSummary,
    policy: &PolicyConfig,
) -> Option<Violation> {
    let execution = summary.execution_hours.hundredths() as i128;
    let senior = summary.senior_hours.hundredths() as i128;
    if execution <= 0 || senior * 10_000 <= execution * policy.senior_execution_cap_bps as i128 {
        return None;
    }
    Some(
        Violation::warning(
            ViolationCode::SeniorExecutionCapExceeded,
            format!(
                "Senior roles carry {}h of {}h execution, above the {}% cap.",
                summary.senior_hours,
                summary.execution_hours,
                policy.senior_execution_cap_bps / 100
            ),
        )
        .with_detail("senior_hours", hours_value(summary.senior_hours))
        .with_detail("execution_hours", hours_value(summary.execution_hours))
        .with_detail("cap_bps", policy.senior_execution_cap_bps),
    )
}

fn check_budget_variance(
    scopes: &[ScopeBlock],
    target_budget_cents: i64,
    policy: &PolicyConfig,
) -> Option<Violation> {
    if target_budget_cents <= 0 {
        return None;
    }
    let target = scaled_budget(target_budget_cents);
    let total = scopes
        .iter()
        .flat_map(|s| s.roles.iter())
        .map(PricingRow::scaled_cost)
        .fold(0i128, i128::saturating_add);
    let deviation = total.saturating_sub(target).saturating_abs();
    let weighted = deviation.saturating_mul(10_000);
    if weighted <= target * policy.budget_variance_bps as i128 {
        return None;
    }

    let variance_bps = clamp_to_i64(weighted / target);
    let total_cents = scaled_to_cents(total);
    Some(
        Violation::warning(
            ViolationCode::BudgetVarianceExceeded,
            format!(
                "Total of {} cents is {} bps away from the {} cent target (allowed {} bps).",
                total_cents, variance_bps, target_budget_cents, policy.budget_variance_bps
            ),
        )
        .with_detail("total_cents", total_cents)
        .with_detail("target_cents", target_budget_cents)
        .with_detail("variance_bps", variance_bps),
    )
}
