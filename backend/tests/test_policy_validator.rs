//! Policy Validator and Adjustment Proposer Tests
//!
//! Staffing scenarios checked against the default policy:
//! - mandatory roles: Head Of 3h, Project Coordination 6h, Senior Account Manager 8h
//! - QA: 5% of execution hours rounded up, at least 4h
//! - tiers: small ≤ 80h, medium ≤ 200h, large above

use std::io;
use std::sync::{Arc, Mutex};

use sow_pricing_core::policy::{PROJECT_COORDINATION_ROLE, SENIOR_ACCOUNT_MANAGEMENT_ROLE};
use sow_pricing_core::{
    allocate, propose, validate, validate_against_budget, AllocationConfig, Hours, PolicyConfig,
    PricingRow, RateCatalog, ScopeBlock, Severity, Suggestion, ViolationCode,
};

const HEAD_OF: &str = "Tech - Head Of - Senior Project Management";
const DEV: &str = "Tech - Producer - Development";
const ARCHITECT: &str = "Tech - Sr. Architect - Data Strategy";
const QA: &str = "QA Engineer";
const SENIOR_AM_LEGACY: &str = "Account Management - Senior Account Manager";

fn row(role: &str, hours: i64, rate: i64) -> PricingRow {
    PricingRow::new(role, Hours::whole(hours), rate)
}

/// Mandatory rows staffed for a medium project
fn governance_rows(head: i64, coordination: i64, account: i64) -> Vec<PricingRow> {
    vec![
        row(HEAD_OF, head, 365_00),
        row(PROJECT_COORDINATION_ROLE, coordination, 110_00),
        row(SENIOR_ACCOUNT_MANAGEMENT_ROLE, account, 210_00),
    ]
}

/// Compliant medium project: 100h execution with 5h QA
fn compliant_scopes() -> Vec<ScopeBlock> {
    vec![
        ScopeBlock::new("Governance", governance_rows(3, 10, 10)),
        ScopeBlock::new("Build", vec![row(DEV, 95, 120_00), row(QA, 5, 100_00)]),
    ]
}

/// Apply suggestions the way a reviewer would accept them
fn apply(scopes: &mut Vec<ScopeBlock>, suggestions: &[Suggestion]) {
    let mut added = Vec::new();
    for suggestion in suggestions {
        match suggestion {
            Suggestion::AddRole { role, hours, rate, .. } => {
                added.push(PricingRow::new(role.clone(), *hours, rate.unwrap_or(95_00)));
            }
            Suggestion::UpdateRoleHours { role, hours } => {
                let target = scopes
                    .iter_mut()
                    .flat_map(|s| s.roles.iter_mut())
                    .find(|r| &r.role == role)
                    .expect("suggested role exists");
                target.hours = *hours;
            }
        }
    }
    if !added.is_empty() {
        scopes.push(ScopeBlock::new("Adjustments", added));
    }
}

/// Medium project whose senior account management is split across the
/// canonical spelling and the legacy one
fn split_account_management(canonical: i64, legacy: i64) -> Vec<ScopeBlock> {
    vec![
        ScopeBlock::new(
            "Governance",
            vec![
                row(HEAD_OF, 3, 365_00),
                row(PROJECT_COORDINATION_ROLE, 10, 110_00),
                row(SENIOR_ACCOUNT_MANAGEMENT_ROLE, canonical, 210_00),
            ],
        ),
        ScopeBlock::new(
            "Build",
            vec![row(DEV, 95, 120_00), row(QA, 5, 100_00), row(SENIOR_AM_LEGACY, legacy, 210_00)],
        ),
    ]
}

/// Shared in-memory sink for formatted log lines
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

// ============================================================================
// Validator
// ============================================================================

#[test]
fn test_compliant_structure_passes_clean() {
    let result = validate(&compliant_scopes(), &PolicyConfig::default());
    assert!(result.ok);
    assert!(result.violations.is_empty(), "{:?}", result.violations);
}

#[test]
fn test_missing_senior_account_manager_is_error() {
    let scopes = vec![ScopeBlock::new(
        "Build",
        vec![
            row(HEAD_OF, 3, 365_00),
            row(PROJECT_COORDINATION_ROLE, 10, 110_00),
            row(DEV, 95, 120_00),
            row(QA, 5, 100_00),
        ],
    )];

    let result = validate(&scopes, &PolicyConfig::default());
    assert!(!result.ok);
    assert_eq!(result.violations.len(), 1);

    let violation = &result.violations[0];
    assert_eq!(violation.code, ViolationCode::MandatoryRoleMissing);
    assert_eq!(violation.severity, Severity::Error);
    assert_eq!(violation.details["role"], SENIOR_ACCOUNT_MANAGEMENT_ROLE);
}

#[test]
fn test_every_missing_mandatory_role_reported() {
    let scopes = vec![ScopeBlock::new("Build", vec![row(DEV, 40, 120_00), row(QA, 4, 100_00)])];
    let result = validate(&scopes, &PolicyConfig::default());

    assert!(!result.ok);
    assert_eq!(result.errors().count(), 3);
    assert!(result.errors().all(|v| v.code == ViolationCode::MandatoryRoleMissing));
}

#[test]
fn test_empty_structure_reports_only_missing_roles() {
    let result = validate(&[], &PolicyConfig::default());
    assert!(!result.ok);
    assert_eq!(result.violations.len(), 3);
    assert!(!result.has(ViolationCode::QaBaselineMissing));
}

#[test]
fn test_legacy_senior_account_manager_spelling_accepted() {
    let mut scopes = compliant_scopes();
    scopes[0].roles[2].role = "Account Management - Senior Account Manager".to_string();
    assert!(validate(&scopes, &PolicyConfig::default()).ok);
}

#[test]
fn test_mandatory_hours_summed_across_spellings() {
    // 4h + 6h covers the 10h medium minimum
    let result = validate(&split_account_management(4, 6), &PolicyConfig::default());
    assert!(result.ok);
    assert!(result.violations.is_empty(), "{:?}", result.violations);
}

#[test]
fn test_understaffing_reports_combined_hours() {
    let result = validate(&split_account_management(4, 4), &PolicyConfig::default());

    assert!(result.ok);
    assert_eq!(result.violations.len(), 1);
    let violation = &result.violations[0];
    assert_eq!(violation.code, ViolationCode::MandatoryRoleUnderstaffed);
    assert_eq!(violation.details["role"], SENIOR_ACCOUNT_MANAGEMENT_ROLE);
    assert_eq!(violation.details["hours"], 8.0);
    assert_eq!(violation.details["minimum_hours"], 10.0);
}

#[test]
fn test_mandatory_roles_found_across_scopes() {
    let scopes = vec![
        ScopeBlock::new("Discovery", vec![row(HEAD_OF, 2, 365_00), row(DEV, 30, 120_00)]),
        ScopeBlock::new(
            "Build",
            vec![
                row("tech-head of-senior project management", 1, 365_00),
                row(PROJECT_COORDINATION_ROLE, 6, 110_00),
                row(SENIOR_ACCOUNT_MANAGEMENT_ROLE, 8, 210_00),
                row(DEV, 30, 120_00),
                row(QA, 4, 100_00),
            ],
        ),
    ];
    let result = validate(&scopes, &PolicyConfig::default());
    assert!(result.ok);
    assert!(result.violations.is_empty(), "{:?}", result.violations);
}

#[test]
fn test_qa_below_baseline_is_warning_only() {
    let scopes = vec![
        ScopeBlock::new("Governance", governance_rows(3, 10, 10)),
        ScopeBlock::new("Build", vec![row(DEV, 98, 120_00), row(QA, 2, 100_00)]),
    ];
    let result = validate(&scopes, &PolicyConfig::default());

    assert!(result.ok);
    assert_eq!(result.violations.len(), 1);
    let violation = &result.violations[0];
    assert_eq!(violation.code, ViolationCode::QaBaselineMissing);
    assert_eq!(violation.severity, Severity::Warning);
    assert_eq!(violation.details["qa_hours"], 2.0);
    assert_eq!(violation.details["execution_hours"], 100.0);
    assert_eq!(violation.details["required_qa_hours"], 5.0);
}

#[test]
fn test_qa_floor_applies_to_small_projects() {
    // 5% of 20h is 1h, the floor is 4h
    let scopes = vec![
        ScopeBlock::new("Governance", governance_rows(2, 6, 8)),
        ScopeBlock::new("Build", vec![row(DEV, 17, 120_00), row(QA, 3, 100_00)]),
    ];
    let result = validate(&scopes, &PolicyConfig::default());
    assert!(result.ok);
    assert!(result.has(ViolationCode::QaBaselineMissing));
}

#[test]
fn test_invalid_rows_reported_once() {
    let mut scopes = compliant_scopes();
    scopes[1].roles.push(PricingRow::new("Design - Email (Offshore)", Hours::whole(-2), 120_00));
    scopes[1].roles.push(row("Tech - Integrations", 5, 0));

    let result = validate(&scopes, &PolicyConfig::default());
    assert!(!result.ok);

    let invalid: Vec<_> = result
        .violations
        .iter()
        .filter(|v| v.code == ViolationCode::InvalidRowValues)
        .collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].details["count"], 2);
}

#[test]
fn test_understaffed_mandatory_role_in_large_project() {
    // 260h execution puts the project in the large tier
    let scopes = vec![
        ScopeBlock::new("Governance", governance_rows(3, 14, 12)),
        ScopeBlock::new("Build", vec![row(DEV, 240, 120_00), row(QA, 20, 100_00)]),
    ];
    let result = validate(&scopes, &PolicyConfig::default());

    assert!(result.ok);
    assert_eq!(result.violations.len(), 1);
    let violation = &result.violations[0];
    assert_eq!(violation.code, ViolationCode::MandatoryRoleUnderstaffed);
    assert_eq!(violation.details["role"], HEAD_OF);
    assert_eq!(violation.details["minimum_hours"], 4.0);
    assert_eq!(violation.details["tier"], "large");
}

#[test]
fn test_senior_execution_share_capped() {
    let scopes = vec![
        ScopeBlock::new("Governance", governance_rows(3, 10, 10)),
        ScopeBlock::new(
            "Build",
            vec![row(DEV, 60, 120_00), row(ARCHITECT, 40, 365_00), row(QA, 6, 100_00)],
        ),
    ];
    let result = validate(&scopes, &PolicyConfig::default());

    assert!(result.ok);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].code, ViolationCode::SeniorExecutionCapExceeded);
    assert_eq!(result.violations[0].details["senior_hours"], 40.0);
}

#[test]
fn test_budget_variance_only_checked_with_target() {
    // compliant structure costs $16,195
    let scopes = compliant_scopes();
    let policy = PolicyConfig::default();

    assert!(!validate(&scopes, &policy).has(ViolationCode::BudgetVarianceExceeded));
    assert!(validate_against_budget(&scopes, 16_195_00, &policy).violations.is_empty());
    assert!(validate_against_budget(&scopes, 16_000_00, &policy).violations.is_empty());

    let result = validate_against_budget(&scopes, 15_000_00, &policy);
    assert!(result.ok);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].code, ViolationCode::BudgetVarianceExceeded);
    assert_eq!(result.violations[0].details["variance_bps"], 796);
}

#[test]
fn test_extreme_hand_edited_hours_do_not_panic() {
    // each row fits on its own, the sum does not
    let scopes: Vec<ScopeBlock> = serde_json::from_str(
        r#"[{"title": "Build", "roles": [
            {"role": "Tech - Producer - Development", "hours": 5e16, "rate": 12000},
            {"role": "Tech - Producer - Development", "hours": 5e16, "rate": 12000}
        ]}]"#,
    )
    .unwrap();
    let policy = PolicyConfig::default();

    let result = validate_against_budget(&scopes, 10_000_00, &policy);
    assert!(!result.ok);
    assert!(result.has(ViolationCode::QaBaselineMissing));
    assert!(result.has(ViolationCode::BudgetVarianceExceeded));
    assert_eq!(propose(&scopes, &RateCatalog::standard(), &policy).len(), 4);
}

#[test]
fn test_out_of_range_hours_rejected_on_load() {
    let parsed: Result<Vec<ScopeBlock>, _> = serde_json::from_str(
        r#"[{"title": "Build", "roles": [{"role": "Dev", "hours": 1e17, "rate": 12000}]}]"#,
    );
    assert!(parsed.is_err());
}

#[test]
fn test_budget_validation_logs_one_summary() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        validate_against_budget(&compliant_scopes(), 15_000_00, &PolicyConfig::default())
    });
    assert_eq!(result.violations.len(), 1);

    let logs = buffer.contents();
    assert_eq!(logs.matches("Pricing validation complete").count(), 1, "{}", logs);
    assert!(logs.contains("warnings=1"), "{}", logs);
}

#[test]
fn test_validation_leaves_input_untouched() {
    let scopes = compliant_scopes();
    let before = scopes.clone();
    let _ = validate(&scopes, &PolicyConfig::default());
    let _ = propose(&scopes, &RateCatalog::standard(), &PolicyConfig::default());
    assert_eq!(scopes, before);
}

#[test]
fn test_result_serializes_for_reviewers() {
    let scopes = vec![ScopeBlock::new("Build", vec![row(DEV, 40, 120_00)])];
    let json = serde_json::to_value(validate(&scopes, &PolicyConfig::default())).unwrap();

    assert_eq!(json["ok"], false);
    assert_eq!(json["violations"][0]["code"], "MANDATORY_ROLE_MISSING");
    assert_eq!(json["violations"][0]["severity"], "error");
}

// ============================================================================
// Proposer
// ============================================================================

#[test]
fn test_compliant_structure_needs_no_suggestions() {
    let policy = PolicyConfig::default();
    let suggestions = propose(&compliant_scopes(), &RateCatalog::standard(), &policy);
    assert!(suggestions.is_empty());
}

#[test]
fn test_missing_roles_suggested_with_catalog_rates() {
    let scopes = vec![ScopeBlock::new("Build", vec![row(DEV, 40, 120_00)])];
    let suggestions = propose(&scopes, &RateCatalog::standard(), &PolicyConfig::default());

    assert_eq!(suggestions.len(), 4);
    assert_eq!(suggestions[1].role(), PROJECT_COORDINATION_ROLE);
    assert!(matches!(&suggestions[1], Suggestion::AddRole { rate: Some(110_00), .. }));
    assert!(matches!(&suggestions[2], Suggestion::AddRole { rate: Some(210_00), .. }));

    // no QA role in the catalog
    assert_eq!(suggestions[3].role(), QA);
    assert_eq!(suggestions[3].hours(), Hours::whole(4));
    assert!(matches!(&suggestions[3], Suggestion::AddRole { rate: None, .. }));
}

#[test]
fn test_suggestions_raise_understaffed_roles_and_qa() {
    let scopes = vec![
        ScopeBlock::new("Governance", governance_rows(3, 8, 10)),
        ScopeBlock::new("Build", vec![row(DEV, 98, 120_00), row(QA, 2, 100_00)]),
    ];
    let suggestions = propose(&scopes, &RateCatalog::standard(), &PolicyConfig::default());

    assert_eq!(
        suggestions,
        vec![
            Suggestion::UpdateRoleHours {
                role: PROJECT_COORDINATION_ROLE.to_string(),
                hours: Hours::whole(10),
            },
            Suggestion::UpdateRoleHours {
                role: QA.to_string(),
                hours: Hours::whole(5),
            },
        ]
    );
}

#[test]
fn test_split_spelling_top_up_counts_both_rows() {
    let mut scopes = split_account_management(4, 4);
    let policy = PolicyConfig::default();
    let suggestions = propose(&scopes, &RateCatalog::standard(), &policy);

    assert_eq!(
        suggestions,
        vec![Suggestion::UpdateRoleHours {
            role: SENIOR_ACCOUNT_MANAGEMENT_ROLE.to_string(),
            hours: Hours::whole(6),
        }]
    );

    apply(&mut scopes, &suggestions);
    assert!(validate(&scopes, &policy).violations.is_empty());
}

#[test]
fn test_applied_suggestions_clear_findings() {
    let mut scopes = vec![
        ScopeBlock::new("Governance", governance_rows(3, 8, 10)),
        ScopeBlock::new("Build", vec![row(DEV, 98, 120_00), row(QA, 2, 100_00)]),
    ];
    let policy = PolicyConfig::default();
    let suggestions = propose(&scopes, &RateCatalog::standard(), &policy);
    apply(&mut scopes, &suggestions);

    let result = validate(&scopes, &policy);
    assert!(result.ok);
    assert!(result.violations.is_empty(), "{:?}", result.violations);
}

// ============================================================================
// Allocator output through the validator
// ============================================================================

#[test]
fn test_allocated_structure_is_checked_independently() {
    let catalog = RateCatalog::standard();
    let allocation = allocate(&catalog, &[DEV], 10_000_00, &AllocationConfig::default()).unwrap();
    let mut scopes = vec![ScopeBlock::new("Allocated", allocation.into_rows())];
    let policy = PolicyConfig::default();

    // the allocator prices Delivery PM and Account Manager, not the mandatory trio
    let result = validate(&scopes, &policy);
    assert!(!result.ok);
    assert_eq!(result.errors().count(), 3);
    assert!(result.has(ViolationCode::QaBaselineMissing));

    let suggestions = propose(&scopes, &catalog, &policy);
    assert_eq!(suggestions.len(), 4);
    apply(&mut scopes, &suggestions);

    let result = validate(&scopes, &policy);
    assert!(result.ok);
    assert!(result.violations.is_empty(), "{:?}", result.violations);
}
