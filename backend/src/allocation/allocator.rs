//! Budget Allocator
//!
//! # Algorithm
//!
//! 1. Canonicalize and deduplicate the suggested names; drop governance
//!    variants (handled by the governance selector) and unmatched names
//! 2. Price the governance rows; `remaining = budget - baseline`
//! 3. Split `remaining` evenly across the pool; each role gets
//!    `share / rate` hours rounded to the granularity
//! 4. Tighten towards the budget:
//!    - over budget: trim one step at a time from the highest-rate rows
//!    - under budget: scale every execution row by `target / current`,
//!      then trim if rounding overshot, otherwise top up one step at a
//!      time until the tolerance floor is reached
//!
//! Both single-step passes visit execution rows round-robin in descending
//! rate order (ties keep pool order) and are bounded by
//! [`MAX_ADJUSTMENT_ITERATIONS`]. Hitting the cap is not an error: the best
//! state reached is returned and `Allocation::cap_exhausted` is set. A trim
//! that hits the cap while still over budget finishes with an exact bulk
//! reduction, so the ceiling holds on every path.

use super::governance::select_governance;
use super::{
    Allocation, AllocationConfig, AllocationError, UnmatchedRolePolicy, GOVERNANCE_ROW_COUNT,
};
use crate::catalog::{
    is_governance_role, normalize_role_name, CanonicalRole, RateCatalog, RateCatalogEntry,
};
use crate::core::units::{
    clamp_to_i64, div_ceil, div_round_half_up, scaled_budget, scaled_cost, Hours,
};
use crate::models::PricingRow;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Upper bound on single-step adjustments per tightening pass
pub const MAX_ADJUSTMENT_ITERATIONS: usize = 10_000;

/// Largest accepted budget in cents
///
/// Keeps every step count and hour total of a one-cent rate at one
/// hundredth of an hour inside i64 with room for rounding.
pub const MAX_BUDGET_CENTS: i64 = i64::MAX / 10_000;

/// Allocate `budget_cents` across the suggested roles
///
/// A negative budget is treated as zero. A zero budget or an empty pool
/// yields the two governance rows only.
///
/// # Errors
///
/// - Invalid configuration (see [`AllocationConfig::validate`])
/// - `AllocationError::UnmatchedRoles` when `unmatched_roles` is `Reject`
/// - `AllocationError::BudgetOutOfRange` above [`MAX_BUDGET_CENTS`]
///
/// # Example
/// ```
/// use sow_pricing_core::{allocate, AllocationConfig, Hours, RateCatalog};
///
/// let catalog = RateCatalog::standard();
/// let allocation = allocate(
///     &catalog,
///     &["Tech - Delivery - Project Management", "Tech - Producer - Development"],
///     10_000_00,
///     &AllocationConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(allocation.rows.len(), 3);
/// assert_eq!(allocation.rows[2].hours, Hours::whole(65));
/// assert!(allocation.total_cost_cents() <= 10_000_00);
/// ```
pub fn allocate<S: AsRef<str>>(
    catalog: &RateCatalog,
    role_names: &[S],
    budget_cents: i64,
    config: &AllocationConfig,
) -> Result<Allocation, AllocationError> {
    config.validate()?;

    if budget_cents > MAX_BUDGET_CENTS {
        return Err(AllocationError::BudgetOutOfRange {
            budget_cents,
            max_cents: MAX_BUDGET_CENTS,
        });
    }
    let budget_cents = budget_cents.max(0);
    let pool = RolePool::build(catalog, role_names, config)?;
    let governance = select_governance(catalog, budget_cents, config);

    let budget = scaled_budget(budget_cents);
    let remaining = (budget - governance.baseline_cost).max(0);

    tracing::debug!(
        budget_cents,
        tier = ?governance.tier,
        pool_size = pool.roles.len(),
        unmatched = pool.unmatched.len(),
        "Allocating budget"
    );

    let mut rows = governance.into_rows();

    if remaining == 0 || pool.roles.is_empty() {
        tracing::debug!("Nothing to distribute beyond governance");
        let pass = Tightening::new(&mut rows, budget, config);
        let tolerance_met = pass.meets_floor(pass.total());
        return Ok(Allocation {
            rows,
            unmatched: pool.unmatched,
            adjustment_iterations: 0,
            cap_exhausted: false,
            tolerance_met,
        });
    }

    rows.extend(even_split(&pool.roles, remaining, config.hour_granularity));

    let mut pass = Tightening::new(&mut rows, budget, config);
    let current = pass.total();
    if current > budget {
        pass.trim_to_budget();
    } else if current < budget {
        pass.scale_to_target(remaining);
        if pass.total() > budget {
            pass.trim_to_budget();
        } else {
            pass.top_up_to_floor();
        }
    }

    let total = pass.total();
    let tolerance_met = pass.meets_floor(total);
    let (adjustment_iterations, cap_exhausted) = (pass.iterations, pass.cap_exhausted);

    tracing::debug!(
        total_scaled = %total,
        adjustment_iterations,
        cap_exhausted,
        tolerance_met,
        "Allocation complete"
    );

    Ok(Allocation {
        rows,
        unmatched: pool.unmatched,
        adjustment_iterations,
        cap_exhausted,
        tolerance_met,
    })
}

/// Canonicalized, deduplicated, governance-free role pool
struct RolePool<'a> {
    roles: Vec<&'a RateCatalogEntry>,
    unmatched: Vec<String>,
}

impl<'a> RolePool<'a> {
    fn build<S: AsRef<str>>(
        catalog: &'a RateCatalog,
        role_names: &[S],
        config: &AllocationConfig,
    ) -> Result<Self, AllocationError> {
        let mut seen = HashSet::new();
        let mut pool = RolePool {
            roles: Vec::new(),
            unmatched: Vec::new(),
        };

        for raw in role_names {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let role = catalog.canonicalize(raw);
            if is_governance_role(role.name()) {
                tracing::debug!(role = raw, "Governance role removed from pool");
                continue;
            }
            if !seen.insert(normalize_role_name(role.name())) {
                continue;
            }
            match role {
                CanonicalRole::Matched(entry) => pool.roles.push(entry),
                CanonicalRole::Unmatched(name) => pool.unmatched.push(name),
            }
        }

        if !pool.unmatched.is_empty() {
            match config.unmatched_roles {
                UnmatchedRolePolicy::Reject => {
                    return Err(AllocationError::UnmatchedRoles(pool.unmatched));
                }
                UnmatchedRolePolicy::Exclude => {
                    tracing::warn!(
                        roles = ?pool.unmatched,
                        "Excluding roles missing from rate catalog"
                    );
                }
            }
        }

        if pool.roles.is_empty() && !config.fallback_roles.is_empty() {
            for name in &config.fallback_roles {
                match catalog.canonicalize(name) {
                    CanonicalRole::Matched(entry)
                        if !is_governance_role(&entry.canonical_name)
                            && seen.insert(normalize_role_name(&entry.canonical_name)) =>
                    {
                        pool.roles.push(entry);
                    }
                    _ => tracing::debug!(role = %name, "Fallback role skipped"),
                }
            }
            tracing::debug!(pool_size = pool.roles.len(), "Using fallback role pool");
        }

        Ok(pool)
    }
}

/// Even budget share per role, converted to hours on the granularity grid
///
/// Zero-rate roles still count towards the split but emit no row.
fn even_split(roles: &[&RateCatalogEntry], remaining: i128, step: Hours) -> Vec<PricingRow> {
    let pool_size = roles.len() as i128;
    roles
        .iter()
        .filter(|entry| entry.hourly_rate > 0)
        .map(|entry| {
            // share / rate / step = remaining / (n × rate × step)
            let per_step = pool_size * entry.hourly_rate as i128 * step.hundredths() as i128;
            let steps = clamp_to_i64(div_round_half_up(remaining, per_step).max(0));
            PricingRow::new(
                entry.canonical_name.clone(),
                Hours::from_steps(steps, step),
                entry.hourly_rate,
            )
        })
        .collect()
}

/// Tightening state over one row set; totals are tracked in scaled cents
struct Tightening<'r> {
    rows: &'r mut Vec<PricingRow>,
    budget: i128,
    step: Hours,
    tolerance_bps: u32,
    iterations: usize,
    cap_exhausted: bool,
}

impl<'r> Tightening<'r> {
    fn new(rows: &'r mut Vec<PricingRow>, budget: i128, config: &AllocationConfig) -> Self {
        Self {
            rows,
            budget,
            step: config.hour_granularity,
            tolerance_bps: config.tolerance_bps,
            iterations: 0,
            cap_exhausted: false,
        }
    }

    fn total(&self) -> i128 {
        self.rows.iter().map(PricingRow::scaled_cost).sum()
    }

    fn execution_cost(&self) -> i128 {
        self.rows[GOVERNANCE_ROW_COUNT..]
            .iter()
            .map(PricingRow::scaled_cost)
            .sum()
    }

    /// `total >= budget × (1 - tolerance)`
    fn meets_floor(&self, total: i128) -> bool {
        total * 10_000 >= self.budget * (10_000 - self.tolerance_bps as i128)
    }

    /// Execution row indices, highest rate first, ties in pool order
    fn rate_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (GOVERNANCE_ROW_COUNT..self.rows.len()).collect();
        order.sort_by_key(|&i| Reverse(self.rows[i].rate));
        order
    }

    /// Rescale execution hours by `target / current execution cost`
    fn scale_to_target(&mut self, target: i128) {
        let current = self.execution_cost();
        if current <= 0 || target <= 0 {
            return;
        }
        let step = self.step;
        for row in self.rows[GOVERNANCE_ROW_COUNT..].iter_mut() {
            let steps = row.hours.steps(step) as i128;
            let scaled = clamp_to_i64(div_round_half_up(steps * target, current).max(0));
            row.hours = Hours::from_steps(scaled, step);
        }
    }

    /// Remove one step at a time, highest rate first, until within budget
    fn trim_to_budget(&mut self) {
        let order = self.rate_order();
        if order.is_empty() {
            return;
        }

        let step = self.step;
        let mut current = self.total();
        let mut visits = 0;
        while current > self.budget && visits < MAX_ADJUSTMENT_ITERATIONS {
            let row = &mut self.rows[order[visits % order.len()]];
            if row.hours.is_positive() {
                row.hours = row.hours - step;
                current -= scaled_cost(step, row.rate);
            }
            visits += 1;
        }
        self.iterations += visits;

        if current > self.budget {
            self.cap_exhausted = true;
            tracing::warn!(
                max_iterations = MAX_ADJUSTMENT_ITERATIONS,
                "Trim pass hit the iteration cap, reducing in bulk"
            );
            for &i in &order {
                if current <= self.budget {
                    break;
                }
                let row = &mut self.rows[i];
                let step_cost = scaled_cost(step, row.rate);
                if step_cost <= 0 {
                    continue;
                }
                let needed = clamp_to_i64(div_ceil(current - self.budget, step_cost));
                let taken = needed.min(row.hours.steps(step));
                row.hours = row.hours - Hours::from_steps(taken, step);
                current -= step_cost * taken as i128;
            }
        }
    }

    /// Add one step at a time, highest rate first, until the tolerance
    /// floor is reached without ever passing the budget
    fn top_up_to_floor(&mut self) {
        let order = self.rate_order();
        if order.is_empty() {
            return;
        }

        let step = self.step;
        let mut current = self.total();
        let mut visits = 0;
        let mut added_this_round = false;
        while !self.meets_floor(current) && visits < MAX_ADJUSTMENT_ITERATIONS {
            let row = &mut self.rows[order[visits % order.len()]];
            let increment = scaled_cost(step, row.rate);
            if current + increment <= self.budget {
                row.hours += step;
                current += increment;
                added_this_round = true;
            }
            visits += 1;

            // a full round without a fitting increment cannot improve
            if visits % order.len() == 0 {
                if !added_this_round {
                    break;
                }
                added_this_round = false;
            }
        }
        self.iterations += visits;

        if visits >= MAX_ADJUSTMENT_ITERATIONS && !self.meets_floor(current) {
            self.cap_exhausted = true;
            tracing::warn!(
                max_iterations = MAX_ADJUSTMENT_ITERATIONS,
                "Top-up pass hit the iteration cap below the tolerance floor"
            );
        }
    }
}
