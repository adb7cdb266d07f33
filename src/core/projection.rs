//! Budget projection engine.
//!
//! Turns a user's budget items and movement history into a dense, month-by-month
//! view of projected vs. actual income, expenses and balance over a trailing
//! window ending at the current month. Everything here is a pure function of
//! its inputs: the same items, movements, date and options always produce the
//! same report.

use crate::{
    core::{
        money::round_cents,
        month::MonthKey,
        types::{BudgetItem, DateRange, Movement},
    },
    entities::{BudgetItemKind, Frequency, MovementKind},
    errors::{Error, Result},
};
use chrono::{NaiveDate, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Largest horizon accepted when no explicit limit is configured.
pub const DEFAULT_MAX_HORIZON_MONTHS: u32 = 120;

/// How weekly budget items are turned into a monthly amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyPolicy {
    /// Count the actual occurrences (`start_date + 7k`) inside the month.
    #[default]
    ExactOccurrences,
    /// Apply the average of 52/12 weeks in every month the item is live.
    AverageWeeksPerMonth,
}

/// Tunables for a projection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Weekly normalization policy
    pub weekly_policy: WeeklyPolicy,
    /// Largest accepted horizon
    pub max_horizon_months: u32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            weekly_policy: WeeklyPolicy::default(),
            max_horizon_months: DEFAULT_MAX_HORIZON_MONTHS,
        }
    }
}

/// A projection request as received from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    /// User whose data is projected
    pub user_id: i64,
    /// Number of trailing months, must be positive
    pub horizon_months: i64,
}

/// One calendar month's projected and actual totals plus variance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Month key, serialized as `YYYY-MM`
    pub month: MonthKey,
    /// Display label such as `Oct 2026`
    pub label: String,
    /// Sum of recurring income contributions
    pub projected_income: Decimal,
    /// Sum of projected expense contributions
    pub projected_expenses: Decimal,
    /// `projected_income - projected_expenses`
    pub projected_balance: Decimal,
    /// Sum of income movements dated in the month
    pub actual_income: Decimal,
    /// Sum of expense movements dated in the month
    pub actual_expenses: Decimal,
    /// `actual_income - actual_expenses`
    pub actual_balance: Decimal,
    /// `actual_income - projected_income`
    pub variance_income: Decimal,
    /// `actual_expenses - projected_expenses`
    pub variance_expenses: Decimal,
    /// `actual_balance - projected_balance`
    pub variance_balance: Decimal,
}

impl MonthBucket {
    fn empty(month: MonthKey) -> Self {
        Self {
            month,
            label: month.label(),
            projected_income: Decimal::ZERO,
            projected_expenses: Decimal::ZERO,
            projected_balance: Decimal::ZERO,
            actual_income: Decimal::ZERO,
            actual_expenses: Decimal::ZERO,
            actual_balance: Decimal::ZERO,
            variance_income: Decimal::ZERO,
            variance_expenses: Decimal::ZERO,
            variance_balance: Decimal::ZERO,
        }
    }

    fn settle(&mut self) {
        self.projected_balance = self.projected_income - self.projected_expenses;
        self.actual_balance = self.actual_income - self.actual_expenses;
        self.variance_income = self.actual_income - self.projected_income;
        self.variance_expenses = self.actual_expenses - self.projected_expenses;
        self.variance_balance = self.actual_balance - self.projected_balance;
    }
}

/// Sums over every bucket in a report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProjectionTotals {
    /// Total projected income
    pub projected_income: Decimal,
    /// Total projected expenses
    pub projected_expenses: Decimal,
    /// Total projected balance
    pub projected_balance: Decimal,
    /// Total actual income
    pub actual_income: Decimal,
    /// Total actual expenses
    pub actual_expenses: Decimal,
    /// Total actual balance
    pub actual_balance: Decimal,
}

impl ProjectionTotals {
    fn add(&mut self, bucket: &MonthBucket) {
        self.projected_income += bucket.projected_income;
        self.projected_expenses += bucket.projected_expenses;
        self.projected_balance += bucket.projected_balance;
        self.actual_income += bucket.actual_income;
        self.actual_expenses += bucket.actual_expenses;
        self.actual_balance += bucket.actual_balance;
    }
}

/// The engine's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionReport {
    /// One bucket per month, oldest first
    pub projections: Vec<MonthBucket>,
    /// Sums over all buckets
    pub totals: ProjectionTotals,
    /// Number of months covered
    pub period_months: u32,
}

/// Validates a requested horizon against `1..=max`.
pub fn validate_horizon(horizon_months: i64, max: u32) -> Result<u32> {
    u32::try_from(horizon_months)
        .ok()
        .filter(|months| (1..=max).contains(months))
        .ok_or(Error::InvalidHorizon {
            months: horizon_months,
            max,
        })
}

/// The inclusive date range covered by a `horizon_months` window ending at `today`'s month.
#[must_use]
pub fn window_range(today: NaiveDate, horizon_months: u32) -> DateRange {
    let current = MonthKey::from_date(today);
    let first = MonthKey::trailing(current, horizon_months)
        .first()
        .copied()
        .unwrap_or(current);
    DateRange::spanning(first, current)
}

/// Computes the projection report for the window ending at `today`'s month.
///
/// Inactive budget items are skipped even if the store returned them, and
/// movements dated outside the window are ignored. Any item or movement that
/// breaks its record invariants fails the whole projection.
pub fn project(
    items: &[BudgetItem],
    movements: &[Movement],
    today: NaiveDate,
    horizon_months: i64,
    options: &ProjectionOptions,
) -> Result<ProjectionReport> {
    let period_months = validate_horizon(horizon_months, options.max_horizon_months)?;
    items.iter().try_for_each(BudgetItem::validate)?;
    movements.iter().try_for_each(Movement::validate)?;
    let months = MonthKey::trailing(MonthKey::from_date(today), period_months);

    let mut buckets: Vec<MonthBucket> = months.iter().copied().map(MonthBucket::empty).collect();
    let index: HashMap<MonthKey, usize> = months
        .iter()
        .enumerate()
        .map(|(i, month)| (*month, i))
        .collect();

    for item in items.iter().filter(|item| item.is_active) {
        for bucket in &mut buckets {
            let amount = monthly_contribution(item, bucket.month, options.weekly_policy);
            match item.kind {
                BudgetItemKind::RecurringIncome => bucket.projected_income += amount,
                BudgetItemKind::ProjectedExpense => bucket.projected_expenses += amount,
            }
        }
    }

    for movement in movements {
        let Some(&i) = index.get(&MonthKey::from_date(movement.movement_date)) else {
            continue;
        };
        match movement.kind {
            MovementKind::Income => buckets[i].actual_income += movement.amount,
            MovementKind::Expense => buckets[i].actual_expenses += movement.amount,
        }
    }

    let mut totals = ProjectionTotals::default();
    for bucket in &mut buckets {
        bucket.settle();
        totals.add(bucket);
    }

    Ok(ProjectionReport {
        projections: buckets,
        totals,
        period_months,
    })
}

/// What a single budget item contributes to `month`.
///
/// Zero when the item's interval does not touch the month. Activity is not
/// checked here; callers filter inactive items.
#[must_use]
pub fn monthly_contribution(item: &BudgetItem, month: MonthKey, policy: WeeklyPolicy) -> Decimal {
    let (first, last) = (month.first_day(), month.last_day());
    if !item.overlaps(first, last) {
        return Decimal::ZERO;
    }

    match item.frequency {
        Frequency::Monthly => item.amount,
        Frequency::Yearly if MonthKey::from_date(item.start_date).month() == month.month() => {
            item.amount
        }
        Frequency::Yearly => Decimal::ZERO,
        Frequency::Weekly => match policy {
            WeeklyPolicy::ExactOccurrences => {
                item.amount * Decimal::from(weekly_occurrences(item, first, last))
            }
            WeeklyPolicy::AverageWeeksPerMonth => {
                round_cents(item.amount * Decimal::from(52) / Decimal::from(12))
            }
        },
    }
}

/// Occurrences of `start_date + 7k` inside `[first, last]` and the item's own interval.
fn weekly_occurrences(item: &BudgetItem, first: NaiveDate, last: NaiveDate) -> i64 {
    let lo = first.max(item.start_date);
    let hi = item.end_date.map_or(last, |end| end.min(last));
    if lo > hi {
        return 0;
    }

    let offset = (lo - item.start_date).num_days();
    let first_occurrence = item.start_date + TimeDelta::days((offset + 6) / 7 * 7);
    if first_occurrence > hi {
        return 0;
    }
    (hi - first_occurrence).num_days() / 7 + 1
}

/// Formats a report as a fixed-width text table, one line per month plus totals.
#[must_use]
pub fn format_projection_report(report: &ProjectionReport) -> String {
    use crate::core::money::format_amount;
    use std::fmt::Write;

    let mut out = format!(
        "Projection - last {} month(s)\n{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        report.period_months,
        "Month",
        "Proj. in",
        "Proj. out",
        "Actual in",
        "Actual out",
        "Balance",
        "Variance"
    );

    for bucket in &report.projections {
        // write! is infallible when writing to String
        let _ = writeln!(
            out,
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            bucket.label,
            format_amount(bucket.projected_income),
            format_amount(bucket.projected_expenses),
            format_amount(bucket.actual_income),
            format_amount(bucket.actual_expenses),
            format_amount(bucket.actual_balance),
            format_amount(bucket.variance_balance),
        );
    }

    let totals = &report.totals;
    let _ = writeln!(
        out,
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Total",
        format_amount(totals.projected_income),
        format_amount(totals.projected_expenses),
        format_amount(totals.actual_income),
        format_amount(totals.actual_expenses),
        format_amount(totals.actual_balance),
        format_amount(totals.actual_balance - totals.projected_balance),
    );

    out
}
