//! Budget usage reporting.
//!
//! Compares each active projected expense against what was actually spent in
//! its category during the current month, and renders the result as text
//! progress bars.

use crate::{
    core::{
        money::{format_amount, percentage, round_cents},
        month::MonthKey,
        projection::{WeeklyPolicy, monthly_contribution},
        types::{BudgetItem, Movement},
    },
    entities::{BudgetItemKind, MovementKind},
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;

/// Usage of a single projected expense in the current month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUsage {
    /// The budget item being tracked
    pub item: BudgetItem,
    /// What the item contributes to this month
    pub limit: Decimal,
    /// Expenses recorded in the item's category this month
    pub spent: Decimal,
    /// `limit - spent`, never below zero
    pub remaining: Decimal,
    /// `spent / limit * 100`, zero when the limit is zero
    pub percentage_used: Decimal,
}

/// Usage of every projected expense plus the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUsageSummary {
    /// Month the summary covers
    pub month: MonthKey,
    /// Number of budgets tracked
    pub total_budgets: usize,
    /// Sum of limits
    pub total_allocated: Decimal,
    /// Sum of spending
    pub total_spent: Decimal,
    /// Sum of remaining amounts
    pub total_remaining: Decimal,
    /// Per-item usage
    pub budgets: Vec<BudgetUsage>,
}

/// Computes budget usage for `today`'s month.
///
/// Only active projected expenses that contribute to the month are tracked, so
/// a yearly item shows up in its anniversary month alone.
/// Items sharing a category each see that category's full spending.
#[must_use]
pub fn budget_usage(
    items: &[BudgetItem],
    movements: &[Movement],
    today: NaiveDate,
    policy: WeeklyPolicy,
) -> BudgetUsageSummary {
    let month = MonthKey::from_date(today);

    let budgets: Vec<BudgetUsage> = items
        .iter()
        .filter(|item| item.is_active && item.kind == BudgetItemKind::ProjectedExpense)
        .filter_map(|item| {
            let limit = monthly_contribution(item, month, policy);
            if limit.is_zero() {
                return None;
            }
            let spent: Decimal = movements
                .iter()
                .filter(|m| m.kind == MovementKind::Expense)
                .filter(|m| m.category == item.category && month.contains(m.movement_date))
                .map(|m| m.amount)
                .sum();
            Some(BudgetUsage {
                item: item.clone(),
                limit,
                spent,
                remaining: (limit - spent).max(Decimal::ZERO),
                percentage_used: percentage(spent, limit),
            })
        })
        .collect();

    BudgetUsageSummary {
        month,
        total_budgets: budgets.len(),
        total_allocated: budgets.iter().map(|b| b.limit).sum(),
        total_spent: budgets.iter().map(|b| b.spent).sum(),
        total_remaining: budgets.iter().map(|b| b.remaining).sum(),
        budgets,
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
///
/// # Arguments
/// * `percentage_used` - Percentage of the budget used, may exceed 100
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(percentage_used: Decimal, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percentage_used.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    let filled = (clamped * Decimal::from(length) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(length);
    let empty = length - filled;

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {:.1}%", round_cents(percentage_used))
}

/// Formats the summary as one line per budget followed by totals.
#[must_use]
pub fn format_budget_usage(summary: &BudgetUsageSummary) -> String {
    use std::fmt::Write;

    let mut out = format!("Budgets for {}\n", summary.month.label());
    if summary.budgets.is_empty() {
        out.push_str("No active budgets this month.\n");
        return out;
    }

    for usage in &summary.budgets {
        let _ = writeln!(
            out,
            "{:<20} {} {} of {} ({} left)",
            usage.item.name,
            format_progress_bar(usage.percentage_used, None),
            format_amount(usage.spent),
            format_amount(usage.limit),
            format_amount(usage.remaining),
        );
    }
    let _ = writeln!(
        out,
        "{} budget(s): {} spent of {} allocated, {} remaining",
        summary.total_budgets,
        format_amount(summary.total_spent),
        format_amount(summary.total_allocated),
        format_amount(summary.total_remaining),
    );
    out
}
