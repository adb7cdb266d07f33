//! Enumerations stored as text columns.
//!
//! These replace the loosely typed `"Ingreso"`/`"Gasto"` style strings with
//! closed sets the compiler can check.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an actual movement (and of the category it is filed under).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Whether a budget item projects income or spending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BudgetItemKind {
    /// Expected recurring income (salary, rent received)
    #[sea_orm(string_value = "recurring_income")]
    RecurringIncome,
    /// Expected spending (groceries, subscriptions)
    #[sea_orm(string_value = "projected_expense")]
    ProjectedExpense,
}

/// How often a budget item recurs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every seven days from the start date
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Once per calendar month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Once per year, in the start date's month
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// What the user decided about a due budget item occurrence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    /// Recorded as a movement
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Dismissed without a movement
    #[sea_orm(string_value = "skipped")]
    Skipped,
}

impl BudgetItemKind {
    /// The movement kind that realises this budget item.
    #[must_use]
    pub const fn movement_kind(self) -> MovementKind {
        match self {
            Self::RecurringIncome => MovementKind::Income,
            Self::ProjectedExpense => MovementKind::Expense,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}
