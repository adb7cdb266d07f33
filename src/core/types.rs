//! Domain values handed across the store boundary.
//!
//! The database keeps amounts in cents; these types carry `Decimal` amounts
//! and are what the projection engine and reports consume.

use crate::{
    core::{money::from_cents, month::MonthKey},
    entities::{BudgetItemKind, Frequency, MovementKind, budget_item, movement},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive calendar date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Every day of the months `first..=last`.
    #[must_use]
    pub fn spanning(first: MonthKey, last: MonthKey) -> Self {
        let start = first.first_day();
        Self {
            start,
            end: last.last_day().max(start),
        }
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A user-declared recurring income or projected expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItem {
    /// Budget item ID
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Amount per occurrence, always positive
    pub amount: Decimal,
    /// Income or expense projection
    pub kind: BudgetItemKind,
    /// Category the item is tracked against
    pub category: String,
    /// Recurrence
    pub frequency: Frequency,
    /// First day the item applies
    pub start_date: NaiveDate,
    /// Last day the item applies, None when open-ended
    pub end_date: Option<NaiveDate>,
    /// Inactive items are ignored by projections
    pub is_active: bool,
}

impl BudgetItem {
    /// Checks the record invariants: a positive amount and, when an end date is
    /// set, `start_date <= end_date`.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }
        if let Some(end) = self.end_date {
            DateRange::new(self.start_date, end)?;
        }
        Ok(())
    }

    /// Whether the item applies on at least one day of `[first, last]`.
    #[must_use]
    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.start_date <= last && self.end_date.is_none_or(|end| end >= first)
    }
}

impl From<budget_item::Model> for BudgetItem {
    fn from(model: budget_item::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            amount: from_cents(model.amount_cents),
            kind: model.kind,
            category: model.category,
            frequency: model.frequency,
            start_date: model.start_date,
            end_date: model.end_date,
            is_active: model.is_active,
        }
    }
}

/// An actual, dated income or expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Movement ID
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Amount, always positive
    pub amount: Decimal,
    /// Category name
    pub category: String,
    /// Free-form description
    pub description: String,
    /// Income or expense
    pub kind: MovementKind,
    /// When it happened
    pub movement_date: NaiveDate,
}

impl Movement {
    /// Checks that the amount is positive.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

impl From<movement::Model> for Movement {
    fn from(model: movement::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            amount: from_cents(model.amount_cents),
            category: model.category,
            description: model.description,
            kind: model.kind,
            movement_date: model.movement_date,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::new(date(2026, 1, 1), date(2026, 1, 1)).is_ok());
        assert!(matches!(
            DateRange::new(date(2026, 2, 1), date(2026, 1, 1)),
            Err(Error::InvalidDateRange { .. })
        ));
        let range = DateRange::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        assert!(range.contains(date(2026, 1, 31)));
        assert!(!range.contains(date(2026, 2, 1)));
    }

    #[test]
    fn test_overlaps_open_and_closed() {
        let mut item = BudgetItem {
            id: 1,
            user_id: 1,
            name: "Rent".to_string(),
            amount: dec!(900),
            kind: BudgetItemKind::ProjectedExpense,
            category: "Housing".to_string(),
            frequency: Frequency::Monthly,
            start_date: date(2026, 3, 15),
            end_date: None,
            is_active: true,
        };
        assert!(item.overlaps(date(2030, 1, 1), date(2030, 1, 31)));
        assert!(item.overlaps(date(2026, 3, 1), date(2026, 3, 31)));
        assert!(!item.overlaps(date(2026, 2, 1), date(2026, 2, 28)));

        item.end_date = Some(date(2026, 5, 31));
        assert!(item.overlaps(date(2026, 5, 1), date(2026, 5, 31)));
        assert!(!item.overlaps(date(2026, 6, 1), date(2026, 6, 30)));
        assert!(item.validate().is_ok());

        item.end_date = Some(date(2026, 3, 14));
        assert!(matches!(item.validate(), Err(Error::InvalidDateRange { .. })));

        item.end_date = None;
        item.amount = dec!(-50);
        assert!(matches!(item.validate(), Err(Error::InvalidAmount { .. })));
    }
}
