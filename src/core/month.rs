//! Calendar month keys (`YYYY-MM`).
//!
//! A [`MonthKey`] is always backed by the first day of its month; month
//! arithmetic goes through chrono's `Months`.

use crate::errors::{Error, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Builds a key from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| Error::invalid(format!("Invalid month: {year}-{month}")))
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month of the year.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn num_days(self) -> u32 {
        self.last_day().day()
    }

    /// The month before this one.
    #[must_use]
    pub fn previous(self) -> Self {
        self.0.checked_sub_months(Months::new(1)).map_or(self, Self)
    }

    /// The month after this one.
    #[must_use]
    pub fn next(self) -> Self {
        self.0.checked_add_months(Months::new(1)).map_or(self, Self)
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }

    /// Human-readable label such as `Oct 2026`.
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%b %Y").to_string()
    }

    /// The `count` consecutive months ending at `current`, oldest first.
    #[must_use]
    pub fn trailing(current: Self, count: u32) -> Vec<Self> {
        let mut months = Vec::with_capacity(count as usize);
        let mut month = current;
        for _ in 0..count {
            months.push(month);
            month = month.previous();
        }
        months.reverse();
        months
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::invalid(format!("Malformed month key '{s}', expected YYYY-MM"));
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_date_and_bounds() {
        let key = MonthKey::from_date(date(2024, 2, 17));
        assert_eq!(key.to_string(), "2024-02");
        assert_eq!(key.first_day(), date(2024, 2, 1));
        assert_eq!(key.last_day(), date(2024, 2, 29));
        assert_eq!(MonthKey::new(2023, 2).unwrap().last_day(), date(2023, 2, 28));
        assert_eq!(MonthKey::new(2026, 12).unwrap().last_day(), date(2026, 12, 31));
        assert_eq!(MonthKey::new(2100, 2).unwrap().num_days(), 28);
        assert_eq!(MonthKey::new(2000, 2).unwrap().num_days(), 29);
        assert_eq!(MonthKey::new(2026, 4).unwrap().num_days(), 30);
    }

    #[test]
    fn test_previous_next_across_years() {
        let jan = MonthKey::new(2026, 1).unwrap();
        assert_eq!(jan.previous().to_string(), "2025-12");
        assert_eq!(jan.previous().next(), jan);
        assert_eq!(MonthKey::new(2025, 12).unwrap().next(), jan);
    }

    #[test]
    fn test_trailing_window_oldest_first() {
        let current = MonthKey::new(2026, 2).unwrap();
        let months: Vec<String> = MonthKey::trailing(current, 4)
            .into_iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(months, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
        assert!(MonthKey::trailing(current, 0).is_empty());
    }

    #[test]
    fn test_parse() {
        let key: MonthKey = "2026-10".parse().unwrap();
        assert_eq!((key.year(), key.month()), (2026, 10));
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("2026/10".parse::<MonthKey>().is_err());
        assert!("26-10".parse::<MonthKey>().is_err());
        assert!(matches!(
            "oops".parse::<MonthKey>(),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_label_and_contains() {
        let key = MonthKey::new(2026, 10).unwrap();
        assert_eq!(key.label(), "Oct 2026");
        assert!(key.contains(date(2026, 10, 31)));
        assert!(!key.contains(date(2026, 11, 1)));
    }

    #[test]
    fn test_serializes_as_string() {
        let key = MonthKey::new(2026, 3).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2026-03\"");
    }
}
