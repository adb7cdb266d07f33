//! Money helpers.
//!
//! Amounts are `Decimal` in the core and integer cents in the database. All
//! rounding goes through [`round_cents`] so every stored or reported value has
//! exactly two fractional digits of precision.

use crate::errors::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for every amount
pub const CENT_DIGITS: u32 = 2;

/// Converts stored cents into a decimal amount.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, CENT_DIGITS)
}

/// Converts a decimal amount into cents, rounding half away from zero first.
pub fn to_cents(amount: Decimal) -> Result<i64> {
    (round_cents(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| Error::invalid(format!("Amount {amount} does not fit in storage")))
}

/// Rounds to cent precision, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates that an amount is strictly positive once rounded to cents.
pub fn require_positive(amount: Decimal) -> Result<Decimal> {
    let rounded = round_cents(amount);
    if rounded <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(rounded)
}

/// `part / whole * 100`, rounded to cents.
///
/// A zero `whole` yields zero rather than an error or an infinite ratio.
#[must_use]
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_cents(part / whole * Decimal::ONE_HUNDRED)
}

/// Formats an amount like `$1234.50` or `-$25.00`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Formats a signed amount like `+$50.00` or `-$25.50`.
#[must_use]
pub fn format_signed_amount(amount: Decimal) -> String {
    if amount >= Decimal::ZERO {
        format!("+{}", format_amount(amount))
    } else {
        format_amount(amount)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cents_conversion() {
        assert_eq!(from_cents(123_456), dec!(1234.56));
        assert_eq!(to_cents(dec!(1234.56)).unwrap(), 123_456);
        assert_eq!(to_cents(dec!(0.005)).unwrap(), 1);
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive(dec!(10.499)).unwrap(), dec!(10.50));
        assert!(matches!(
            require_positive(dec!(0)),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            require_positive(dec!(-5)),
            Err(Error::InvalidAmount { .. })
        ));
        // Rounds to zero cents
        assert!(require_positive(dec!(0.004)).is_err());
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(dec!(50), dec!(200)), dec!(25.00));
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(1234.5)), "$1234.50");
        assert_eq!(format_amount(dec!(-25)), "-$25.00");
        assert_eq!(format_amount(Decimal::ZERO), "$0.00");
        assert_eq!(format_signed_amount(dec!(50)), "+$50.00");
        assert_eq!(format_signed_amount(dec!(-123.45)), "-$123.45");
    }
}
