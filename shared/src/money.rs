//! Money helpers
//!
//! All monetary arithmetic is done in `Decimal`. Values are rounded to two
//! places (half away from zero) whenever they become a persisted or printed
//! figure.

use rust_decimal::prelude::*;

/// Rounding precision for monetary values
pub const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round a monetary value to 2 decimal places, half-up
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether two amounts agree within [`MONEY_TOLERANCE`]
///
/// Amounts too far apart to subtract never agree.
#[inline]
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|diff| diff.abs() <= MONEY_TOLERANCE)
}

/// Sum of `values`, `None` on overflow
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}
