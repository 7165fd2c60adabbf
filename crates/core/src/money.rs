//! Decimal money helpers.
//!
//! Amounts are stored as `decimal(10,2)`; every derived figure (averages,
//! percentages, growth) is computed with exact base-10 arithmetic and rounded
//! to two places with banker's rounding (midpoint to even).

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by monetary and percentage figures.
pub const MONEY_SCALE: u32 = 2;

/// Round to [`MONEY_SCALE`] places, midpoint to even.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// `numerator / denominator`, rounded; zero when the denominator is zero.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return round_money(Decimal::ZERO);
    }
    round_money(numerator / denominator)
}

/// Share of `part` in `whole` as a percentage; zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return round_money(Decimal::ZERO);
    }
    round_money(part / whole * Decimal::ONE_HUNDRED)
}

/// Percentage change from `old` to `new`.
///
/// A zero baseline yields zero rather than an undefined growth.
pub fn percent_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        return round_money(Decimal::ZERO);
    }
    round_money((new - old) / old * Decimal::ONE_HUNDRED)
}
