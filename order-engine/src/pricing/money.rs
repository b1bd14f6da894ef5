//! Money helpers using rust_decimal for precision
//!
//! Prices are carried as `Decimal` end to end and rounded to two places
//! only at the output boundary.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed quantity per cart line
pub const MAX_QUANTITY: u32 = 9999;

/// Maximum allowed price, add-on price or |adjustment| (1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Whether `value` is a price the catalog may store
#[inline]
pub fn within_price_bound(value: Decimal) -> bool {
    value.abs() <= MAX_PRICE
}

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a price at zero
#[inline]
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Equality within [`MONEY_TOLERANCE`]
#[inline]
pub fn money_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}

/// Render a price for user-facing messages (always two places)
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}
