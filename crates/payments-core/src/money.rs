//! # Money
//!
//! Conversions between decimal prices and the provider's minor currency unit.

/// Multiplier from a decimal amount to minor units (cents).
///
/// Applied to every currency, zero-decimal ones included; the provider
/// rejects amounts that do not make sense for the currency.
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Convert a decimal amount to minor units, rounding to the nearest unit.
///
/// `9.99` becomes `999` even though `9.99 * 100.0` is `998.999…` in binary
/// floating point.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * MINOR_UNITS_PER_MAJOR).round() as i64
}

/// Convert minor units back to a decimal amount
pub fn from_minor_units(amount: i64) -> f64 {
    amount as f64 / MINOR_UNITS_PER_MAJOR
}
