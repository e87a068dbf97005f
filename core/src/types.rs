//! Shared primitive types used across the entire pipeline.

/// A client identifier. Assigned 1-based, in generation order.
pub type ClientId = u32;

/// A monetary amount in the dataset's currency, rounded to cents
/// wherever it is stored.
pub type Amount = f64;

/// Round to two decimal places (cents).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The smallest positive stored amount.
pub const CENT: Amount = 0.01;

/// Round to cents, never below one cent. Quantities that must stay
/// strictly positive go through this so tiny weights cannot round
/// them away to zero.
pub fn positive_cents(value: f64) -> Amount {
    round_cents(value).max(CENT)
}
