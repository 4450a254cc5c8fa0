//! Monetary rounding

/// Round an amount to whole cents, half away from zero.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
