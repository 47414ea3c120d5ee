//! Money in minor currency units.

use serde::{Deserialize, Serialize};

/// An amount of money in minor currency units (cents) with its ISO 4217 code.
///
/// All fee arithmetic in the platform happens in integer cents; amounts are
/// only formatted as decimals at the display edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g., cents for CAD).
    pub cents: i64,
    /// ISO 4217 currency code (e.g., "CAD", "USD").
    pub currency: String,
}

impl Money {
    /// Create an amount from integer cents.
    #[must_use]
    pub fn from_cents(cents: i64, currency: impl Into<String>) -> Self {
        Self {
            cents,
            currency: currency.into(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(800, "CAD").to_string(), "8.00 CAD");
        assert_eq!(Money::from_cents(799, "USD").to_string(), "7.99 USD");
        assert_eq!(Money::from_cents(-50, "CAD").to_string(), "-0.50 CAD");
    }
}
