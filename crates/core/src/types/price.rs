//! Decimal price amounts.
//!
//! Prices are kept in the store's single display currency. Arithmetic uses
//! [`Decimal`] so totals never pick up floating-point drift, and saturates at
//! the decimal range instead of panicking.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-currency-tagged price amount.
///
/// Serializes as a decimal string (`"15.00"`); deserializes from either a
/// string or a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest magnitude accepted from a client, in currency units.
    pub const LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount lies within `-LIMIT..=LIMIT`.
    #[must_use]
    pub fn within_limit(&self) -> bool {
        self.0.abs() <= Self::LIMIT
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Price = Vec::<Price>::new().into_iter().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_multiply_by_quantity() {
        assert_eq!(Price::from_units(250) * 3, Price::from_units(750));
    }

    #[test]
    fn test_arithmetic_saturates_at_decimal_max() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max + max, max);
        assert_eq!(max * 2, max);
        let total: Price = [max, max, Price::from_units(1)].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_within_limit() {
        assert_eq!(Price::LIMIT, Decimal::from(1_000_000_000_000_i64));
        assert!(Price::new(Price::LIMIT).within_limit());
        assert!(Price::new(-Price::LIMIT).within_limit());
        assert!(!Price::new(Price::LIMIT + Decimal::ONE).within_limit());
        assert!(!Price::new(Decimal::MAX).within_limit());
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::from_units(15).to_string(), "15.00");
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("1500").unwrap();
        let from_string: Price = serde_json::from_str("\"1500\"").unwrap();
        assert_eq!(from_number, Price::from_units(1500));
        assert_eq!(from_string, Price::from_units(1500));
    }
}
