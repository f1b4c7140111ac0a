//! Integer price representation.
//!
//! Prices on the storefront are plain integer amounts with no minor-unit
//! convention: `25` renders as `$25`. There is no rounding or decimal
//! formatting anywhere in the display path.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A non-negative integer price.
///
/// Arithmetic saturates at `u64::MAX` instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The raw integer amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Sum of two prices.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl FromStr for Price {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_literal_integer() {
        assert_eq!(Price::new(25).to_string(), "$25");
        assert_eq!(Price::new(0).to_string(), "$0");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::new(25).times(2), Price::new(10).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(80));
    }

    #[test]
    fn test_saturates() {
        assert_eq!(Price::new(u64::MAX).times(2), Price::new(u64::MAX));
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 42 ".parse::<Price>().unwrap(), Price::new(42));
        assert!("abc".parse::<Price>().is_err());
        assert!("-5".parse::<Price>().is_err());
        assert!("12.50".parse::<Price>().is_err());
    }
}
