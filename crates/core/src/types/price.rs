//! Type-safe price representation using decimal arithmetic.
//!
//! Prices never go through `f64` internally; the wire format however stores
//! them as JSON numbers (the persisted cart format predates this crate), so
//! serialization goes through `rust_decimal::serde::float`.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price for a single line item.
///
/// Currency handling is out of scope for the cart; prices are display values
/// carried through from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    /// Format for display (e.g., "$19.99").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_with_two_decimal_places() {
        let price: Price = "19.9".parse().expect("valid price");
        assert_eq!(price.to_string(), "$19.90");
    }

    #[test]
    fn serializes_as_json_number() {
        let price: Price = "10.5".parse().expect("valid price");
        let json = serde_json::to_string(&price).expect("serialize");
        assert_eq!(json, "10.5");
    }

    #[test]
    fn deserializes_from_json_number() {
        let price: Price = serde_json::from_str("10.5").expect("deserialize");
        assert_eq!(price, "10.5".parse().expect("valid price"));
    }
}
