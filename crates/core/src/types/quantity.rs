//! Line-item quantity type.
//!
//! A cart line item exists if and only if at least one unit of the product is
//! in the cart, so a quantity of zero is unrepresentable. Decrementing at one
//! saturates rather than removing the item; removal is a separate product
//! decision the cart does not implement.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum QuantityError {
    /// Quantities start at one; zero means the item should not exist.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A line-item quantity, always >= 1.
///
/// ## Examples
///
/// ```
/// use gomarket_core::Quantity;
///
/// let qty = Quantity::ONE;
/// assert_eq!(qty.get(), 1);
/// assert_eq!(qty.saturating_increment().get(), 2);
///
/// // Decrementing at 1 saturates instead of reaching 0
/// assert_eq!(qty.saturating_decrement().get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The minimum (and initial) quantity.
    pub const ONE: Self = Self(1);

    /// Construct a quantity from a raw count.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `count` is zero.
    pub const fn new(count: u32) -> Result<Self, QuantityError> {
        if count == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(count))
    }

    /// Get the raw count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One more unit, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, saturating at 1 (never reaches 0).
    #[must_use]
    pub const fn saturating_decrement(self) -> Self {
        if self.0 > 1 { Self(self.0 - 1) } else { Self(1) }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}
