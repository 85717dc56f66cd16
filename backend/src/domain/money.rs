//! Monetary amounts held in integer minor units.
//!
//! Clients exchange prices as decimal JSON numbers (`10.5`); internally every
//! amount is a non-negative count of cents so totals never accumulate float
//! rounding error.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

const CENTS_PER_UNIT: i64 = 100;
const CENTS_PER_UNIT_F64: f64 = 100.0;
// Largest cent count representable exactly as an f64.
const MAX_EXACT_CENTS: i64 = 9_007_199_254_740_991;

/// Validation errors raised when constructing a [`Price`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PriceError {
    /// The amount was negative.
    #[error("price must not be negative")]
    Negative,
    /// The amount was NaN, infinite, or too large to represent.
    #[error("price is out of range")]
    OutOfRange,
    /// Arithmetic on prices overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Non-negative monetary amount in cents.
///
/// # Examples
/// ```
/// use pawcare::domain::Price;
///
/// let unit = Price::from_decimal(10.0).expect("valid price");
/// let total = unit.checked_mul(2).expect("no overflow");
/// assert_eq!(total.cents(), 2_000);
/// assert_eq!(total.as_decimal(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = f64, example = 19.99)]
pub struct Price(i64);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Construct a price from a cent count.
    pub const fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        if cents > MAX_EXACT_CENTS {
            return Err(PriceError::OutOfRange);
        }
        Ok(Self(cents))
    }

    /// Construct a price from a decimal amount, rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::OutOfRange);
        }
        if amount < 0.0 {
            return Err(PriceError::Negative);
        }
        let cents = (amount * CENTS_PER_UNIT_F64).round();
        if cents > MAX_EXACT_CENTS as f64 {
            return Err(PriceError::OutOfRange);
        }
        // Integral and within 0..=MAX_EXACT_CENTS, so the cast is exact.
        Self::from_cents(cents as i64)
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount as a decimal number of whole units.
    #[must_use]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT_F64
    }

    /// Multiply by a quantity.
    pub fn checked_mul(self, quantity: u32) -> Result<Self, PriceError> {
        self.0
            .checked_mul(i64::from(quantity))
            .ok_or(PriceError::Overflow)
            .and_then(Self::from_cents)
    }

    /// Add another price.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        self.0
            .checked_add(other.0)
            .ok_or(PriceError::Overflow)
            .and_then(Self::from_cents)
    }

    /// Mean of `total` over `count` items, rounded half up to the cent.
    #[must_use]
    pub fn average(total: Self, count: u64) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let count = i128::from(count);
        let doubled = i128::from(total.0) * 2 + count;
        let mean = doubled.div_euclid(count * 2);
        // The mean never exceeds the total, which already fits.
        Self(i64::try_from(mean).unwrap_or(total.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0.div_euclid(CENTS_PER_UNIT),
            self.0.rem_euclid(CENTS_PER_UNIT)
        )
    }
}

impl Sum<Price> for Result<Price, PriceError> {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Ok(Price::ZERO), |acc, price| acc?.checked_add(price))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Self::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}
