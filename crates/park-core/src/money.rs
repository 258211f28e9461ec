//! # Currency Amounts
//!
//! `Amount` is a non-negative decimal at currency granularity (two
//! places). Rounding is half-away-from-zero. Every charge, override, and
//! ledger entry passes through [`Amount::new`] or [`Amount::parse`], so a
//! negative or non-numeric value never reaches the lot state.
//!
//! `UnitPrice` is a tariff input: non-negative, kept at full precision.
//! A fee is summed from unit prices and rounded once into an `Amount`.
//!
//! Both persist as JSON numbers to stay readable by existing documents.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Decimal places kept for currency values.
pub const CURRENCY_SCALE: u32 = 2;

/// Rejected amount input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The value is below zero.
    #[error("amount must be non-negative, got {0}")]
    Negative(String),

    /// The text is not a decimal number.
    #[error("amount is not a number: {0:?}")]
    NotANumber(String),
}

/// A non-negative currency amount rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Validate and round a decimal value.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value.to_string()));
        }
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self(round_currency(value)))
    }

    /// Parse operator input such as `"12.50"` or `"12,50"`.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        let normalized = trimmed.replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }

    /// The underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Sum of two amounts. Non-negative inputs keep the result non-negative.
    pub fn saturating_add(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

}

/// Round to currency granularity, half away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A non-negative tariff price, not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    pub const ZERO: UnitPrice = UnitPrice(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value.to_string()));
        }
        Ok(Self(value.normalize()))
    }

    /// Parse operator input; accepts a decimal comma like [`Amount::parse`].
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        let value = Decimal::from_str(&trimmed.replace(',', "."))
            .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a whole count, unrounded.
    pub fn times(&self, count: u64) -> UnitPrice {
        UnitPrice(self.0.saturating_mul(Decimal::from(count)))
    }

    /// Sum of two prices, unrounded.
    pub fn saturating_add(&self, other: UnitPrice) -> UnitPrice {
        UnitPrice(self.0.saturating_add(other.0))
    }

    /// Round to currency granularity. The only place a price becomes an amount.
    pub fn rounded(&self) -> Amount {
        if self.0.is_zero() {
            return Amount::ZERO;
        }
        Amount(round_currency(self.0))
    }
}

impl std::fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.scale() <= CURRENCY_SCALE {
            write!(f, "{:.2}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for UnitPrice {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for UnitPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for UnitPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        UnitPrice::new(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}
