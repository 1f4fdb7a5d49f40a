//! Amount type for the money value of a single transaction.
//!
//! Transaction amounts are never negative: whether money comes in or goes out is carried by the
//! transaction type. Sums of amounts, on the other hand, are plain `Decimal` values and can be
//! negative.

use anyhow::ensure;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A non-negative money amount.
///
/// Parsing accepts an optional leading dollar sign and thousands separators:
/// ```
/// # use budget_calendar::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1,250.50");
/// ```
///
/// Negative values are rejected:
/// ```
/// # use budget_calendar::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates an `Amount`, failing if `value` is negative.
    pub fn new(value: Decimal) -> crate::Result<Self> {
        ensure!(
            !value.is_sign_negative() || value.is_zero(),
            "An amount cannot be negative, got {value}"
        );
        Ok(Self(value))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Converts the value for JSON request bodies, which carry amounts as numbers.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Parse(rust_decimal::Error),
    Negative(String),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Parse(e) => Debug::fmt(e, f),
            AmountError::Negative(s) => write!(f, "Negative({s:?})"),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Parse(e) => Display::fmt(e, f),
            AmountError::Negative(s) => write!(f, "An amount cannot be negative, got '{s}'"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            AmountError::Negative(_) => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }
        let without_dollar = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError::Parse)?;
        if value.is_zero() {
            return Ok(Amount::ZERO);
        }
        if value.is_sign_negative() {
            return Err(AmountError::Negative(trimmed.to_string()));
        }
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", money(self.0).trim_start_matches('-'))
    }
}

/// Formats any money value, including negative sums, with two decimals and thousands separators.
pub fn money(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = value.abs().to_f64().unwrap_or_default();
    format!("{sign}{}", format_num::format_num!(",.2", abs))
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
