//! Exact signed monetary amounts.
//!
//! Uses `rust_decimal` internally so that sums and averages carry no
//! floating-point error. Values keep their full precision through every
//! calculation and are only rounded when displayed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A signed transaction amount.
///
/// Positive amounts are credits. Zero and negative amounts are debits.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use txn_summary::Amount;
///
/// let amount = Amount::from_str("+60.5").unwrap();
/// assert!(amount.is_credit());
/// assert_eq!(amount.to_string(), "60.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places shown when an amount is displayed.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a `Decimal` without changing its scale.
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Returns the underlying decimal at full precision.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` for strictly positive amounts.
    ///
    /// Zero is deliberately not a credit.
    pub fn is_credit(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Adds two amounts, returning `None` if the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Mean of `count` amounts summing to `total`, or zero when `count` is 0.
    pub fn mean(total: Amount, count: usize) -> Amount {
        if count == 0 {
            return Amount::ZERO;
        }
        Amount(total.0 / Decimal::from(count))
    }

    /// Returns the amount rounded half away from zero to `DISPLAY_SCALE` places.
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(Self::DISPLAY_SCALE);
        rounded
    }
}

/// Error returned when an amount field is not a signed decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError(String);

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount {:?}", self.0)
    }
}

impl std::error::Error for ParseAmountError {}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts `[+|-]digits[.digits]`, surrounded by optional whitespace.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ParseAmountError(trimmed.to_string());

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'+') => (false, &trimmed[1..]),
            Some(b'-') => (true, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let has_digit = unsigned.bytes().any(|b| b.is_ascii_digit());
        let well_formed = unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.')
            && unsigned.bytes().filter(|&b| b == b'.').count() <= 1;
        if !has_digit || !well_formed {
            return Err(invalid());
        }

        let magnitude = Decimal::from_str(unsigned).map_err(|_| invalid())?;
        Ok(Amount(if negative { -magnitude } else { magnitude }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded())
    }
}

/// Panics if the sum overflows; sums driven by input use [`Amount::checked_add`].
impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
