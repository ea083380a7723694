//! Fixed-point recipe price.

use std::fmt;
use std::str::FromStr;

/// Largest accepted price, in cents (999.99).
pub const PRICE_MAX_CENTS: i32 = 99_999;

/// Reasons a price string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// Input was not a plain decimal number.
    #[error("price must be a decimal number")]
    NotANumber,
    /// Input was below zero.
    #[error("price must not be negative")]
    Negative,
    /// Input had more than two decimal places.
    #[error("price must have at most 2 decimal places")]
    TooPrecise,
    /// Input exceeded 999.99.
    #[error("price must be at most 999.99")]
    TooLarge,
}

impl PriceError {
    /// Machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotANumber => "invalid",
            Self::Negative => "min_value",
            Self::TooPrecise => "max_decimal_places",
            Self::TooLarge => "max_value",
        }
    }
}

/// Non-negative price with two decimal places, stored as whole cents.
///
/// # Examples
/// ```
/// use backend::domain::Price;
///
/// let price: Price = "5.5".parse().expect("valid price");
/// assert_eq!(price.cents(), 550);
/// assert_eq!(price.to_string(), "5.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i32);

impl Price {
    /// Build a price from whole cents.
    pub fn from_cents(cents: i32) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        if cents > PRICE_MAX_CENTS {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(cents))
    }

    /// Whole cents.
    #[must_use]
    pub const fn cents(self) -> i32 {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let unsigned = match trimmed.strip_prefix('-') {
            Some(rest) => {
                // "-0" and "-0.00" are still zero.
                let value = parse_unsigned(rest)?;
                if value > 0 {
                    return Err(PriceError::Negative);
                }
                value
            }
            None => parse_unsigned(trimmed.strip_prefix('+').unwrap_or(trimmed))?,
        };
        let cents = i32::try_from(unsigned).map_err(|_| PriceError::TooLarge)?;
        Self::from_cents(cents)
    }
}

fn parse_unsigned(raw: &str) -> Result<u64, PriceError> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(PriceError::NotANumber);
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(PriceError::NotANumber);
    }

    // Trailing zeros past the second place carry no precision.
    let significant = fraction.trim_end_matches('0');
    if significant.len() > 2 {
        return Err(PriceError::TooPrecise);
    }

    let whole = whole.trim_start_matches('0');
    if whole.len() > 3 {
        return Err(PriceError::TooLarge);
    }
    let whole_value: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| PriceError::NotANumber)?
    };
    let mut fraction_value = 0_u64;
    for (position, digit) in significant.bytes().enumerate() {
        let scale = if position == 0 { 10 } else { 1 };
        fraction_value += u64::from(digit - b'0') * scale;
    }
    Ok(whole_value * 100 + fraction_value)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
