//! Fixed-point token amount codec
//!
//! Converts between integer base units (as held on-chain) and decimal
//! display strings. All arithmetic happens on the decimal digit string of a
//! `U256`, so no `10^decimals` divisor is ever materialised and no
//! floating point is involved.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Decimals of the COMMONS token
pub const COMMONS_DECIMALS: u32 = 18;

/// Fractional digits shown by default
pub const DEFAULT_DISPLAY_DECIMALS: u32 = 2;

/// Largest supported decimal exponent; `U256::MAX` is about `1.16e77`
pub const MAX_DECIMALS: u32 = 77;

/// Format a base-unit amount for display.
///
/// The fraction is truncated (never rounded) to `display_decimals` digits and
/// then right-padded with zeros, so the result always carries exactly
/// `display_decimals` fractional digits. A missing or zero amount renders as
/// `"0"`. Both exponents are clamped to [`MAX_DECIMALS`].
pub fn format_token_amount(amount: Option<U256>, decimals: u32, display_decimals: u32) -> String {
    let amount = match amount {
        Some(amount) if !amount.is_zero() => amount,
        _ => return "0".to_string(),
    };
    let display_decimals = display_decimals.min(MAX_DECIMALS);

    let (integer, fraction) = split_digits(amount, decimals);
    if display_decimals == 0 {
        return integer;
    }

    let mut shown: String = fraction.chars().take(display_decimals as usize).collect();
    while shown.len() < display_decimals as usize {
        shown.push('0');
    }
    format!("{}.{}", integer, shown)
}

/// Format a base-unit amount with full precision, trimming trailing zeros.
///
/// `decimals` is clamped to [`MAX_DECIMALS`].
pub fn format_units(amount: U256, decimals: u32) -> String {
    let (integer, fraction) = split_digits(amount, decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Parse a non-negative decimal string into base units.
///
/// Inputs with more fractional digits than `decimals` are rejected rather
/// than truncated, as is a `decimals` above [`MAX_DECIMALS`].
pub fn parse_units(text: &str, decimals: u32) -> Result<U256, Error> {
    if decimals > MAX_DECIMALS {
        return Err(Error::InvalidAmount(format!(
            "{} decimals exceeds the maximum of {}",
            decimals, MAX_DECIMALS
        )));
    }
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (text, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(Error::InvalidAmount(format!("'{}' is not a number", text)));
    }
    if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "'{}' is not a non-negative decimal",
            text
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidAmount(format!(
            "'{}' has more than {} fractional digits",
            text, decimals
        )));
    }

    let mut digits = String::with_capacity(integer.len() + decimals as usize);
    digits.push_str(integer);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10)
        .map_err(|_| Error::InvalidAmount(format!("'{}' does not fit in 256 bits", text)))
}

/// Split the decimal digits of `amount` into integer and zero-padded fraction parts.
fn split_digits(amount: U256, decimals: u32) -> (String, String) {
    let digits = amount.to_string();
    let decimals = decimals.min(MAX_DECIMALS) as usize;
    if digits.len() > decimals {
        let (integer, fraction) = digits.split_at(digits.len() - decimals);
        (integer.to_string(), fraction.to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    }
}

/// Serde adapter writing `U256` as a decimal string.
///
/// Indexer responses carry amounts as decimal strings, and the CLI prints them
/// the same way.
pub mod decimal_u256 {
    use alloy_primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        U256::from_str_radix(&text, 10).map_err(de::Error::custom)
    }
}

/// An amount of base units together with the token's decimal exponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    /// Base units
    #[serde(with = "decimal_u256")]
    pub amount: U256,
    /// Base units per display unit, as a power of ten
    pub decimals: u32,
}

impl TokenAmount {
    /// Create a new amount
    pub fn new(amount: U256, decimals: u32) -> Self {
        Self { amount, decimals }
    }

    /// Parse a display string into an amount
    pub fn parse(text: &str, decimals: u32) -> Result<Self, Error> {
        Ok(Self::new(parse_units(text, decimals)?, decimals))
    }

    /// Truncated display with a fixed number of fractional digits
    pub fn display(&self, display_decimals: u32) -> String {
        format_token_amount(Some(self.amount), self.decimals, display_decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.amount, self.decimals))
    }
}
