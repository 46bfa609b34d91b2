//! # Fixed-Point Amounts
//!
//! Token quantities are integer counts of e8s (10^-8 of a token). USD values
//! use the same 10^-8 scale. Every operation is checked: an out-of-range
//! result is an error, never a wrapped or saturated value.
//!
//! ```text
//! 1 token      = 100_000_000 e8s
//! $0.005       =     500_000 (UsdValue raw)
//! ```
//!
//! Division always truncates toward zero.

use crate::error::{
    Result, TokenomicsError, DEFAULT_ADDITION_OVERFLOW_ERROR, DEFAULT_DIVISION_ERROR,
    DEFAULT_MULTIPLICATION_OVERFLOW_ERROR, DEFAULT_UNDERFLOW_ERROR,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// e8s per whole token
pub const E8S: u128 = 100_000_000;

/// Raw units per whole US dollar
pub const USD_SCALE: u128 = 100_000_000;

/// Number of fractional digits carried by both scales
pub const DECIMALS: usize = 8;

fn add_raw(lhs: u128, rhs: u128, operation: &str) -> Result<u128> {
    lhs.checked_add(rhs)
        .ok_or_else(|| TokenomicsError::AdditionOverflow {
            operation: operation.to_string(),
            details: format!("{}: {} with {}", DEFAULT_ADDITION_OVERFLOW_ERROR, lhs, rhs),
        })
}

fn sub_raw(lhs: u128, rhs: u128, operation: &str) -> Result<u128> {
    lhs.checked_sub(rhs).ok_or_else(|| TokenomicsError::Underflow {
        operation: operation.to_string(),
        details: format!("{}: {} minus {}", DEFAULT_UNDERFLOW_ERROR, lhs, rhs),
    })
}

fn mul_raw(lhs: u128, rhs: u128, operation: &str) -> Result<u128> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| TokenomicsError::MultiplicationOverflow {
            operation: operation.to_string(),
            details: format!(
                "{}: {} with {}",
                DEFAULT_MULTIPLICATION_OVERFLOW_ERROR, lhs, rhs
            ),
        })
}

fn div_raw(lhs: u128, rhs: u128, operation: &str) -> Result<u128> {
    lhs.checked_div(rhs).ok_or_else(|| TokenomicsError::DivisionFailed {
        operation: operation.to_string(),
        details: format!("{}: {} divided by {}", DEFAULT_DIVISION_ERROR, lhs, rhs),
    })
}

/// `lhs * numerator / denominator`, with the intermediate product checked
fn mul_div_raw(lhs: u128, numerator: u128, denominator: u128, operation: &str) -> Result<u128> {
    let product = mul_raw(lhs, numerator, operation)?;
    div_raw(product, denominator, operation)
}

/// `lhs * numerator / denominator`, rounded up
fn mul_div_ceil_raw(lhs: u128, numerator: u128, denominator: u128, operation: &str) -> Result<u128> {
    let product = mul_raw(lhs, numerator, operation)?;
    let quotient = div_raw(product, denominator, operation)?;
    if product % denominator == 0 {
        Ok(quotient)
    } else {
        add_raw(quotient, 1, operation)
    }
}

fn format_scaled(f: &mut fmt::Formatter<'_>, raw: u128, scale: u128) -> fmt::Result {
    write!(f, "{}.{:0width$}", raw / scale, raw % scale, width = DECIMALS)
}

/// Parse a non-negative decimal string into raw units. Digits beyond the
/// eighth fractional place are truncated.
fn parse_scaled(s: &str, scale: u128) -> Result<u128> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(TokenomicsError::invalid_input(format!("not a decimal: {:?}", s)));
    }
    let digits_ok = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !digits_ok(whole) || !digits_ok(frac) {
        return Err(TokenomicsError::invalid_input(format!("not a decimal: {:?}", s)));
    }

    let whole_value = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| TokenomicsError::invalid_input(format!("out of range: {:?}", s)))?
    };

    let mut frac_digits: String = frac.chars().take(DECIMALS).collect();
    while frac_digits.len() < DECIMALS {
        frac_digits.push('0');
    }
    let frac_value = frac_digits
        .parse::<u128>()
        .map_err(|_| TokenomicsError::invalid_input(format!("not a decimal: {:?}", s)))?;

    add_raw(mul_raw(whole_value, scale, "parse decimal")?, frac_value, "parse decimal")
}

/// Token quantity in e8s
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn from_e8s(e8s: u128) -> Self {
        Self(e8s)
    }

    /// Whole tokens to e8s. A `u64` token count always fits.
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * E8S)
    }

    pub const fn e8s(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whole-token part, truncated
    pub const fn whole_tokens(self) -> u128 {
        self.0 / E8S
    }

    pub fn try_add(self, rhs: Amount, operation: &str) -> Result<Amount> {
        add_raw(self.0, rhs.0, operation).map(Amount)
    }

    pub fn try_sub(self, rhs: Amount, operation: &str) -> Result<Amount> {
        sub_raw(self.0, rhs.0, operation).map(Amount)
    }

    /// Multiply by a plain integer factor
    pub fn try_mul(self, factor: u128, operation: &str) -> Result<Amount> {
        mul_raw(self.0, factor, operation).map(Amount)
    }

    /// Divide by a plain integer divisor, truncating
    pub fn try_div(self, divisor: u128, operation: &str) -> Result<Amount> {
        div_raw(self.0, divisor, operation).map(Amount)
    }

    /// `self * numerator / denominator`, truncating. Fails with
    /// `MultiplicationOverflow` when the intermediate product does not fit.
    pub fn mul_div(self, numerator: Amount, denominator: Amount, operation: &str) -> Result<Amount> {
        mul_div_raw(self.0, numerator.0, denominator.0, operation).map(Amount)
    }

    /// `self * numerator / denominator`, rounded up. Never zero for a
    /// non-zero product.
    pub fn mul_div_ceil(self, numerator: Amount, denominator: Amount, operation: &str) -> Result<Amount> {
        mul_div_ceil_raw(self.0, numerator.0, denominator.0, operation).map(Amount)
    }

    /// Lossy conversion for charting only
    pub fn to_tokens_f64(self) -> f64 {
        self.0 as f64 / E8S as f64
    }
}

impl From<u64> for Amount {
    fn from(e8s: u64) -> Self {
        Self(e8s as u128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_scaled(f, self.0, E8S)
    }
}

impl FromStr for Amount {
    type Err = TokenomicsError;

    /// Parses whole tokens with up to eight decimals, e.g. `"1.5"`
    fn from_str(s: &str) -> Result<Self> {
        parse_scaled(s, E8S).map(Amount)
    }
}

/// USD value with eight decimal places
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsdValue(u128);

impl UsdValue {
    pub const ZERO: UsdValue = UsdValue(0);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents as u128 * (USD_SCALE / 100))
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn try_add(self, rhs: UsdValue, operation: &str) -> Result<UsdValue> {
        add_raw(self.0, rhs.0, operation).map(UsdValue)
    }

    pub fn try_sub(self, rhs: UsdValue, operation: &str) -> Result<UsdValue> {
        sub_raw(self.0, rhs.0, operation).map(UsdValue)
    }

    /// `self * numerator / denominator` for a per-unit price scaled by a
    /// ratio of token amounts, truncating.
    pub fn mul_div(self, numerator: Amount, denominator: Amount, operation: &str) -> Result<UsdValue> {
        mul_div_raw(self.0, numerator.e8s(), denominator.e8s(), operation).map(UsdValue)
    }

    /// Value of `amount` tokens at `self` per whole token, truncating
    pub fn times_tokens(self, amount: Amount, operation: &str) -> Result<UsdValue> {
        mul_div_raw(self.0, amount.e8s(), E8S, operation).map(UsdValue)
    }

    /// Lossy conversion for charting only
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / USD_SCALE as f64
    }
}

impl fmt::Display for UsdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_scaled(f, self.0, USD_SCALE)
    }
}

impl FromStr for UsdValue {
    type Err = TokenomicsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        parse_scaled(s, USD_SCALE).map(UsdValue)
    }
}

// Decimal strings keep the exact value across JSON and TOML.
impl Serialize for UsdValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UsdValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
