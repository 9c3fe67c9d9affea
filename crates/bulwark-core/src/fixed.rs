//! Fixed-point price arithmetic
//!
//! Prices and ratios are scaled integers at 10^18 precision: `Fixed(10^18)`
//! is 1.0. Token amounts stay in their own base units (see `types::Amount`)
//! and cross into the price domain only through [`Fixed::scale_amount`] and
//! [`Fixed::divide_amount`].
//!
//! # Rounding
//!
//! Every division truncates toward zero. The treasury keeps the remainder
//! on all monetary divisions; do not change this to round-to-nearest.
//!
//! # Overflow
//!
//! All operations are checked and fail with [`FixedError`] instead of
//! wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::Amount;

/// Scale of the fixed-point domain: 1.0 == 10^18
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Arithmetic failure in the fixed-point domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FixedError {
    #[error("fixed-point overflow")]
    Overflow,

    #[error("fixed-point underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

/// A non-negative price or ratio at 10^18 scale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(pub u128);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(SCALE);

    /// Wrap a raw 10^18-scaled value
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw 10^18-scaled value
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Build `numerator / denominator` as a fixed-point value.
    ///
    /// `Fixed::from_ratio(8, 10)` is 0.8.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Result<Self, FixedError> {
        if denominator == 0 {
            return Err(FixedError::DivisionByZero);
        }
        let raw = numerator
            .checked_mul(SCALE)
            .ok_or(FixedError::Overflow)?
            / denominator;
        Ok(Self(raw))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Fixed) -> Result<Fixed, FixedError> {
        self.0
            .checked_add(other.0)
            .map(Fixed)
            .ok_or(FixedError::Overflow)
    }

    pub fn checked_sub(self, other: Fixed) -> Result<Fixed, FixedError> {
        self.0
            .checked_sub(other.0)
            .map(Fixed)
            .ok_or(FixedError::Underflow)
    }

    /// `self * other`, truncating
    pub fn checked_mul(self, other: Fixed) -> Result<Fixed, FixedError> {
        let wide = self.0.checked_mul(other.0).ok_or(FixedError::Overflow)?;
        Ok(Fixed(wide / SCALE))
    }

    /// `self / other`, truncating
    pub fn checked_div(self, other: Fixed) -> Result<Fixed, FixedError> {
        if other.0 == 0 {
            return Err(FixedError::DivisionByZero);
        }
        let wide = self.0.checked_mul(SCALE).ok_or(FixedError::Overflow)?;
        Ok(Fixed(wide / other.0))
    }

    /// `amount * self`, truncating: applies a ratio to a token amount.
    pub fn scale_amount(self, amount: Amount) -> Result<Amount, FixedError> {
        let wide = amount.checked_mul(self.0).ok_or(FixedError::Overflow)?;
        Ok(wide / SCALE)
    }

    /// `amount / self`, truncating: converts a cash amount to face value at
    /// this price. A deeper discount (smaller price) yields more face value.
    pub fn divide_amount(self, amount: Amount) -> Result<Amount, FixedError> {
        if self.0 == 0 {
            return Err(FixedError::DivisionByZero);
        }
        let wide = amount.checked_mul(SCALE).ok_or(FixedError::Overflow)?;
        Ok(wide / self.0)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac == 0 {
            return write!(f, "{}.0", whole);
        }
        let frac = format!("{:018}", frac);
        write!(f, "{}.{}", whole, frac.trim_end_matches('0'))
    }
}
