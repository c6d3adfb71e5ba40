//! Decimal helpers: the working precision and exact powers
//!
//! Precision is a value bound to an engine, never process-wide state, so
//! evaluations at different precisions can run side by side.

use crate::error::{InvalidInput, Result};
use bigdecimal::BigDecimal;
use num_traits::One;
use std::str::FromStr;

/// Number of significant decimal digits kept by rounded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u64);

impl Precision {
    /// Lowest accepted working precision (significant digits).
    pub const MINIMUM: u64 = 50;

    /// Create a precision of `digits` significant digits.
    pub fn new(digits: u64) -> Result<Self> {
        if digits < Self::MINIMUM {
            return Err(InvalidInput::PrecisionTooLow {
                requested: digits,
                minimum: Self::MINIMUM,
            });
        }
        Ok(Precision(digits))
    }

    /// Get the number of significant digits
    pub fn digits(self) -> u64 {
        self.0
    }

    /// Round `value` to this many significant digits.
    pub fn round(self, value: &BigDecimal) -> BigDecimal {
        value.with_prec(self.0)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision(Self::MINIMUM)
    }
}

/// Parse a decimal literal such as `"0.499975"` or `"1e-4"` without going
/// through binary floating point.
pub fn parse_decimal(literal: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(literal.trim()).map_err(|_| InvalidInput::Literal(literal.to_string()))
}

/// `base^exp` by square-and-multiply. Products of finite decimals are exact,
/// so no rounding happens here.
pub(crate) fn pow_exact(base: &BigDecimal, exp: u32) -> BigDecimal {
    let mut result = BigDecimal::one();
    let mut square = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = &result * &square;
        }
        e >>= 1;
        if e > 0 {
            square = &square * &square;
        }
    }
    result
}
