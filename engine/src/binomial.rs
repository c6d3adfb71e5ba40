//! Exact Probability Engine
//!
//! Computes P(X = k) for X ~ Binomial(rows, bias), where `bias` is the
//! probability of a single "left" decision and `k` counts left decisions
//! (which is also the bucket index the token lands in).
//!
//! C(rows, k) is an exact big integer and both power terms are exact decimal
//! products; only the final probability is rounded to the engine's working
//! precision.

use crate::decimal::{pow_exact, Precision};
use crate::error::{InvalidInput, Result};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use rayon::prelude::*;

/// Exact binomial coefficient C(n, k). Requires `k <= n`.
pub fn binomial_coefficient(n: u32, k: u32) -> BigInt {
    debug_assert!(k <= n);
    let k = k.min(n - k);
    let mut c = BigInt::one();
    for i in 0..k {
        // c * (n - i) is always divisible by (i + 1)
        c = c * BigInt::from(n - i) / BigInt::from(i + 1);
    }
    c
}

/// Reject a bias outside the open interval (0, 1).
pub fn validate_bias(bias: &BigDecimal) -> Result<()> {
    if *bias <= BigDecimal::zero() || *bias >= BigDecimal::one() {
        return Err(InvalidInput::BiasOutOfRange(bias.to_string()));
    }
    Ok(())
}

/// Binomial probability engine bound to a working precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbabilityEngine {
    precision: Precision,
}

impl ProbabilityEngine {
    /// Create an engine with the given working precision
    pub fn new(precision: Precision) -> Self {
        ProbabilityEngine { precision }
    }

    /// Create an engine keeping `digits` significant digits.
    pub fn with_digits(digits: u64) -> Result<Self> {
        Precision::new(digits).map(Self::new)
    }

    /// Get the working precision
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// P(X = k) = C(rows, k) · bias^k · (1 − bias)^(rows − k)
    ///
    /// Fails with [`InvalidInput`] if `k > rows` or `bias` is not in (0, 1).
    pub fn probability(&self, rows: u32, k: u32, bias: &BigDecimal) -> Result<BigDecimal> {
        validate_bias(bias)?;
        if k > rows {
            return Err(InvalidInput::BucketOutOfRange { bucket: k, rows });
        }
        let count = BigDecimal::new(binomial_coefficient(rows, k), 0);
        let left = pow_exact(bias, k);
        let right = pow_exact(&(BigDecimal::one() - bias), rows - k);
        Ok(self.precision.round(&(count * left * right)))
    }

    /// Full probability mass function over buckets `0..=rows`.
    ///
    /// Buckets are independent, so they are computed in parallel.
    pub fn pmf(&self, rows: u32, bias: &BigDecimal) -> Result<Pmf> {
        validate_bias(bias)?;
        let probabilities = (0..=rows)
            .into_par_iter()
            .map(|k| self.probability(rows, k, bias))
            .collect::<Result<Vec<BigDecimal>>>()?;
        Ok(Pmf { rows, probabilities })
    }
}

/// Probability of landing in each bucket, indexed by bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Pmf {
    rows: u32,
    probabilities: Vec<BigDecimal>,
}

impl Pmf {
    /// Number of rows the distribution was computed for
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of buckets (always `rows + 1`)
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Check if the distribution has no buckets
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of a single bucket
    pub fn get(&self, bucket: u32) -> Option<&BigDecimal> {
        self.probabilities.get(bucket as usize)
    }

    /// `(bucket, probability)` pairs in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BigDecimal)> + '_ {
        (0u32..).zip(self.probabilities.iter())
    }

    /// Sum of all bucket probabilities, accumulated at `precision`.
    pub fn total(&self, precision: Precision) -> BigDecimal {
        self.probabilities
            .iter()
            .fold(BigDecimal::zero(), |acc, p| precision.round(&(acc + p)))
    }
}

/// P(X = k) at the default working precision.
pub fn probability(rows: u32, k: u32, bias: &BigDecimal) -> Result<BigDecimal> {
    ProbabilityEngine::default().probability(rows, k, bias)
}
