//! Board configuration value object
//!
//! A configuration is the row count, the left-decision bias and one multiplier
//! per bucket. It carries no game-specific defaults; tables are supplied by
//! the caller (usually a catalog).

use crate::binomial::validate_bias;
use crate::decimal::parse_decimal;
use crate::error::{InvalidInput, Result};
use bigdecimal::BigDecimal;
use num_traits::Zero;

/// Immutable `(rows, bias, multipliers)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    rows: u32,
    bias: BigDecimal,
    multipliers: Vec<BigDecimal>,
}

impl Configuration {
    /// Create a configuration, requiring exactly `rows + 1` multipliers.
    pub fn new(rows: u32, bias: BigDecimal, multipliers: Vec<BigDecimal>) -> Result<Self> {
        let expected = rows as usize + 1;
        if multipliers.len() != expected {
            return Err(InvalidInput::TableLengthMismatch {
                len: multipliers.len(),
                expected,
            });
        }
        Self::with_unverified_table(rows, bias, multipliers)
    }

    /// Create a configuration without checking the table length.
    ///
    /// Every other check still applies. Evaluating such a configuration
    /// visits only the buckets the table covers, which surfaces a short
    /// table as a distribution anomaly instead of an error.
    pub fn with_unverified_table(
        rows: u32,
        bias: BigDecimal,
        multipliers: Vec<BigDecimal>,
    ) -> Result<Self> {
        if rows == 0 {
            return Err(InvalidInput::NoRows);
        }
        validate_bias(&bias)?;
        if let Some((bucket, value)) = multipliers
            .iter()
            .enumerate()
            .find(|(_, m)| **m < BigDecimal::zero())
        {
            return Err(InvalidInput::NegativeMultiplier {
                bucket,
                value: value.to_string(),
            });
        }
        Ok(Configuration { rows, bias, multipliers })
    }

    /// Build a configuration from decimal literals.
    pub fn parse(rows: u32, bias: &str, multipliers: &[&str]) -> Result<Self> {
        let bias = parse_decimal(bias)?;
        let multipliers = multipliers
            .iter()
            .map(|m| parse_decimal(m))
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows, bias, multipliers)
    }

    /// Number of rows of pegs
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Probability of a single left decision
    pub fn bias(&self) -> &BigDecimal {
        &self.bias
    }

    /// Multipliers indexed by bucket (number of left decisions)
    pub fn multipliers(&self) -> &[BigDecimal] {
        &self.multipliers
    }

    /// Number of buckets a well-formed table has
    pub fn bucket_count(&self) -> usize {
        self.rows as usize + 1
    }

    /// Check if the table has exactly one multiplier per bucket
    pub fn is_well_formed(&self) -> bool {
        self.multipliers.len() == self.bucket_count()
    }
}
