//! RTP Aggregator: expected payout of a configuration
//!
//! RTP = Σ P(bucket i) · multiplier[i] over every bucket the table covers.
//! The total probability mass is accumulated alongside so a mis-sized table
//! or a bias/row mismatch shows up as a [`DistributionAnomaly`] instead of a
//! silently misleading RTP.

use crate::binomial::ProbabilityEngine;
use crate::configuration::Configuration;
use crate::error::{InvalidInput, Result};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Default tolerance on |total probability − 1|: 1e-4.
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::new(BigInt::one(), 4)
}

/// One bucket's share of the RTP.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketContribution {
    pub bucket: u32,
    pub probability: BigDecimal,
    pub multiplier: BigDecimal,
    /// probability × multiplier
    pub contribution: BigDecimal,
}

/// Why a result's probability mass cannot be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// The multiplier table covers fewer than `rows + 1` buckets
    MissingBuckets { covered: usize, expected: usize },
    /// Every bucket is covered but the mass is off by more than the tolerance
    MassDeviation,
}

/// The visited buckets do not carry the whole probability mass.
///
/// Raised for every table shorter than `rows + 1`, however small the missing
/// mass, and for any deviation from 1 beyond the tolerance. Diagnostic only:
/// the RTP is still returned alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionAnomaly {
    pub kind: AnomalyKind,
    pub total_probability: BigDecimal,
    pub deviation: BigDecimal,
    pub tolerance: BigDecimal,
}

/// House-edge verdict for an RTP value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// RTP <= 1: the operator keeps value on average
    HouseEdge,
    /// RTP > 1: the player wins on average; must never ship
    PlayerAdvantage,
}

impl Classification {
    /// Classify an RTP value
    pub fn of(rtp: &BigDecimal) -> Self {
        if *rtp > BigDecimal::one() {
            Classification::PlayerAdvantage
        } else {
            Classification::HouseEdge
        }
    }

    /// Check if the player has the edge
    pub fn is_player_advantage(self) -> bool {
        self == Classification::PlayerAdvantage
    }
}

/// Outcome of evaluating one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RtpResult {
    rows: u32,
    rtp: BigDecimal,
    total_probability: BigDecimal,
    contributions: Vec<BucketContribution>,
    anomaly: Option<DistributionAnomaly>,
}

impl RtpResult {
    /// Row count of the evaluated configuration
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Expected payout per unit wagered
    pub fn rtp(&self) -> &BigDecimal {
        &self.rtp
    }

    /// Sum of the probabilities of every visited bucket
    pub fn total_probability(&self) -> &BigDecimal {
        &self.total_probability
    }

    /// Per-bucket breakdown in bucket order
    pub fn contributions(&self) -> &[BucketContribution] {
        &self.contributions
    }

    /// Set when the table is short or the probability mass is off by more
    /// than the tolerance
    pub fn anomaly(&self) -> Option<&DistributionAnomaly> {
        self.anomaly.as_ref()
    }

    /// Check if a distribution anomaly was flagged
    pub fn has_anomaly(&self) -> bool {
        self.anomaly.is_some()
    }

    /// 1 − RTP
    pub fn house_edge(&self) -> BigDecimal {
        BigDecimal::one() - &self.rtp
    }

    /// Get the house-edge verdict for this RTP
    pub fn classification(&self) -> Classification {
        Classification::of(&self.rtp)
    }
}

/// Evaluates configurations with a probability engine and an anomaly tolerance.
#[derive(Debug, Clone)]
pub struct RtpEvaluator {
    engine: ProbabilityEngine,
    tolerance: BigDecimal,
}

impl Default for RtpEvaluator {
    fn default() -> Self {
        Self::new(ProbabilityEngine::default())
    }
}

impl RtpEvaluator {
    /// Create an evaluator using the default tolerance.
    pub fn new(engine: ProbabilityEngine) -> Self {
        RtpEvaluator {
            engine,
            tolerance: default_tolerance(),
        }
    }

    /// Replace the anomaly tolerance. Must be positive.
    pub fn with_tolerance(mut self, tolerance: BigDecimal) -> Result<Self> {
        if tolerance <= BigDecimal::zero() {
            return Err(InvalidInput::NonPositiveTolerance(tolerance.to_string()));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Get the probability engine
    pub fn engine(&self) -> &ProbabilityEngine {
        &self.engine
    }

    /// Get the tolerance on |total probability − 1|
    pub fn tolerance(&self) -> &BigDecimal {
        &self.tolerance
    }

    /// Evaluate a single configuration.
    ///
    /// Visits buckets `0..multipliers.len()`. A table longer than `rows + 1`
    /// fails with [`InvalidInput::BucketOutOfRange`]; a shorter one is
    /// evaluated and always flagged with [`AnomalyKind::MissingBuckets`].
    pub fn evaluate(&self, config: &Configuration) -> Result<RtpResult> {
        let rows = config.rows();
        if config.multipliers().len() > config.bucket_count() {
            return Err(InvalidInput::BucketOutOfRange { bucket: rows + 1, rows });
        }
        let precision = self.engine.precision();
        let pmf = self.engine.pmf(rows, config.bias())?;

        let mut rtp = BigDecimal::zero();
        let mut total_probability = BigDecimal::zero();
        let mut contributions = Vec::with_capacity(config.multipliers().len());
        for ((bucket, probability), multiplier) in pmf.iter().zip(config.multipliers()) {
            let contribution = precision.round(&(probability * multiplier));
            rtp = precision.round(&(rtp + &contribution));
            total_probability = precision.round(&(total_probability + probability));
            contributions.push(BucketContribution {
                bucket,
                probability: probability.clone(),
                multiplier: multiplier.clone(),
                contribution,
            });
        }

        let deviation = (total_probability.clone() - BigDecimal::one()).abs();
        let covered = config.multipliers().len();
        let expected = config.bucket_count();
        let kind = if covered < expected {
            Some(AnomalyKind::MissingBuckets { covered, expected })
        } else if deviation > self.tolerance {
            Some(AnomalyKind::MassDeviation)
        } else {
            None
        };
        let anomaly = kind.map(|kind| {
            warn!(
                ?kind,
                rows,
                total_probability = %total_probability,
                tolerance = %self.tolerance,
                "probability mass does not sum to 1"
            );
            DistributionAnomaly {
                kind,
                total_probability: total_probability.clone(),
                deviation: deviation.clone(),
                tolerance: self.tolerance.clone(),
            }
        });

        let result = RtpResult {
            rows,
            rtp,
            total_probability,
            contributions,
            anomaly,
        };
        if result.classification().is_player_advantage() {
            warn!(rows, rtp = %result.rtp, "configuration gives the player an advantage");
        }
        debug!(
            rows,
            precision = precision.digits(),
            rtp = %result.rtp,
            "evaluated configuration"
        );
        Ok(result)
    }

    /// Evaluate independent configurations in parallel.
    ///
    /// Results keep the input order; an invalid configuration only fails its
    /// own entry.
    pub fn evaluate_batch(&self, configs: &[Configuration]) -> Vec<Result<RtpResult>> {
        configs.par_iter().map(|config| self.evaluate(config)).collect()
    }
}

/// Evaluate a configuration at the default precision and tolerance.
pub fn evaluate(config: &Configuration) -> Result<RtpResult> {
    RtpEvaluator::default().evaluate(config)
}
