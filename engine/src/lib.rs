//! plinko Engine - exact RTP verification for peg-board payout games
//!
//! A token falls through `rows` binary left/right decisions and lands in the
//! bucket indexed by its number of left decisions. This crate computes the
//! exact bucket distribution with arbitrary-precision decimals and the
//! resulting Return To Player of a multiplier table.
//!
//! The engine is pure: no I/O, no global state, no embedded game tables.

pub mod binomial;
pub mod configuration;
pub mod decimal;
pub mod error;
pub mod fixtures;
pub mod rtp;

pub use binomial::{binomial_coefficient, probability, validate_bias, Pmf, ProbabilityEngine};
pub use configuration::Configuration;
pub use decimal::{parse_decimal, Precision};
pub use error::{InvalidInput, Result};
pub use rtp::{
    default_tolerance, evaluate, AnomalyKind, BucketContribution, Classification, DistributionAnomaly,
    RtpEvaluator, RtpResult,
};
