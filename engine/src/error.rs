//! Error taxonomy for the engine
//!
//! Only malformed input can make a computation fail. A probability mass that
//! does not sum to one is not an error here: it is reported as a
//! [`DistributionAnomaly`](crate::rtp::DistributionAnomaly) on the result.

use thiserror::Error;

/// Malformed arguments to the probability engine or a malformed configuration.
///
/// Always aborts the single evaluation it pertains to; never corrected silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("bucket {bucket} is outside [0, {rows}]")]
    BucketOutOfRange { bucket: u32, rows: u32 },

    #[error("bias {0} is outside the open interval (0, 1)")]
    BiasOutOfRange(String),

    #[error("a board needs at least one row")]
    NoRows,

    #[error("multiplier table has {len} buckets, expected rows + 1 = {expected}")]
    TableLengthMismatch { len: usize, expected: usize },

    #[error("multiplier {value} at bucket {bucket} is negative")]
    NegativeMultiplier { bucket: usize, value: String },

    #[error("working precision of {requested} digits is below the minimum of {minimum}")]
    PrecisionTooLow { requested: u64, minimum: u64 },

    #[error("tolerance {0} must be positive")]
    NonPositiveTolerance(String),

    #[error("cannot parse decimal literal '{0}'")]
    Literal(String),
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, InvalidInput>;
