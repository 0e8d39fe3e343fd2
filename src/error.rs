//! Error type shared by the fallible statistics operations.

use thiserror::Error;

/// Reasons a statistics operation rejects its input.
///
/// Every variant is a deterministic function of the input shape and is
/// raised before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The operation has no defined value for an empty sample.
    #[error("{op} requires a non-empty sample")]
    EmptySample { op: &'static str },

    /// Paired samples must be index-aligned.
    #[error("paired samples differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Fewer observations than the estimator needs.
    #[error("at least {required} observations are required, got {actual}")]
    TooFewObservations { required: usize, actual: usize },

    /// The predictor of a regression does not vary.
    #[error("predictor has zero variance; slope is undefined")]
    ZeroVariance,

    /// A sequence step that is zero, non-finite, or points away from the end.
    #[error("invalid sequence step {step}")]
    InvalidStep { step: f64 },

    /// A sequence bound that is NaN or infinite.
    #[error("sequence bounds must be finite, got {start}..={end}")]
    NonFiniteBound { start: f64, end: f64 },

    /// A sequence longer than the crate will materialize.
    #[error("sequence of about {requested:e} elements exceeds the limit of {limit}")]
    SequenceTooLong { requested: f64, limit: usize },
}
