//! Helpers for building samples: arithmetic progressions and repetition.

use crate::error::StatsError;

/// Longest progression [`seq`] will build.
pub const MAX_SEQ_LEN: usize = 1 << 28;

/// Returns the arithmetic progression `start, start + step, …` up to `end`.
///
/// Each element is computed as `start + i·step` rather than by repeated
/// addition, so rounding does not drift along the sequence. `end` is
/// included when the progression lands on it to within a small relative
/// tolerance.
///
/// # Errors
/// - [`StatsError::NonFiniteBound`] if `start` or `end` is NaN or infinite.
/// - [`StatsError::InvalidStep`] if `step` is zero or not finite, or points
///   away from `end`.
/// - [`StatsError::SequenceTooLong`] if the progression would hold more
///   than [`MAX_SEQ_LEN`] elements.
///
/// # Examples
/// ```
/// use datakit::sequence::seq;
/// assert_eq!(seq(0.0, 1.0, 0.25).unwrap(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(seq(3.0, 1.0, -1.0).unwrap(), vec![3.0, 2.0, 1.0]);
/// ```
pub fn seq(start: f64, end: f64, step: f64) -> Result<Vec<f64>, StatsError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(StatsError::NonFiniteBound { start, end });
    }
    if !step.is_finite() || step == 0.0 || (end - start) * step < 0.0 {
        return Err(StatsError::InvalidStep { step });
    }
    // absorb the rounding in `span` so seq(0, 1, 0.1) keeps its endpoint
    let span = (end - start) / step;
    let span = (span + span.abs() * 1e-10).floor();
    // also catches an infinite span from `end - start` overflowing
    if span >= MAX_SEQ_LEN as f64 {
        return Err(StatsError::SequenceTooLong {
            requested: span,
            limit: MAX_SEQ_LEN,
        });
    }
    let count = span as usize + 1;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// Concatenates `values` with itself `times` times.
///
/// # Examples
/// ```
/// use datakit::sequence::rep;
/// assert_eq!(rep(&[1.0, 2.0], 3), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
/// ```
pub fn rep(values: &[f64], times: usize) -> Vec<f64> {
    values.repeat(times)
}
