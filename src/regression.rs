//! Simple least-squares linear regression on top of the compensated
//! statistics in [`crate::stats`].
//!
//! # Formula
//! ```text
//! slope     = Cov(X, Y) / Var(X)
//! intercept = ȳ − slope · x̄
//! ```

use log::trace;

use crate::error::StatsError;
use crate::stats::{covariance_with, max, mean, min, variance, CovariancePolicy};

/// A fitted line `y = slope · x + intercept`.
///
/// # Examples
/// ```
/// use datakit::regression::LinearRegression;
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [3.0, 5.0, 7.0, 9.0, 11.0];
/// let fit = LinearRegression::fit(&x, &y).unwrap();
/// assert_eq!(fit.slope(), 2.0);
/// assert_eq!(fit.intercept(), 1.0);
/// assert_eq!(fit.predict(10.0), 21.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
}

impl LinearRegression {
    /// Fits a line to the index-aligned samples `x` and `y`.
    ///
    /// # Errors
    /// - [`StatsError::LengthMismatch`] if the samples differ in length.
    /// - [`StatsError::TooFewObservations`] with fewer than two points.
    /// - [`StatsError::ZeroVariance`] if every `x` is the same.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, StatsError> {
        let cov_xy = covariance_with(x, y, CovariancePolicy::Strict)?;
        let var_x = variance(x);
        if var_x == 0.0 {
            return Err(StatsError::ZeroVariance);
        }
        let slope = cov_xy / var_x;
        let intercept = mean(y)? - slope * mean(x)?;
        trace!(
            "fitted line over {} points: slope={slope}, intercept={intercept}",
            x.len()
        );
        Ok(Self { slope, intercept })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Evaluates the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Returns the line evaluated at the smallest and largest of `x`, the
    /// two points needed to draw it over the data range.
    ///
    /// # Errors
    /// [`StatsError::EmptySample`] if `x` is empty.
    pub fn endpoints(&self, x: &[f64]) -> Result<[(f64, f64); 2], StatsError> {
        let lo = min(x)?;
        let hi = max(x)?;
        Ok([(lo, self.predict(lo)), (hi, self.predict(hi))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::approx_eq;

    #[test]
    fn test_fit_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [3.0, 5.0, 7.0, 9.0, 11.0];
        let fit = LinearRegression::fit(&x, &y).unwrap();
        assert_eq!(fit.slope(), 2.0);
        assert_eq!(fit.intercept(), 1.0);
    }

    #[test]
    fn test_fit_negative_slope() {
        let x = [-10.0, -5.0, 0.0, 5.0, 10.0];
        let y: Vec<f64> = x.iter().map(|v| -0.5 * v + 4.0).collect();
        let fit = LinearRegression::fit(&x, &y).unwrap();
        assert!(approx_eq(fit.slope(), -0.5));
        assert!(approx_eq(fit.intercept(), 4.0));
    }

    #[test]
    fn test_fit_noisy_data() {
        // Σdxdy = 14, Σdx² = 5
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.5, 2.5, 6.5, 8.5];
        let fit = LinearRegression::fit(&x, &y).unwrap();
        assert!(approx_eq(fit.slope(), 2.8), "slope={}", fit.slope());
        assert!(approx_eq(fit.intercept(), 0.3), "intercept={}", fit.intercept());
    }

    #[test]
    fn test_endpoints() {
        let x = [3.0, 1.0, 2.0];
        let y = [6.0, 2.0, 4.0];
        let fit = LinearRegression::fit(&x, &y).unwrap();
        let [(x0, y0), (x1, y1)] = fit.endpoints(&x).unwrap();
        assert_eq!((x0, x1), (1.0, 3.0));
        assert!(approx_eq(y0, 2.0));
        assert!(approx_eq(y1, 6.0));
        assert!(fit.endpoints(&[]).is_err());
    }

    #[test]
    fn test_fit_errors() {
        assert_eq!(
            LinearRegression::fit(&[1.0, 2.0], &[1.0]),
            Err(StatsError::LengthMismatch { left: 2, right: 1 })
        );
        assert_eq!(
            LinearRegression::fit(&[1.0], &[1.0]),
            Err(StatsError::TooFewObservations {
                required: 2,
                actual: 1
            })
        );
        assert_eq!(
            LinearRegression::fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(StatsError::ZeroVariance)
        );
    }
}
