//! Aggregate statistics with compensated arithmetic.
//!
//! Every reduction in this module tracks the rounding error it commits and
//! feeds it back, so accuracy does not degrade with the length of the
//! sample the way a plain accumulate-in-a-loop does.
//!
//! # Algorithms
//!
//! - **Sum**: Kahan compensated summation. Error bounded by
//!   `2ε·Σ|xᵢ| + O(nε²)·Σ|xᵢ|`, independent of `n` to first order.
//!   Reference: Kahan (1965), "Further Remarks on Reducing Truncation
//!   Errors", *Communications of the ACM* 8(1).
//! - **Product**: compensated product built on [`two_product`].
//!   Reference: Graillat (2009), "Accurate Floating-Point Product and
//!   Exponentiation", *IEEE Transactions on Computers* 58(7).
//! - **Mean**: compensated product of the compensated sum and `1/n`.
//! - **Covariance/Variance/StdDev**: two-pass mean-shifted estimator,
//!   avoiding the cancellation of `E[XY] − E[X]E[Y]`.
//!
//! Iteration is always in slice order. Re-running any function on the same
//! slice gives a bit-identical result.

use log::{debug, warn};

use crate::eft::{two_product, two_sum, CompensatedFloat};
use crate::error::StatsError;

// ---------------------------------------------------------------------------
// Approximate comparison
// ---------------------------------------------------------------------------

/// Absolute and relative tolerance for [`approx_eq_with`].
///
/// The defaults (`atol = 1e-8`, `rtol = 1e-5`) match NumPy's `isclose`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Tolerance {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            atol: 1e-8,
            rtol: 1e-5,
        }
    }
}

/// Returns true if `actual` is within the default [`Tolerance`] of `expected`.
///
/// # Examples
/// ```
/// use datakit::stats::approx_eq;
/// assert!(approx_eq(0.0, 1e-15));
/// assert!(!approx_eq(0.0, 1e-5));
/// ```
pub fn approx_eq(actual: f64, expected: f64) -> bool {
    approx_eq_with(actual, expected, Tolerance::default())
}

/// Returns true iff `|actual − expected| <= atol + rtol·|expected|`.
///
/// The relative term scales with `expected` only, so the comparison is not
/// symmetric: near the boundary, swapping the arguments can flip the result.
pub fn approx_eq_with(actual: f64, expected: f64, tol: Tolerance) -> bool {
    (actual - expected).abs() <= tol.atol + tol.rtol * expected.abs()
}

// ---------------------------------------------------------------------------
// Kahan compensated summation
// ---------------------------------------------------------------------------

/// Sums `data` with Kahan compensated summation.
///
/// # Algorithm
/// Keeps a running compensation `c` holding the low-order bits lost by the
/// previous addition and subtracts it from the next term:
/// ```text
/// y = x − c;  t = s + y;  c = (t − s) − y;  s = t
/// ```
/// The result is the running sum `s`; the pending `c` only ever corrects
/// the next term.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// `0.0` for an empty slice; the element itself for a single element.
///
/// # Examples
/// ```
/// use datakit::stats::sum;
/// let nums: Vec<f64> = (0_u32..=10_000).map(f64::from).collect();
/// assert_eq!(sum(&nums), 50_005_000.0);
/// ```
pub fn sum(data: &[f64]) -> f64 {
    data.iter().copied().collect::<KahanAccumulator>().total()
}

/// Streaming form of [`sum`].
///
/// Two accumulators built over consecutive chunks of a sample can be
/// combined with [`merge`](Self::merge), which keeps the accuracy class of
/// a single sequential pass. This is what allows a caller to reduce chunks
/// independently (on separate threads, say) and combine the partials.
///
/// # Examples
/// ```
/// use datakit::stats::{sum, KahanAccumulator};
/// let data = [0.1, 0.2, 0.3, 0.4];
/// let mut left: KahanAccumulator = data[..2].iter().copied().collect();
/// let right: KahanAccumulator = data[2..].iter().copied().collect();
/// left.merge(&right);
/// assert!((left.total() - sum(&data)).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KahanAccumulator {
    sum: f64,
    compensation: f64,
}

impl KahanAccumulator {
    /// Creates an accumulator holding zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one term.
    #[inline]
    pub fn add(&mut self, x: f64) {
        let y = x - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// Folds the terms seen by `other` into `self`.
    ///
    /// The running sums are combined with [`two_sum`] so the rounding error
    /// of the combination joins the pending compensations instead of being
    /// dropped. The merged compensation corrects the next [`add`](Self::add).
    pub fn merge(&mut self, other: &KahanAccumulator) {
        let s = two_sum(self.sum, other.sum);
        self.sum = s.value;
        self.compensation = (self.compensation + other.compensation) - s.err;
    }

    /// Returns the compensated running sum of all terms seen so far.
    pub fn total(&self) -> f64 {
        self.sum
    }
}

impl Extend<f64> for KahanAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl FromIterator<f64> for KahanAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

// ---------------------------------------------------------------------------
// Compensated product and mean
// ---------------------------------------------------------------------------

/// Multiplies `data` together, tracking every rounding error with
/// [`two_product`].
///
/// # Algorithm
/// Seeds `p = x₀`, `e = 0`, then for each following `x`:
/// ```text
/// (p, π) = TwoProduct(p, x)
/// e      = e·x + π
/// ```
/// and returns `p + e`. The result is as accurate as if computed in twice
/// the working precision and then rounded.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Errors
/// [`StatsError::EmptySample`] if `data` is empty.
///
/// # Examples
/// ```
/// use datakit::stats::product;
/// let xs: Vec<f64> = (1_u32..=10).map(f64::from).collect();
/// assert_eq!(product(&xs).unwrap(), 3_628_800.0);
/// assert!(product(&[]).is_err());
/// ```
pub fn product(data: &[f64]) -> Result<f64, StatsError> {
    let (&first, rest) = data
        .split_first()
        .ok_or(StatsError::EmptySample { op: "product" })?;
    Ok(compensated_product(first, rest))
}

fn compensated_product(first: f64, rest: &[f64]) -> f64 {
    let mut p = first;
    let mut e = 0.0_f64;
    for &x in rest {
        let step = two_product(p, x);
        p = step.value;
        e = e * x + step.err;
    }
    f64::from(CompensatedFloat::new(p, e))
}

/// Computes the arithmetic mean as `product([sum(data), 1/n])`.
///
/// Multiplying by the reciprocal through the compensated product keeps the
/// scaling step from adding a second uncompensated rounding.
///
/// # Errors
/// [`StatsError::EmptySample`] if `data` is empty. The check runs before the
/// reciprocal is formed, so no `inf` or `NaN` is produced.
///
/// # Examples
/// ```
/// use datakit::stats::mean;
/// assert_eq!(mean(&[-10.0, 15.0, 25.0, 0.0, -5.0]).unwrap(), 5.0);
/// ```
pub fn mean(data: &[f64]) -> Result<f64, StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptySample { op: "mean" });
    }
    Ok(mean_of_non_empty(data))
}

fn mean_of_non_empty(data: &[f64]) -> f64 {
    compensated_product(sum(data), &[1.0 / data.len() as f64])
}

// ---------------------------------------------------------------------------
// Extrema
// ---------------------------------------------------------------------------

/// Returns the smallest element. NaN elements are ignored unless every
/// element is NaN.
///
/// # Examples
/// ```
/// use datakit::stats::min;
/// assert_eq!(min(&[10.0, -2.0, 23.0]).unwrap(), -2.0);
/// ```
pub fn min(data: &[f64]) -> Result<f64, StatsError> {
    data.iter()
        .copied()
        .reduce(f64::min)
        .ok_or(StatsError::EmptySample { op: "min" })
}

/// Returns the largest element. NaN handling matches [`min`].
pub fn max(data: &[f64]) -> Result<f64, StatsError> {
    data.iter()
        .copied()
        .reduce(f64::max)
        .ok_or(StatsError::EmptySample { op: "max" })
}

// ---------------------------------------------------------------------------
// Mean-shifted covariance
// ---------------------------------------------------------------------------

/// How the covariance family treats samples with fewer than two
/// observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovariancePolicy {
    /// Return `0.0`.
    #[default]
    Lenient,
    /// Fail with [`StatsError::TooFewObservations`].
    Strict,
}

/// Computes the sample covariance of two index-aligned samples.
///
/// # Formula
/// ```text
/// Cov(X, Y) = Σ (xᵢ − x̄)(yᵢ − ȳ) / (n − 1)
/// ```
///
/// # Algorithm
/// Two passes. The first computes `x̄` and `ȳ` with [`mean`]; the second
/// centers each pair before multiplying and reduces the scaled
/// cross-products with Kahan summation. Centering first avoids the
/// catastrophic cancellation of the raw-moment formula `E[XY] − E[X]E[Y]`
/// when the data sit far from zero.
///
/// Fewer than two observations yield `0.0` (see [`CovariancePolicy`]).
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Errors
/// [`StatsError::LengthMismatch`] if `x.len() != y.len()`.
///
/// # Examples
/// ```
/// use datakit::stats::covariance;
/// let x = [-10.0, -5.0, 0.0, 5.0, 10.0];
/// let y = [0.0, 10.0, 20.0, 30.0, 40.0];
/// assert_eq!(covariance(&x, &y).unwrap(), 125.0);
/// assert_eq!(covariance(&[1.0], &[2.0]).unwrap(), 0.0);
/// ```
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    covariance_with(x, y, CovariancePolicy::Lenient)
}

/// [`covariance`] with an explicit policy for `n < 2`.
///
/// # Errors
/// [`StatsError::LengthMismatch`] on unequal lengths;
/// [`StatsError::TooFewObservations`] when `n < 2` under
/// [`CovariancePolicy::Strict`].
pub fn covariance_with(x: &[f64], y: &[f64], policy: CovariancePolicy) -> Result<f64, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 && policy == CovariancePolicy::Strict {
        return Err(StatsError::TooFewObservations {
            required: 2,
            actual: x.len(),
        });
    }
    Ok(mean_shifted_covariance(x, y))
}

// Callers guarantee equal lengths. Fewer than two observations yield 0.
fn mean_shifted_covariance(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 {
        debug!("covariance over {} observation(s) is undefined; returning 0", x.len());
        return 0.0;
    }
    let mean_x = mean_of_non_empty(x);
    let mean_y = mean_of_non_empty(y);
    let denom = (x.len() - 1) as f64;
    x.iter()
        .zip(y)
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y) / denom)
        .collect::<KahanAccumulator>()
        .total()
}

/// Computes the sample variance (`n − 1` denominator) as `Cov(X, X)`.
///
/// Returns `0.0` for fewer than two observations.
///
/// # Examples
/// ```
/// use datakit::stats::variance;
/// assert_eq!(variance(&[-10.0, -5.0, 0.0, 5.0, 10.0]), 62.5);
/// ```
pub fn variance(data: &[f64]) -> f64 {
    mean_shifted_covariance(data, data)
}

/// [`variance`] with an explicit policy for `n < 2`.
pub fn variance_with(data: &[f64], policy: CovariancePolicy) -> Result<f64, StatsError> {
    covariance_with(data, data, policy)
}

/// Computes the sample standard deviation, `sqrt(variance)`.
///
/// The variance is clamped at zero first, so a tiny negative rounding
/// artifact can never turn into `NaN`.
///
/// # Examples
/// ```
/// use datakit::stats::std_dev;
/// assert_eq!(std_dev(&[0.0, 10.0, 20.0, 30.0, 40.0]), 250.0_f64.sqrt());
/// ```
pub fn std_dev(data: &[f64]) -> f64 {
    non_negative_sqrt(variance(data))
}

/// [`std_dev`] with an explicit policy for `n < 2`.
pub fn std_dev_with(data: &[f64], policy: CovariancePolicy) -> Result<f64, StatsError> {
    variance_with(data, policy).map(non_negative_sqrt)
}

fn non_negative_sqrt(var: f64) -> f64 {
    if var < 0.0 {
        warn!("clamping negative variance {var:e} to zero");
        return 0.0;
    }
    var.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    fn abs_sum(data: &[f64]) -> f64 {
        data.iter().map(|x| x.abs()).sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        // --- sum of integers is exact ---
        #[test]
        fn sum_of_integers_is_exact(ints in proptest::collection::vec(-1_000_000_i32..1_000_000, 0..200)) {
            let data: Vec<f64> = ints.iter().copied().map(f64::from).collect();
            let exact: i64 = ints.iter().copied().map(i64::from).sum();
            prop_assert_eq!(sum(&data), exact as f64);
        }

        // --- permuting changes the sum only within the compensated bound ---
        #[test]
        fn sum_permutation_bounded(data in finite_vec(1, 200), seed in 0_u64..10_000) {
            let mut shuffled = data.clone();
            shuffled.shuffle(&mut SmallRng::seed_from_u64(seed));
            let diff = (sum(&data) - sum(&shuffled)).abs();
            prop_assert!(diff <= 1e-14 * abs_sum(&data), "diff={}", diff);
        }

        // --- sum is the textbook Kahan loop, bit for bit ---
        #[test]
        fn sum_matches_kahan_loop(data in proptest::collection::vec(
            prop_oneof![-1e16_f64..1e16, -1.0_f64..1.0, -1e-8_f64..1e-8],
            0..50,
        )) {
            let (mut s, mut c) = (0.0_f64, 0.0_f64);
            for &x in &data {
                let y = x - c;
                let t = s + y;
                c = (t - s) - y;
                s = t;
            }
            prop_assert_eq!(sum(&data).to_bits(), s.to_bits());
        }

        // --- repeated reductions are bit-identical ---
        #[test]
        fn reductions_idempotent(data in finite_vec(2, 100)) {
            prop_assert_eq!(sum(&data).to_bits(), sum(&data).to_bits());
            prop_assert_eq!(mean(&data).unwrap().to_bits(), mean(&data).unwrap().to_bits());
            prop_assert_eq!(variance(&data).to_bits(), variance(&data).to_bits());
        }

        // --- merged chunks agree with the sequential pass ---
        #[test]
        fn merge_matches_sequential(data in finite_vec(0, 200), cut in 0.0_f64..1.0) {
            let k = (data.len() as f64 * cut) as usize;
            let mut left: KahanAccumulator = data[..k].iter().copied().collect();
            let right: KahanAccumulator = data[k..].iter().copied().collect();
            left.merge(&right);
            let diff = (left.total() - sum(&data)).abs();
            prop_assert!(diff <= 1e-14 * abs_sum(&data), "diff={}", diff);
        }

        // --- permuting changes the product only within the compensated bound ---
        #[test]
        fn product_permutation_bounded(
            data in proptest::collection::vec(0.5_f64..2.0, 1..50),
            seed in 0_u64..10_000,
        ) {
            let mut shuffled = data.clone();
            shuffled.shuffle(&mut SmallRng::seed_from_u64(seed));
            let a = product(&data).unwrap();
            let b = product(&shuffled).unwrap();
            prop_assert!((a - b).abs() <= 1e-14 * a.abs(), "a={} b={}", a, b);
        }

        // --- mean lies between min and max ---
        #[test]
        fn mean_within_extrema(data in finite_vec(1, 100)) {
            let m = mean(&data).unwrap();
            let slack = 1e-9;
            prop_assert!(m >= min(&data).unwrap() - slack);
            prop_assert!(m <= max(&data).unwrap() + slack);
        }

        // --- variance is non-negative and std_dev is never NaN ---
        #[test]
        fn variance_non_negative(data in finite_vec(0, 100)) {
            prop_assert!(variance(&data) >= 0.0);
            prop_assert!(!std_dev(&data).is_nan());
        }

        // --- variance of a constant is ~0 ---
        #[test]
        fn variance_of_constant(value in -1e6_f64..1e6, n in 2_usize..50) {
            let data = vec![value; n];
            prop_assert!(variance(&data) < 1e-15, "got {}", variance(&data));
        }

        // --- Cov(x, y) == Cov(y, x) exactly ---
        #[test]
        fn covariance_symmetric(pairs in proptest::collection::vec((-1e6_f64..1e6, -1e6_f64..1e6), 2..100)) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            prop_assert_eq!(covariance(&x, &y).unwrap(), covariance(&y, &x).unwrap());
        }

        // --- Cov(x, x) == Var(x) ---
        #[test]
        fn covariance_self_is_variance(data in finite_vec(0, 100)) {
            prop_assert_eq!(covariance(&data, &data).unwrap(), variance(&data));
        }

        // --- approx_eq is reflexive ---
        #[test]
        fn approx_eq_reflexive(a in -1e300_f64..1e300) {
            prop_assert!(approx_eq(a, a));
        }
    }
}
