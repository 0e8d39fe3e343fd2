//! # datakit
//!
//! Numerically robust aggregate statistics over `f64` samples.
//!
//! Sums, products, means, covariances, and standard deviations computed
//! with compensated arithmetic, so rounding error does not pile up over
//! long inputs and centering avoids catastrophic cancellation.
//!
//! ## Modules
//!
//! - [`eft`]: error-free transformations (Dekker split, two-product, two-sum)
//! - [`stats`]: compensated sum/product/mean, extrema, mean-shifted
//!   covariance, variance, standard deviation, approximate comparison
//! - [`regression`]: least-squares line fit built on [`stats`]
//! - [`sequence`]: `seq`/`rep` sample builders
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Kahan summation, compensated products,
//!   two-pass mean-shifted covariance
//! - **Pure functions**: no state, no I/O; slice order is accumulation order
//! - **Explicit failure**: empty or mismatched input is a [`StatsError`],
//!   never a silent `NaN`
//! - **Property-based testing**: accuracy bounds verified via proptest

pub mod eft;
pub mod error;
pub mod regression;
pub mod sequence;
pub mod stats;

pub use error::StatsError;
pub use regression::LinearRegression;
pub use sequence::{rep, seq, MAX_SEQ_LEN};
pub use stats::{
    approx_eq, approx_eq_with, covariance, covariance_with, max, mean, min, product, std_dev,
    std_dev_with, sum, variance, variance_with, CovariancePolicy, KahanAccumulator, Tolerance,
};
