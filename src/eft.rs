//! Error-free transformations (EFT) on `f64`.
//!
//! An error-free transformation returns both the rounded result of a
//! floating-point operation and the exact rounding error it committed, so
//! that `value + err` equals the real-number result with no loss.
//!
//! # Algorithms
//!
//! - **Split**: Veltkamp/Dekker splitting of a double into two halves of at
//!   most 26 significant bits each.
//!   Reference: Dekker (1971), "A Floating-Point Technique for Extending the
//!   Available Precision", *Numerische Mathematik* 18(3).
//! - **TwoProduct**: Dekker's product EFT built on Split. No FMA is needed.
//! - **TwoSum**: Knuth's branch-free addition EFT.
//!   Reference: Knuth (1997), *TAOCP* Vol. 2, §4.2.2, Theorem B.
//!
//! All of these assume finite inputs and no overflow or underflow in the
//! intermediate products. Outside that range the identities do not hold.

/// Veltkamp splitting constant `2^27 + 1` for binary64 (53-bit significand).
const SPLITTER: f64 = 134_217_729.0;

/// A rounded value paired with the rounding error committed producing it.
///
/// The exact result is `value + err`. Converting into `f64` folds the
/// error back into the value.
///
/// # Examples
/// ```
/// use datakit::eft::CompensatedFloat;
/// let c = CompensatedFloat::new(1.0, 1e-20);
/// assert_eq!(f64::from(c), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompensatedFloat {
    pub value: f64,
    pub err: f64,
}

impl CompensatedFloat {
    pub fn new(value: f64, err: f64) -> Self {
        Self { value, err }
    }
}

impl From<CompensatedFloat> for f64 {
    fn from(c: CompensatedFloat) -> Self {
        c.value + c.err
    }
}

/// Splits `v` into `(hi, lo)` with `hi + lo == v` exactly.
///
/// `hi` carries the upper half of the significand, `lo` the rest, so the
/// product of two `hi`/`lo` halves is exactly representable.
///
/// # Algorithm
/// ```text
/// c  = (2^27 + 1) · v
/// hi = c − (c − v)
/// lo = v − hi
/// ```
///
/// The result is meaningless for NaN, infinities, or `|v|` large enough for
/// `c` to overflow (above roughly `1e300`).
///
/// # Examples
/// ```
/// use datakit::eft::split;
/// let v = 0.1_f64;
/// let (hi, lo) = split(v);
/// assert_eq!(hi + lo, v);
/// ```
#[inline]
pub fn split(v: f64) -> (f64, f64) {
    let c = SPLITTER * v;
    let hi = c - (c - v);
    let lo = v - hi;
    (hi, lo)
}

/// Returns `a · b` rounded, together with the exact error of that rounding.
///
/// # Algorithm
/// `p = a · b`, then with `(a_hi, a_lo) = split(a)` and
/// `(b_hi, b_lo) = split(b)`:
/// ```text
/// e = a_lo·b_lo − (((p − a_hi·b_hi) − a_lo·b_hi) − a_hi·b_lo)
/// ```
/// Every partial product is exact, so `p + e == a · b` in real arithmetic.
///
/// Reference: Ogita, Rump & Oishi (2005), "Accurate Sum and Dot Product",
/// *SIAM J. Sci. Comput.* 26(6), Algorithm 3.3.
///
/// # Examples
/// ```
/// use datakit::eft::two_product;
/// let r = two_product(0.1, 0.1);
/// assert_eq!(r.value, 0.1 * 0.1);
/// assert_ne!(r.err, 0.0);
/// ```
#[inline]
pub fn two_product(a: f64, b: f64) -> CompensatedFloat {
    let p = a * b;
    let (a_hi, a_lo) = split(a);
    let (b_hi, b_lo) = split(b);
    let e = a_lo * b_lo - (((p - a_hi * b_hi) - a_lo * b_hi) - a_hi * b_lo);
    CompensatedFloat::new(p, e)
}

/// Returns `a + b` rounded, together with the exact error of that rounding.
///
/// Works for any ordering of magnitudes (no `|a| >= |b|` precondition).
#[inline]
pub fn two_sum(a: f64, b: f64) -> CompensatedFloat {
    let s = a + b;
    let delta = s - a;
    let err = (a - (s - delta)) + (b - delta);
    CompensatedFloat::new(s, err)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
