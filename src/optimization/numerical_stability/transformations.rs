//! Numerical stability utilities.
//!
//! Provides guarded implementations of the nonlinear transforms that appear in
//! cure-rate likelihoods and are prone to overflow/underflow in naïve form:
//! the logistic link, its logarithm, `ln(eᵃ + eᵇ)`, and `ln(1 − eˣ)`.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalue floor for pseudo-inverting correlation-scaled
//!   information matrices.
//! - [`LOGIT_EPS`]: clamp used before taking a logit of an empirical share.
//! - [`EXP_ARG_MAX`]: symmetric cap on exponent arguments.
//! - [`safe_logistic`], [`log_sigmoid`], [`logit`]: logistic helpers.
//! - [`log_add_exp`], [`log1m_exp`]: log-space sums and complements.
//! - [`capped_exp`]: `exp` with its argument clamped to `±EXP_ARG_MAX`.
//! - [`safe_softplus`]: stable `ln(1 + eˣ)`.
//!
//! # Rationale
//! Line searches try parameter values far from the optimum. Every helper
//! here returns a finite value for finite input so a single wild trial step is
//! rejected by the line search instead of aborting the fit.

/// Floor on the eigenvalues kept when pseudo-inverting a correlation-scaled
/// information matrix (unit diagonal, so eigenvalues lie in `[0, p]`).
///
/// The effective cutoff is the larger of this floor and the
/// finite-difference noise of the Hessian; see `inference::hessian`.
pub const EIGEN_EPS: f64 = 1e-6;

/// Clamp applied to empirical shares before taking a logit.
pub const LOGIT_EPS: f64 = 1e-6;

/// Largest exponent argument evaluated by [`capped_exp`].
///
/// `e^600 ≈ 3.8e260`, so a mean of such terms over any realistic dataset
/// stays finite.
pub const EXP_ARG_MAX: f64 = 600.0;

/// Numerically stable logistic function `σ(x) = 1 / (1 + e^{−x})`.
///
/// Evaluates the exponential only on the non-positive side so neither branch
/// overflows.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln σ(x)` without forming `σ(x)`.
///
/// Uses `ln σ(x) = −softplus(−x)`; accurate for large negative `x` where
/// `σ(x)` underflows.
pub fn log_sigmoid(x: f64) -> f64 {
    -safe_softplus(-x)
}

/// Logit `ln(p / (1 − p))` of a probability clamped to
/// `[LOGIT_EPS, 1 − LOGIT_EPS]`.
pub fn logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    (p / (1.0 - p)).ln()
}

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20` returns `x`, otherwise `ln1p(exp(x))`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// `ln(eᵃ + eᵇ)` evaluated around the larger argument.
///
/// Either argument may be `−∞`; if both are, the result is `−∞`.
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if hi == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    hi + (lo - hi).exp().ln_1p()
}

/// `ln(1 − eˣ)` for `x ≤ 0`.
///
/// Switches between `ln(−expm1(x))` and `ln1p(−exp(x))` at `x = −ln 2`
/// (Mächler's rule). Returns `−∞` at `x = 0`.
pub fn log1m_exp(x: f64) -> f64 {
    if x > -std::f64::consts::LN_2 { (-x.exp_m1()).ln() } else { (-x.exp()).ln_1p() }
}

/// `exp(x)` with `x` clamped to `[−EXP_ARG_MAX, EXP_ARG_MAX]`.
pub fn capped_exp(x: f64) -> f64 {
    x.clamp(-EXP_ARG_MAX, EXP_ARG_MAX).exp()
}
