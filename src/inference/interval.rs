//! inference::interval — delta-method confidence intervals.
//!
//! Purpose
//! -------
//! Build a symmetric normal interval for a scalar functional `η = g(θ̂)`
//! from its gradient and the covariance of `θ̂`, then map it through a
//! monotone link. Cure-rate predictions are formed on the logit scale and
//! mapped back with the logistic function, so bounds always land in [0, 1].
//!
//! - [`normal_interval`] takes a precomputed gradient.
//! - [`delta_interval`] differentiates the functional numerically first.
//!
//! Invariants
//! ----------
//! - `0 < level < 1`.
//! - A non-finite gradient or standard error yields the unbounded interval
//!   `(-∞, ∞)` on the linear scale.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::{
        loglik_optimizer::finite_diff::functional_gradient,
        numerical_stability::transformations::safe_logistic,
    },
};
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, Normal};

/// Point estimate with lower and upper bounds, all on the same scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub point: f64,
    pub low: f64,
    pub high: f64,
}

impl Interval {
    /// Apply a monotone increasing map to all three values.
    pub fn map<M: Fn(f64) -> f64>(self, m: M) -> Interval {
        Interval { point: m(self.point), low: m(self.low), high: m(self.high) }
    }

    /// Map a logit-scale interval to probabilities.
    pub fn to_probability(self) -> Interval {
        self.map(safe_logistic)
    }
}

/// Two-sided normal quantile `z` with `P(|Z| ≤ z) = level`.
///
/// # Errors
/// - `InferenceError::InvalidLevel` unless `0 < level < 1`.
pub fn normal_quantile(level: f64) -> InferenceResult<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(InferenceError::InvalidLevel { level });
    }
    let std_normal = Normal::new(0.0, 1.0).map_err(|e| InferenceError::Distribution(e.to_string()))?;
    Ok(std_normal.inverse_cdf(0.5 * (1.0 + level)))
}

/// Delta-method interval for a scalar functional `g` of the parameters.
///
/// Evaluates `g(θ̂)` and its finite-difference gradient, then defers to
/// [`normal_interval`]. If the functional cannot be differentiated at
/// `θ̂` (non-finite on both sides), the interval is unbounded.
///
/// # Errors
/// - Same as [`normal_interval`] for level and shape checks.
pub fn delta_interval<G: Fn(&Array1<f64>) -> f64>(
    theta_hat: &Array1<f64>, cov: &Array2<f64>, functional: &G, level: f64,
) -> InferenceResult<Interval> {
    let point = functional(theta_hat);
    match functional_gradient(functional, theta_hat) {
        Ok(grad) => normal_interval(point, &grad, cov, level),
        Err(_) => {
            normal_quantile(level)?;
            Ok(Interval { point, low: f64::NEG_INFINITY, high: f64::INFINITY })
        }
    }
}

/// Normal interval `point ± z · sqrt(∇gᵀ Σ ∇g)` from a known gradient.
///
/// Parameters
/// ----------
/// - `point`: `g(θ̂)` on the linear (e.g. logit) scale.
/// - `grad`: `∇g(θ̂)`, same length as `cov`'s side.
/// - `cov`: covariance of `θ̂`.
/// - `level`: two-sided coverage in (0, 1).
///
/// # Errors
/// - `InferenceError::InvalidLevel` for a level outside (0, 1).
/// - `InferenceError::CovarianceDimMismatch` / `GradientDimMismatch` for
///   misshapen inputs.
pub fn normal_interval(
    point: f64, grad: &Array1<f64>, cov: &Array2<f64>, level: f64,
) -> InferenceResult<Interval> {
    let z = normal_quantile(level)?;
    let p = cov.nrows();
    if cov.ncols() != p {
        return Err(InferenceError::CovarianceDimMismatch { expected: p, found: cov.dim() });
    }
    if grad.len() != p {
        return Err(InferenceError::GradientDimMismatch { expected: p, found: grad.len() });
    }

    let var = grad.dot(&cov.dot(grad));
    let se = var.max(0.0).sqrt();
    if !se.is_finite() || !point.is_finite() {
        return Ok(Interval { point, low: f64::NEG_INFINITY, high: f64::INFINITY });
    }
    Ok(Interval { point, low: point - z * se, high: point + z * se })
}
