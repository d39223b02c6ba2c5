//! Model-space parameters and the θ-space layout.
//!
//! The optimizer works on an unconstrained vector
//! `θ = (β_c[0..d), β_λ[0..d), ln k)` of length `2d + s`, where `s` is the
//! family's shape count. [`CureParams`] is the model-space view: the two
//! weight vectors and, for shaped families, `k = exp(ln k) > 0`.
//!
//! `ln k` is clamped to `±SHAPE_LN_MAX` before exponentiation so a wild
//! line-search trial step cannot turn `k` into `0` or `∞`.
use crate::{
    optimization::loglik_optimizer::Theta,
    regression::{
        core::family::Family,
        errors::{RegressionError, RegressionResult},
    },
};
use ndarray::{Array1, ArrayView1, s};

/// Bound on `|ln k|` when mapping θ to a shape.
pub const SHAPE_LN_MAX: f64 = 50.0;

/// Length of θ for a family with `d` covariates.
pub fn theta_len(family: Family, d: usize) -> usize {
    2 * d + family.n_shape_params()
}

/// Shape `k = exp(clamp(ln k))`.
pub fn shape_from_ln(ln_k: f64) -> f64 {
    ln_k.clamp(-SHAPE_LN_MAX, SHAPE_LN_MAX).exp()
}

/// Split θ into views `(β_c, β_λ, ln k)`; `ln k` is `0` for shapeless
/// families. Callers guarantee `theta.len() == theta_len(family, d)`.
pub(crate) fn split_theta(
    theta: &Theta, d: usize, family: Family,
) -> (ArrayView1<'_, f64>, ArrayView1<'_, f64>, f64) {
    let beta_c = theta.slice(s![0..d]);
    let beta_lambda = theta.slice(s![d..2 * d]);
    let ln_k = if family.n_shape_params() > 0 { theta[2 * d] } else { 0.0 };
    (beta_c, beta_lambda, ln_k)
}

/// `CureParams` — fitted weights and shape in model space.
///
/// Fields
/// ------
/// - `beta_c`: logistic weights; `c(x) = σ(β_c·x)`.
/// - `beta_lambda`: log-rate weights; `λ(x) = exp(β_λ·x)`.
/// - `k`: shape for Weibull/Gamma, `None` for Exponential.
#[derive(Debug, Clone, PartialEq)]
pub struct CureParams {
    pub beta_c: Array1<f64>,
    pub beta_lambda: Array1<f64>,
    pub k: Option<f64>,
}

impl CureParams {
    /// Map θ into model space.
    ///
    /// # Errors
    /// - `LengthMismatch` if `theta.len() != 2d + s`.
    pub fn from_theta(theta: &Theta, d: usize, family: Family) -> RegressionResult<Self> {
        let expected = theta_len(family, d);
        if theta.len() != expected {
            return Err(RegressionError::LengthMismatch {
                what: "parameter vector",
                expected,
                found: theta.len(),
            });
        }
        let (beta_c, beta_lambda, ln_k) = split_theta(theta, d, family);
        let k = (family.n_shape_params() > 0).then(|| shape_from_ln(ln_k));
        Ok(Self { beta_c: beta_c.to_owned(), beta_lambda: beta_lambda.to_owned(), k })
    }

    /// Covariate dimensionality `d`.
    pub fn dim(&self) -> usize {
        self.beta_c.len()
    }
}
