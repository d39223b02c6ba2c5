//! Immutable fitted cure-rate model: inspection and predictions.
//!
//! Purpose
//! -------
//! Hold everything a successful fit produced (family, θ̂ and its model-space
//! view, the θ-space covariance, optimizer diagnostics, dataset summary) and
//! answer prediction and interval queries from it alone.
//!
//! Key behaviors
//! -------------
//! - `predict_final(x) = σ(β_c·x)`: eventual conversion probability.
//! - `predict(x, t) = c(x) · F(t; λ(x), k)`: conversion by time `t`;
//!   `t = +∞` returns `predict_final(x)` exactly.
//! - `predict_final_ci` / `predict_ci`: delta-method intervals on the logit
//!   scale mapped back through σ, so `0 ≤ low ≤ value ≤ high ≤ 1`.
//! - `params()`: named shape parameters (`{"k": …}`) for shaped families.
//!
//! Invariants
//! ----------
//! - Created only by `CureModel::fit`; never mutated afterwards.
//! - Covariance entries are NaN when the observed information was unusable;
//!   intervals then degrade to `[0, 1]` and a warning is logged.
use crate::{
    inference::{
        hessian::standard_errors,
        interval::{Interval, delta_interval, normal_interval, normal_quantile},
    },
    optimization::{
        loglik_optimizer::{Grad, OptimOutcome, Theta},
        numerical_stability::transformations::{capped_exp, safe_logistic},
    },
    regression::{
        core::{
            data::ConversionData, family::Family, params::CureParams,
            validation::validate_covariates,
        },
        errors::{RegressionError, RegressionResult},
        models::likelihood::logit_cumulative,
    },
};
use log::warn;
use ndarray::{Array1, Array2, ArrayView1, s};
use std::collections::BTreeMap;

/// Prediction with interval bounds, all on the probability scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub value: f64,
    pub low: f64,
    pub high: f64,
}

/// `FittedCure` — result of a successful cure-rate fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCure {
    family: Family,
    params: CureParams,
    theta_hat: Theta,
    covariance: Array2<f64>,
    outcome: OptimOutcome,
    log_likelihood: f64,
    n_units: usize,
    n_converted: usize,
}

impl FittedCure {
    pub(crate) fn new(
        family: Family, data: &ConversionData, outcome: OptimOutcome, covariance: Array2<f64>,
        log_likelihood: f64,
    ) -> RegressionResult<Self> {
        let theta_hat = outcome.theta_hat.clone();
        let params = CureParams::from_theta(&theta_hat, data.dim(), family)?;
        Ok(Self {
            family,
            params,
            theta_hat,
            covariance,
            outcome,
            log_likelihood,
            n_units: data.len(),
            n_converted: data.n_converted(),
        })
    }

    // ---- Inspection ----

    pub fn family(&self) -> Family {
        self.family
    }

    /// Fitted `(β_c, β_λ, k)`.
    pub fn coefficients(&self) -> &CureParams {
        &self.params
    }

    /// θ̂ in optimizer space.
    pub fn theta(&self) -> &Theta {
        &self.theta_hat
    }

    /// Covariance of θ̂ (`J⁺ / n`).
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Standard errors of θ̂.
    pub fn standard_errors(&self) -> Array1<f64> {
        standard_errors(&self.covariance)
    }

    /// Total (unpenalized) log-likelihood at θ̂.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn n_units(&self) -> usize {
        self.n_units
    }

    pub fn n_converted(&self) -> usize {
        self.n_converted
    }

    /// Covariate dimensionality expected by predictions.
    pub fn dim(&self) -> usize {
        self.params.dim()
    }

    /// Optimizer diagnostics of the fit.
    pub fn outcome(&self) -> &OptimOutcome {
        &self.outcome
    }

    /// Named shape parameters.
    ///
    /// # Errors
    /// - `NoShapeParameters` for the exponential family.
    pub fn params(&self) -> RegressionResult<BTreeMap<String, f64>> {
        match self.params.k {
            Some(k) => Ok(self.family.shape_names().iter().map(|n| (n.to_string(), k)).collect()),
            None => Err(RegressionError::NoShapeParameters { family: self.family.name() }),
        }
    }

    // ---- Predictions ----

    /// Eventual conversion probability `c(x)`.
    ///
    /// # Errors
    /// - `DimensionMismatch` / `NonFiniteCovariate` for a bad `x`.
    pub fn predict_final(&self, x: &[f64]) -> RegressionResult<f64> {
        let x = self.covariates(x)?;
        Ok(safe_logistic(self.params.beta_c.dot(&x)))
    }

    /// Rate `λ(x)` of the time-to-conversion distribution.
    ///
    /// # Errors
    /// - Same as [`FittedCure::predict_final`].
    pub fn predict_rate(&self, x: &[f64]) -> RegressionResult<f64> {
        let x = self.covariates(x)?;
        Ok(capped_exp(self.params.beta_lambda.dot(&x)))
    }

    /// Probability of having converted by time `t`: `c(x) · F(t)`.
    ///
    /// # Errors
    /// - Bad `x` as in [`FittedCure::predict_final`].
    /// - `InvalidHorizon` for negative or NaN `t`.
    pub fn predict(&self, x: &[f64], t: f64) -> RegressionResult<f64> {
        let c = self.predict_final(x)?;
        check_horizon(t)?;
        if t == f64::INFINITY {
            return Ok(c);
        }
        let rate = self.predict_rate(x)?;
        Ok(c * self.family.ln_cdf(t, rate, self.params.k)?.exp())
    }

    /// `predict_final(x)` with a `level` interval.
    ///
    /// The interval is `σ(z ± q · se(z))` with `z = β_c·x`; its gradient in θ
    /// is `x` on the β_c block and zero elsewhere.
    ///
    /// # Errors
    /// - Bad `x` as in [`FittedCure::predict_final`].
    /// - `InvalidLevel` unless `0 < level < 1`.
    pub fn predict_final_ci(&self, x: &[f64], level: f64) -> RegressionResult<Prediction> {
        let xv = self.covariates(x)?;
        let d = xv.len();
        let z = self.params.beta_c.dot(&xv);
        let mut grad = Grad::zeros(self.theta_hat.len());
        grad.slice_mut(s![0..d]).assign(&xv);
        let iv = normal_interval(z, &grad, &self.covariance, level)?;
        Ok(self.to_prediction(safe_logistic(z), iv))
    }

    /// `predict(x, t)` with a `level` interval.
    ///
    /// The delta method is applied to `logit(c(x) · F(t))` as a function of
    /// θ, so uncertainty in both sub-models propagates. `t = +∞` defers to
    /// [`FittedCure::predict_final_ci`]; at `t = 0` the prediction and both
    /// bounds are 0.
    ///
    /// # Errors
    /// - Bad `x` as in [`FittedCure::predict_final`].
    /// - `InvalidLevel` unless `0 < level < 1`.
    /// - `InvalidHorizon` for negative or NaN `t`.
    pub fn predict_ci(&self, x: &[f64], t: f64, level: f64) -> RegressionResult<Prediction> {
        let xv = self.covariates(x)?;
        normal_quantile(level)?;
        check_horizon(t)?;
        if t == f64::INFINITY {
            return self.predict_final_ci(x, level);
        }
        let value = self.predict(x, t)?;
        if value == 0.0 {
            return Ok(Prediction { value, low: 0.0, high: 0.0 });
        }
        let family = self.family;
        let functional = |theta: &Theta| logit_cumulative(family, theta, xv.view(), t);
        let iv = delta_interval(&self.theta_hat, &self.covariance, &functional, level)?;
        Ok(self.to_prediction(value, iv))
    }

    // ---- Helper methods ----

    fn covariates<'a>(&self, x: &'a [f64]) -> RegressionResult<ArrayView1<'a, f64>> {
        validate_covariates(x, self.dim())?;
        Ok(ArrayView1::from(x))
    }

    /// Map a logit-scale interval to a probability-scale prediction around
    /// `value`, warning when the interval is unbounded.
    fn to_prediction(&self, value: f64, iv: Interval) -> Prediction {
        if !iv.low.is_finite() || !iv.high.is_finite() {
            warn!(
                "{} cure model: interval degraded to [0, 1]; covariance or gradient is not finite",
                self.family
            );
        }
        let prob = iv.to_probability();
        Prediction { value, low: prob.low.min(value), high: prob.high.max(value) }
    }
}

/// Horizons are `≥ 0` or `+∞`.
fn check_horizon(t: f64) -> RegressionResult<()> {
    if t.is_nan() || t < 0.0 {
        return Err(RegressionError::InvalidHorizon { value: t });
    }
    Ok(())
}
