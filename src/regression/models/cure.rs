//! Cure-rate regression model: configuration and fitting.
//!
//! Purpose
//! -------
//! Fit the mixture cure model
//! `P(converted by t | x) = σ(β_c·x) · F(t; exp(β_λ·x), k)`
//! by penalized maximum likelihood for one [`Family`], and hand back an
//! immutable [`FittedCure`].
//!
//! Key behaviors
//! -------------
//! - `fit` validates identifiability, starts from [`initial_theta`], runs
//!   L-BFGS through [`maximize`], and computes the θ-space covariance as the
//!   pseudo-inverse of the observed information.
//! - A run that stops without meeting a tolerance is a fit failure; no
//!   partially fitted model is ever returned.
//! - An unusable information matrix does not fail the fit: the covariance is
//!   filled with NaN so intervals degrade to `[0, 1]`.
//!
//! Invariants
//! ----------
//! - `CureModel` is a plain value; fitting does not mutate it, so one model
//!   may fit many datasets.
use crate::{
    inference::hessian::observed_covariance,
    optimization::loglik_optimizer::{Grad, LogLikelihood, Theta, maximize},
    regression::{
        core::{
            data::ConversionData, family::Family, init::initial_theta, options::CureOptions,
            validation::validate_identifiable,
        },
        errors::{RegressionError, RegressionResult},
        models::{fitted::FittedCure, likelihood::CureLikelihood},
    },
};
use log::{debug, info, warn};
use ndarray::{Array1, Array2};

/// `CureModel` — a family plus estimation options.
///
/// Example
/// -------
/// ```rust
/// use convoys::regression::{core::ConversionData, models::CureModel};
/// use ndarray::array;
///
/// let data = ConversionData::new(
///     array![[1.0], [1.0], [1.0], [1.0], [1.0], [1.0]],
///     vec![true, false, true, false, true, false],
///     array![1.0, 10.0, 2.0, 10.0, 0.5, 10.0],
/// )?;
/// let fit = CureModel::exponential().fit(&data)?;
/// let c = fit.predict_final(&[1.0])?;
/// assert!(c > 0.0 && c < 1.0);
/// # Ok::<(), convoys::regression::errors::RegressionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CureModel {
    family: Family,
    options: CureOptions,
}

impl CureModel {
    pub fn new(family: Family, options: CureOptions) -> Self {
        Self { family, options }
    }

    /// Exponential family with default options.
    pub fn exponential() -> Self {
        Self::new(Family::Exponential, CureOptions::default())
    }

    /// Weibull family with default options.
    pub fn weibull() -> Self {
        Self::new(Family::Weibull, CureOptions::default())
    }

    /// Gamma family with default options.
    pub fn gamma() -> Self {
        Self::new(Family::Gamma, CureOptions::default())
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn options(&self) -> &CureOptions {
        &self.options
    }

    /// Fit the model to `data`.
    ///
    /// ## Steps
    /// 1. Reject datasets the model cannot identify (no converters, an
    ///    all-zero column, a constant column redundant with the intercept, a
    ///    0/1 group without converters).
    /// 2. Maximize the penalized mean log-likelihood from [`initial_theta`].
    /// 3. Require a converged run.
    /// 4. Pseudo-invert the observed information of the penalized objective.
    ///
    /// # Errors
    /// - `DegenerateDataset` kind from step 1.
    /// - `InvalidOptions` for a rejected optimizer configuration.
    /// - `NotConverged` when the iteration cap or another stop reason ends the
    ///   run before a tolerance is met.
    /// - `OptimizationFailed` for line-search or numerical breakdown.
    pub fn fit(&self, data: &ConversionData) -> RegressionResult<FittedCure> {
        validate_identifiable(data)?;
        debug!(
            "fitting {} cure model: n = {}, d = {}, converters = {}",
            self.family,
            data.len(),
            data.dim(),
            data.n_converted()
        );

        let likelihood = CureLikelihood::new(self.family, self.options.l2_penalty());
        let theta0 = initial_theta(data, self.family);
        let outcome = maximize(&likelihood, theta0, data, self.options.mle_opts())?;
        if !outcome.converged {
            warn!(
                "{} cure model did not converge after {} iterations: {}",
                self.family, outcome.iterations, outcome.status
            );
            return Err(RegressionError::NotConverged {
                status: outcome.status,
                iterations: outcome.iterations,
            });
        }

        let log_likelihood = likelihood.total_log_likelihood(&outcome.theta_hat, data);
        info!(
            "{} cure model converged in {} iterations: loglik = {:.6}, status = {}",
            self.family, outcome.iterations, log_likelihood, outcome.status
        );

        let covariance = self.covariance(&likelihood, &outcome.theta_hat, data);
        FittedCure::new(self.family, data, outcome, covariance, log_likelihood)
    }

    /// Validate raw arrays into a [`ConversionData`] and fit.
    ///
    /// # Errors
    /// - Any dataset validation error (`InvalidInput` kind).
    /// - Everything [`CureModel::fit`] returns.
    pub fn fit_arrays(
        &self, covariates: Array2<f64>, indicators: Vec<bool>, times: Array1<f64>,
    ) -> RegressionResult<FittedCure> {
        let data = ConversionData::new(covariates, indicators, times)?;
        self.fit(&data)
    }

    // ---- Helper methods ----

    /// Covariance of θ̂; NaN-filled when the information is unusable.
    fn covariance(
        &self, likelihood: &CureLikelihood, theta_hat: &Theta, data: &ConversionData,
    ) -> Array2<f64> {
        let p = theta_hat.len();
        let mean_grad = |theta: &Theta| {
            likelihood.grad(theta, data).unwrap_or_else(|_| Grad::from_elem(p, f64::NAN))
        };
        match observed_covariance(&mean_grad, theta_hat, data.len()) {
            Ok(cov) => cov,
            Err(e) => {
                warn!(
                    "{} cure model: covariance unavailable ({e}); intervals will be [0, 1]",
                    self.family
                );
                Array2::from_elem((p, p), f64::NAN)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
        regression::errors::ErrorKind,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover (small, deterministic datasets):
    // - Stationarity of the intercept-only exponential fit.
    // - Degeneracy and validation errors surfacing before the optimizer.
    // - Iteration-capped runs reported as `NotConverged`.
    // - Constructors and the ridge penalty shrinking weights.
    //
    // They intentionally DO NOT cover:
    // - Large-sample recovery and interval calibration; see
    //   `tests/integration_cure_regression.rs`.
    // -------------------------------------------------------------------------

    /// Intercept-only data: 3 converters at t = 1, 2, 3 and 3 censored at 10.
    fn intercept_only() -> ConversionData {
        ConversionData::new(
            Array2::ones((6, 1)),
            vec![true, true, true, false, false, false],
            array![1.0, 2.0, 3.0, 10.0, 10.0, 10.0],
        )
        .expect("valid dataset")
    }

    #[test]
    // Purpose
    // -------
    // The fitted intercept-only exponential model satisfies the score
    // equations and reports a finite covariance.
    //
    // Given
    // -----
    // - `intercept_only()` data.
    //
    // Expect
    // ------
    // - Converged fit; gradient of ℓ̄ near 0 at θ̂; positive finite standard
    //   errors; the total log-likelihood matches `n · ℓ̄(θ̂)`.
    fn exponential_intercept_fit_is_stationary() {
        // Arrange
        let data = intercept_only();
        let model = CureModel::exponential();

        // Act
        let fit = model.fit(&data).expect("fit should succeed");
        let grad = CureLikelihood::new(Family::Exponential, 0.0)
            .grad(fit.theta(), &data)
            .expect("valid theta");

        // Assert
        assert!(fit.outcome().converged);
        assert!(grad.iter().all(|g| g.abs() < 1e-4), "{grad:?}");
        assert!(fit.standard_errors().iter().all(|s| s.is_finite() && *s > 0.0));
        let c = fit.predict_final(&[1.0]).expect("valid x");
        assert!(c > 0.45 && c < 0.75, "c = {c}");
        assert_eq!(fit.n_units(), 6);
        assert_eq!(fit.n_converted(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Datasets without converters are rejected before any optimizer work.
    fn no_converters_is_degenerate() {
        // Arrange
        let model = CureModel::weibull();

        // Act
        let err = model
            .fit_arrays(Array2::ones((3, 1)), vec![false; 3], array![1.0, 2.0, 3.0])
            .expect_err("no converters");

        // Assert
        assert_eq!(err, RegressionError::NoConverters { n: 3 });
        assert_eq!(err.kind(), ErrorKind::DegenerateDataset);
    }

    #[test]
    // Purpose
    // -------
    // Raw-array validation errors come back with the InvalidInput kind.
    fn fit_arrays_validates_inputs() {
        // Arrange
        let model = CureModel::gamma();

        // Act
        let err = model
            .fit_arrays(Array2::ones((3, 1)), vec![true, false], array![1.0, 2.0, 3.0])
            .expect_err("length mismatch");

        // Assert
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is a fit failure, not a model.
    //
    // Given
    // -----
    // - max_iter = 1 with an unreachable gradient tolerance.
    //
    // Expect
    // ------
    // - `NotConverged` with the FitDidNotConverge kind.
    fn iteration_cap_is_not_converged() {
        // Arrange
        let tols = Tolerances::new(Some(1e-14), None, Some(1)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid");
        let model = CureModel::new(
            Family::Weibull,
            CureOptions::new(mle, 0.0).expect("valid options"),
        );

        // Act
        let err = model.fit(&intercept_only()).expect_err("one iteration is not enough");

        // Assert
        assert!(matches!(err, RegressionError::NotConverged { .. }), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::FitDidNotConverge);
    }

    #[test]
    // Purpose
    // -------
    // A ridge penalty pulls the regression weights toward zero.
    fn ridge_penalty_shrinks_weights() {
        // Arrange
        let data = ConversionData::new(
            array![[1.0, 0.0], [1.0, 1.0], [1.0, 0.0], [1.0, 1.0], [1.0, 0.0], [1.0, 1.0]],
            vec![true, true, false, true, true, false],
            array![1.0, 0.5, 8.0, 2.0, 3.0, 8.0],
        )
        .expect("valid dataset");
        let penalized = CureModel::new(
            Family::Exponential,
            CureOptions::new(MLEOptions::default(), 5.0).expect("valid options"),
        );

        // Act
        let free = CureModel::exponential().fit(&data).expect("fit");
        let shrunk = penalized.fit(&data).expect("fit");

        // Assert
        let norm = |t: &Theta| t.dot(t);
        assert!(norm(shrunk.theta()) < norm(free.theta()));
        assert_eq!(penalized.options().l2_penalty(), 5.0);
    }

    #[test]
    // Purpose
    // -------
    // Convenience constructors set the family and default options.
    fn constructors_set_family() {
        // Act / Assert
        for (model, family) in [
            (CureModel::exponential(), Family::Exponential),
            (CureModel::weibull(), Family::Weibull),
            (CureModel::gamma(), Family::Gamma),
        ] {
            assert_eq!(model.family(), family);
            assert_eq!(model.options(), &CureOptions::default());
        }
    }
}
