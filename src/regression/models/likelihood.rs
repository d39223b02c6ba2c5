//! Cure-rate log-likelihood with analytic gradient.
//!
//! This module wires the mixture cure model to the [`LogLikelihood`] trait.
//! For unit `i` with covariates `x_i`,
//!
//! - `z_i = β_c·x_i`, `c_i = σ(z_i)`;
//! - `ln λ_i = β_λ·x_i`, `ln u_i = ln λ_i + ln t_i`;
//! - converted: `ln c_i + ln f(t_i)`;
//! - censored: `ln(1 − c_i F(t_i)) = logaddexp(ln σ(−z_i), ln σ(z_i) + ln S(t_i))`.
//!
//! The value handed to the optimizer is the **mean** over units, minus the
//! ridge penalty `0.5 · α · ‖β‖² / n`. Scores come from the family kernels
//! in `∂/∂ ln λ` and `∂/∂ ln k` form, so the chain rule to θ is a
//! multiplication by `x_i` for the weights and the identity for `ln k`.
//!
//! Numerical contract:
//! - converted times are floored at `TIME_FLOOR`;
//! - a censored unit at `t = 0` contributes exactly 0 with zero gradient;
//! - exponentials of `ln u` and `k ln u` are capped.
use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{Grad, LogLikelihood, Theta, validation::validate_theta_input},
        numerical_stability::transformations::{log_add_exp, log_sigmoid, safe_logistic},
    },
    regression::core::{
        data::ConversionData,
        family::{Family, TIME_FLOOR},
        params::{shape_from_ln, split_theta, theta_len},
    },
};
use ndarray::{ArrayView1, s};

/// Mean log-likelihood of the mixture cure model for one family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CureLikelihood {
    pub family: Family,
    pub l2_penalty: f64,
}

impl CureLikelihood {
    pub fn new(family: Family, l2_penalty: f64) -> Self {
        Self { family, l2_penalty }
    }

    /// Unpenalized mean log-likelihood at `θ` and, when `with_grad` is set,
    /// its gradient. Callers guarantee `θ` has length `2d + s`.
    pub fn mean_loglik(
        &self, theta: &Theta, data: &ConversionData, with_grad: bool,
    ) -> (f64, Option<Grad>) {
        let d = data.dim();
        let shaped = self.family.n_shape_params() > 0;
        let (beta_c, beta_lambda, ln_k) = split_theta(theta, d, self.family);
        let k = shape_from_ln(ln_k);

        let mut grad = with_grad.then(|| Grad::zeros(theta.len()));
        let mut total = 0.0;
        for ((x, &converted), &t) in data
            .covariates()
            .rows()
            .into_iter()
            .zip(data.converted().iter())
            .zip(data.times().iter())
        {
            let z = beta_c.dot(&x);
            let ln_lambda = beta_lambda.dot(&x);
            let term = unit_term(self.family, z, ln_lambda, k, converted, t, with_grad);
            total += term.value;
            if let Some(g) = grad.as_mut() {
                g.slice_mut(s![0..d]).scaled_add(term.d_z, &x);
                g.slice_mut(s![d..2 * d]).scaled_add(term.d_ln_lambda, &x);
                if shaped {
                    g[2 * d] += term.d_ln_k;
                }
            }
        }

        let n = data.len() as f64;
        (total / n, grad.map(|g| g / n))
    }

    /// Unpenalized total log-likelihood `Σ_i ℓ_i(θ)`.
    pub fn total_log_likelihood(&self, theta: &Theta, data: &ConversionData) -> f64 {
        self.mean_loglik(theta, data, false).0 * data.len() as f64
    }

    // ---- Helper methods ----

    fn penalty(&self, theta: &Theta, d: usize, n: usize) -> f64 {
        if self.l2_penalty == 0.0 {
            return 0.0;
        }
        let beta = theta.slice(s![0..2 * d]);
        0.5 * self.l2_penalty * beta.dot(&beta) / n as f64
    }
}

impl LogLikelihood for CureLikelihood {
    type Data = ConversionData;

    /// Penalized mean log-likelihood.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        self.check(theta, data)?;
        let (mean, _) = self.mean_loglik(theta, data, false);
        Ok(mean - self.penalty(theta, data.dim(), data.len()))
    }

    /// θ must have length `2d + s` and finite entries.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta_input(theta, theta_len(self.family, data.dim()))
    }

    /// Analytic gradient of the penalized mean log-likelihood.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        self.check(theta, data)?;
        let d = data.dim();
        let (_, grad) = self.mean_loglik(theta, data, true);
        let mut grad = grad.unwrap_or_else(|| Grad::zeros(theta.len()));
        if self.l2_penalty != 0.0 {
            let scale = -self.l2_penalty / data.len() as f64;
            grad.slice_mut(s![0..2 * d]).scaled_add(scale, &theta.slice(s![0..2 * d]));
        }
        Ok(grad)
    }
}

/// One unit's contribution and its partial derivatives with respect to
/// `z = β_c·x`, `ln λ`, and `ln k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct UnitTerm {
    pub value: f64,
    pub d_z: f64,
    pub d_ln_lambda: f64,
    pub d_ln_k: f64,
}

impl UnitTerm {
    const ZERO: UnitTerm = UnitTerm { value: 0.0, d_z: 0.0, d_ln_lambda: 0.0, d_ln_k: 0.0 };
}

/// Log-likelihood contribution of a single unit.
pub(crate) fn unit_term(
    family: Family, z: f64, ln_lambda: f64, k: f64, converted: bool, t: f64, with_grad: bool,
) -> UnitTerm {
    if converted {
        let ln_t = t.max(TIME_FLOOR).ln();
        let ln_u = ln_lambda + ln_t;
        let value = log_sigmoid(z) + family.ln_g(ln_u, k) - ln_t;
        if !with_grad {
            return UnitTerm { value, ..UnitTerm::ZERO };
        }
        let (d_ln_lambda, d_ln_k) = family.d_ln_g(ln_u, k);
        return UnitTerm { value, d_z: safe_logistic(-z), d_ln_lambda, d_ln_k };
    }

    if t == 0.0 {
        return UnitTerm::ZERO;
    }
    let ln_u = ln_lambda + t.ln();
    let ln_s = family.ln_s_std(ln_u, k);
    let never = log_sigmoid(-z);
    let later = log_sigmoid(z) + ln_s;
    let value = log_add_exp(never, later);
    if !with_grad {
        return UnitTerm { value, ..UnitTerm::ZERO };
    }

    let c = safe_logistic(z);
    let w_never = (never - value).exp();
    let w_later = (later - value).exp();
    let d_z = -c * w_never + (1.0 - c) * w_later;
    if w_later == 0.0 {
        return UnitTerm { value, d_z, d_ln_lambda: 0.0, d_ln_k: 0.0 };
    }
    let (ds_rate, ds_shape) = family.d_ln_s(ln_u, k, ln_s);
    UnitTerm { value, d_z, d_ln_lambda: w_later * ds_rate, d_ln_k: w_later * ds_shape }
}

/// `logit(c(x) · F(t))` at `θ`, the scale on which cumulative-conversion
/// intervals are built. `t` must be finite and positive.
pub(crate) fn logit_cumulative(family: Family, theta: &Theta, x: ArrayView1<'_, f64>, t: f64) -> f64 {
    let (beta_c, beta_lambda, ln_k) = split_theta(theta, x.len(), family);
    let k = shape_from_ln(ln_k);
    let z = beta_c.dot(&x);
    let ln_u = beta_lambda.dot(&x) + t.ln();
    let ln_s = family.ln_s_std(ln_u, k);
    let ln_cf = log_sigmoid(z) + family.ln_f_std(ln_u, k);
    let ln_rest = log_add_exp(log_sigmoid(-z), log_sigmoid(z) + ln_s);
    ln_cf - ln_rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form per-unit contributions for the exponential family.
    // - Analytic gradients against finite differences for all families, with
    //   and without the ridge penalty.
    // - The t = 0 censoring contract and θ validation.
    // - The cumulative logit used for intervals.
    // -------------------------------------------------------------------------

    fn toy_data() -> ConversionData {
        ConversionData::new(
            array![
                [1.0, 0.0],
                [1.0, 1.0],
                [1.0, 0.5],
                [1.0, 1.0],
                [1.0, 0.0],
                [1.0, 2.0]
            ],
            vec![true, false, true, false, false, true],
            array![2.0, 7.5, 0.4, 0.0, 30.0, 12.0],
        )
        .expect("valid dataset")
    }

    fn toy_theta(family: Family) -> Theta {
        let mut theta = vec![-0.3, 0.4, -1.6, 0.2];
        if family.n_shape_params() > 0 {
            theta.push(0.35);
        }
        Array1::from(theta)
    }

    #[test]
    // Purpose
    // -------
    // Exponential contributions match the closed forms.
    //
    // Given
    // -----
    // - One converted unit at t = 2 and one censored at t = 5, c = σ(0.4),
    //   λ = 0.3, single intercept column.
    //
    // Expect
    // ------
    // - Mean of ln c + ln λ − λt and ln(1 − c + c e^{−λt}).
    fn exponential_contributions_match_closed_form() {
        // Arrange
        let data = ConversionData::new(array![[1.0], [1.0]], vec![true, false], array![2.0, 5.0])
            .expect("valid dataset");
        let lambda: f64 = 0.3;
        let theta = array![0.4, lambda.ln()];
        let c = safe_logistic(0.4);
        let expected = 0.5
            * ((c.ln() + lambda.ln() - lambda * 2.0)
                + (1.0 - c + c * (-lambda * 5.0).exp()).ln());

        // Act
        let ll = CureLikelihood::new(Family::Exponential, 0.0)
            .value(&theta, &data)
            .expect("valid theta");

        // Assert
        assert_abs_diff_eq!(ll, expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients agree with central differences of `value`.
    //
    // Given
    // -----
    // - The toy dataset (converted, censored, t = 0 censored) for each family,
    //   with penalties 0 and 2.5.
    //
    // Expect
    // ------
    // - Max abs difference below 1e-6.
    fn analytic_gradient_matches_finite_differences() {
        let data = toy_data();
        for family in [Family::Exponential, Family::Weibull, Family::Gamma] {
            for penalty in [0.0, 2.5] {
                // Arrange
                let model = CureLikelihood::new(family, penalty);
                let theta = toy_theta(family);

                // Act
                let analytic = model.grad(&theta, &data).expect("valid theta");
                let numeric = theta.central_diff(&|t: &Theta| {
                    model.value(t, &data).unwrap_or(f64::NAN)
                });

                // Assert
                for (a, b) in analytic.iter().zip(numeric.iter()) {
                    assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A censored unit at t = 0 contributes nothing.
    fn censored_at_origin_contributes_zero() {
        // Act
        let term = unit_term(Family::Weibull, 0.7, -1.0, 2.0, false, 0.0, true);

        // Assert
        assert_eq!(term, UnitTerm::ZERO);
    }

    #[test]
    // Purpose
    // -------
    // Converted units at t = 0 use the time floor and stay finite.
    fn converted_at_origin_is_finite() {
        for family in [Family::Exponential, Family::Weibull, Family::Gamma] {
            // Act
            let term = unit_term(family, 0.1, -2.0, 0.8, true, 0.0, true);

            // Assert
            assert!(term.value.is_finite(), "{family}");
            assert!(term.d_ln_lambda.is_finite() && term.d_ln_k.is_finite(), "{family}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Deeply censored units do not underflow to −∞.
    //
    // Given
    // -----
    // - c = σ(3), λt = 1e4 for the exponential family.
    //
    // Expect
    // ------
    // - value ≈ ln(1 − c) = ln σ(−3).
    fn deep_censoring_is_finite() {
        // Act
        let term = unit_term(Family::Exponential, 3.0, 0.0, 1.0, false, 1e4, true);

        // Assert
        assert_abs_diff_eq!(term.value, log_sigmoid(-3.0), epsilon = 1e-12);
        assert_eq!(term.d_ln_lambda, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // θ of the wrong length is rejected by `check`, `value` and `grad`.
    fn wrong_theta_length_is_rejected() {
        // Arrange
        let data = toy_data();
        let model = CureLikelihood::new(Family::Gamma, 0.0);
        let short = array![0.0, 0.0, 0.0, 0.0];

        // Act / Assert
        let expected = OptError::ThetaLengthMismatch { expected: 5, found: 4 };
        assert_eq!(model.check(&short, &data), Err(expected.clone()));
        assert_eq!(model.value(&short, &data), Err(expected.clone()));
        assert_eq!(model.grad(&short, &data), Err(expected));
    }

    #[test]
    // Purpose
    // -------
    // The cumulative logit equals logit(c·F) computed directly.
    //
    // Given
    // -----
    // - Weibull, x = (1, 1), t = 6 at the toy θ.
    //
    // Expect
    // ------
    // - Agreement with `ln(cF / (1 − cF))` to 1e-12.
    fn logit_cumulative_matches_direct_formula() {
        // Arrange
        let theta = toy_theta(Family::Weibull);
        let x = array![1.0, 1.0];
        let c = safe_logistic(-0.3 + 0.4);
        let rate = (-1.6_f64 + 0.2).exp();
        let cdf = Family::Weibull.cdf(6.0, rate, Some(0.35_f64.exp())).expect("valid");
        let p = c * cdf;

        // Act
        let got = logit_cumulative(Family::Weibull, &theta, x.view(), 6.0);

        // Assert
        assert_abs_diff_eq!(got, (p / (1.0 - p)).ln(), epsilon = 1e-12);
    }
}
