//! Distribution families for the time-to-conversion sub-model.
//!
//! Purpose
//! -------
//! Encapsulate the parametric families used for the time until conversion
//! and expose their survival, density and cdf for a scalar time, plus the
//! log-space kernels and scores the likelihood needs.
//!
//! Key behaviors
//! -------------
//! - [`Family`] is a closed enum: Exponential (no shape), Weibull and Gamma
//!   (one shape `k`).
//! - Public evaluators take `(t, rate, shape)` and validate their inputs.
//! - Crate-internal kernels work on the standardized time `u = λ t` through
//!   `ln u = ln λ + ln t`, which is where every family's likelihood and
//!   derivatives are simplest.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rate `λ > 0` and shape `k > 0`, both finite.
//! - `ln_survival` is the primitive; `survival` and `cdf` are derived from
//!   it so deep tails never round to 0 or 1 prematurely. `ln_cdf` has its
//!   own kernel so the gamma lower tail keeps full relative precision.
//! - Densities are evaluated at `max(t, TIME_FLOOR)`; several densities are
//!   infinite at the origin.
//!
//! Conventions
//! -----------
//! - With `g(u) = u · f_U(u)` (the standardized density times `u`),
//!   `ln f(t) = ln g(u) − ln t`:
//!   - Exponential: `ln g = ln u − u`, `ln S = −u`.
//!   - Weibull: `ln g = ln k + k ln u − u^k`, `ln S = −u^k`.
//!   - Gamma: `ln g = k ln u − u − ln Γ(k)`, `ln S = ln Q(k, u)`.
//! - Scores are returned as `(∂/∂ ln λ, ∂/∂ ln k)`; the second entry is 0
//!   for the exponential family.
use crate::{
    optimization::numerical_stability::transformations::{capped_exp, log1m_exp},
    regression::{
        core::incomplete_gamma::{ln_gamma_p, ln_gamma_q},
        errors::{RegressionError, RegressionResult},
    },
};
use statrs::function::gamma::{digamma, ln_gamma};
use std::{fmt, str::FromStr};

/// Smallest time at which densities are evaluated.
pub const TIME_FLOOR: f64 = 1e-10;

/// Relative step in `ln k` for the gamma survival shape derivative.
const SHAPE_FD_STEP: f64 = 1e-5;

/// Parametric family of the time-to-conversion distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Exponential,
    Weibull,
    Gamma,
}

impl Family {
    /// Lower-case family name.
    pub fn name(&self) -> &'static str {
        match self {
            Family::Exponential => "exponential",
            Family::Weibull => "weibull",
            Family::Gamma => "gamma",
        }
    }

    /// Number of shape parameters carried in `θ`.
    pub fn n_shape_params(&self) -> usize {
        match self {
            Family::Exponential => 0,
            Family::Weibull | Family::Gamma => 1,
        }
    }

    /// Names of the shape parameters, in `θ` order.
    pub fn shape_names(&self) -> &'static [&'static str] {
        match self {
            Family::Exponential => &[],
            Family::Weibull | Family::Gamma => &["k"],
        }
    }

    /// `ln S(t)`: `0` at `t = 0`, `−∞` at `t = +∞`.
    ///
    /// # Errors
    /// - `InvalidHorizon` for negative or NaN `t`.
    /// - `InvalidRate` / `InvalidShape` for out-of-domain parameters.
    pub fn ln_survival(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        let k = self.check_args(t, rate, shape)?;
        if t == 0.0 {
            return Ok(0.0);
        }
        if t == f64::INFINITY {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(self.ln_s_std(rate.ln() + t.ln(), k))
    }

    /// `ln f(t)` at `max(t, TIME_FLOOR)`; `−∞` at `t = +∞`.
    ///
    /// # Errors
    /// - Same as [`Family::ln_survival`].
    pub fn ln_density(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        let k = self.check_args(t, rate, shape)?;
        if t == f64::INFINITY {
            return Ok(f64::NEG_INFINITY);
        }
        let ln_t = t.max(TIME_FLOOR).ln();
        Ok(self.ln_g(rate.ln() + ln_t, k) - ln_t)
    }

    /// `S(t) = P(T > t)`.
    pub fn survival(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        Ok(self.ln_survival(t, rate, shape)?.exp())
    }

    /// `F(t) = 1 − S(t)`, formed as `−expm1(ln S)`.
    pub fn cdf(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        Ok(-self.ln_survival(t, rate, shape)?.exp_m1())
    }

    /// `ln F(t)`; `−∞` at `t = 0`, `0` at `t = +∞`.
    ///
    /// # Errors
    /// - Same as [`Family::ln_survival`].
    pub fn ln_cdf(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        let k = self.check_args(t, rate, shape)?;
        if t == 0.0 {
            return Ok(f64::NEG_INFINITY);
        }
        if t == f64::INFINITY {
            return Ok(0.0);
        }
        Ok(self.ln_f_std(rate.ln() + t.ln(), k))
    }

    /// `f(t) = dF/dt`.
    pub fn density(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        Ok(self.ln_density(t, rate, shape)?.exp())
    }

    // ---- Standardized kernels (θ-space callers pass a valid k) ----

    /// `ln g(u)` with `g(u) = u · f_U(u)`.
    pub(crate) fn ln_g(&self, ln_u: f64, k: f64) -> f64 {
        match self {
            Family::Exponential => ln_u - capped_exp(ln_u),
            Family::Weibull => k.ln() + k * ln_u - capped_exp(k * ln_u),
            Family::Gamma => k * ln_u - capped_exp(ln_u) - ln_gamma(k),
        }
    }

    /// `ln S_U(u)` of the standardized time.
    pub(crate) fn ln_s_std(&self, ln_u: f64, k: f64) -> f64 {
        match self {
            Family::Exponential => -capped_exp(ln_u),
            Family::Weibull => -capped_exp(k * ln_u),
            Family::Gamma => ln_gamma_q(k, capped_exp(ln_u)),
        }
    }

    /// `ln F_U(u)` of the standardized time. The gamma lower tail comes from
    /// the series for `P` directly, which stays accurate where `Q ≈ 1`.
    pub(crate) fn ln_f_std(&self, ln_u: f64, k: f64) -> f64 {
        match self {
            Family::Gamma => ln_gamma_p(k, capped_exp(ln_u)),
            Family::Exponential | Family::Weibull => log1m_exp(self.ln_s_std(ln_u, k)),
        }
    }

    /// `(∂ ln g / ∂ ln λ, ∂ ln g / ∂ ln k)` for a converted unit.
    pub(crate) fn d_ln_g(&self, ln_u: f64, k: f64) -> (f64, f64) {
        match self {
            Family::Exponential => (1.0 - capped_exp(ln_u), 0.0),
            Family::Weibull => {
                let uk = capped_exp(k * ln_u);
                (k * (1.0 - uk), 1.0 + k * ln_u * (1.0 - uk))
            }
            Family::Gamma => (k - capped_exp(ln_u), k * (ln_u - digamma(k))),
        }
    }

    /// `(∂ ln S / ∂ ln λ, ∂ ln S / ∂ ln k)` for a censored unit, given the
    /// already computed `ln_s = ln S_U(u)`.
    pub(crate) fn d_ln_s(&self, ln_u: f64, k: f64, ln_s: f64) -> (f64, f64) {
        match self {
            Family::Exponential => (-capped_exp(ln_u), 0.0),
            Family::Weibull => {
                let uk = capped_exp(k * ln_u);
                (-k * uk, -k * uk * ln_u)
            }
            Family::Gamma => {
                let u = capped_exp(ln_u);
                let d_rate = -(k * ln_u - u - ln_gamma(k) - ln_s).exp();
                let up = ln_gamma_q(k * SHAPE_FD_STEP.exp(), u);
                let down = ln_gamma_q(k * (-SHAPE_FD_STEP).exp(), u);
                (d_rate, (up - down) / (2.0 * SHAPE_FD_STEP))
            }
        }
    }

    // ---- Helper methods ----

    /// Validate `(t, rate, shape)` and return the shape to use (1 for the
    /// exponential family, which ignores `shape`).
    fn check_args(&self, t: f64, rate: f64, shape: Option<f64>) -> RegressionResult<f64> {
        if t.is_nan() || t < 0.0 {
            return Err(RegressionError::InvalidHorizon { value: t });
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RegressionError::InvalidRate { value: rate });
        }
        match self {
            Family::Exponential => Ok(1.0),
            Family::Weibull | Family::Gamma => match shape {
                Some(k) if k.is_finite() && k > 0.0 => Ok(k),
                other => Err(RegressionError::InvalidShape { family: self.name(), value: other }),
            },
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = RegressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exponential" => Ok(Family::Exponential),
            "weibull" => Ok(Family::Weibull),
            "gamma" => Ok(Family::Gamma),
            _ => Err(RegressionError::UnknownFamily { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use statrs::distribution::{Continuous, ContinuousCDF, Exp, Gamma, Weibull};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Survival, cdf and density against statrs for all three families.
    // - Boundary behavior at t = 0 and t = ∞ and argument validation.
    // - `ln_cdf` agreeing with `cdf` and keeping precision in the gamma
    //   lower tail.
    // - Scores of the standardized kernels against central differences.
    // - Name/shape descriptors and parsing.
    // -------------------------------------------------------------------------

    const TIMES: [f64; 5] = [0.05, 0.8, 3.0, 12.0, 45.0];

    #[test]
    // Purpose
    // -------
    // The three families agree with statrs' reference distributions.
    //
    // Given
    // -----
    // - λ = 0.2; k = 0.7 (Weibull) and k = 2.5 (Gamma).
    //
    // Expect
    // ------
    // - survival, cdf and density within 1e-10 relative.
    fn families_match_statrs_references() {
        // Arrange
        let rate = 0.2;
        let exp = Exp::new(rate).expect("valid exponential");
        let weib = Weibull::new(0.7, 1.0 / rate).expect("valid weibull");
        let gam = Gamma::new(2.5, rate).expect("valid gamma");

        for &t in &TIMES {
            // Act
            let se = Family::Exponential.survival(t, rate, None).expect("valid");
            let sw = Family::Weibull.survival(t, rate, Some(0.7)).expect("valid");
            let sg = Family::Gamma.survival(t, rate, Some(2.5)).expect("valid");
            let fe = Family::Exponential.density(t, rate, None).expect("valid");
            let fw = Family::Weibull.density(t, rate, Some(0.7)).expect("valid");
            let fg = Family::Gamma.density(t, rate, Some(2.5)).expect("valid");
            let cg = Family::Gamma.cdf(t, rate, Some(2.5)).expect("valid");

            // Assert
            assert_relative_eq!(se, exp.sf(t), max_relative = 1e-10);
            assert_relative_eq!(sw, weib.sf(t), max_relative = 1e-10);
            assert_relative_eq!(sg, gam.sf(t), max_relative = 1e-10);
            assert_relative_eq!(fe, exp.pdf(t), max_relative = 1e-10);
            assert_relative_eq!(fw, weib.pdf(t), max_relative = 1e-10);
            assert_relative_eq!(fg, gam.pdf(t), max_relative = 1e-10);
            assert_relative_eq!(cg, gam.cdf(t), max_relative = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Boundary values and monotone survival.
    //
    // Given
    // -----
    // - Each family at t = 0, t = ∞ and an increasing grid.
    //
    // Expect
    // ------
    // - S(0) = 1, S(∞) = 0, cdf(∞) = 1, S non-increasing on the grid.
    fn survival_boundaries_and_monotonicity() {
        for (family, shape) in
            [(Family::Exponential, None), (Family::Weibull, Some(1.7)), (Family::Gamma, Some(0.6))]
        {
            // Act
            let s0 = family.survival(0.0, 0.3, shape).expect("valid");
            let s_inf = family.survival(f64::INFINITY, 0.3, shape).expect("valid");
            let c_inf = family.cdf(f64::INFINITY, 0.3, shape).expect("valid");
            let grid: Vec<f64> = TIMES
                .iter()
                .map(|&t| family.survival(t, 0.3, shape).expect("valid"))
                .collect();

            // Assert
            assert_eq!(s0, 1.0);
            assert_eq!(s_inf, 0.0);
            assert_eq!(c_inf, 1.0);
            assert!(grid.windows(2).all(|w| w[1] <= w[0]), "{family}: {grid:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // `ln_cdf` is the log of `cdf` on the bulk and stays exact in the gamma
    // lower tail, where `1 − Q` has no significant digits left.
    //
    // Given
    // -----
    // - All families at λ = 0.2 on `TIMES`; gamma k = 2.5 at t = 1e-8
    //   (u = 2e-9, P ≈ 5e-23).
    //
    // Expect
    // ------
    // - exp(ln_cdf) within 1e-10 relative of cdf; −∞ at 0 and 0 at ∞.
    // - Tail value within 1e-8 of `k ln u − ln Γ(k + 1)`.
    fn ln_cdf_matches_cdf_and_keeps_gamma_lower_tail() {
        for (family, shape) in
            [(Family::Exponential, None), (Family::Weibull, Some(0.7)), (Family::Gamma, Some(2.5))]
        {
            for &t in &TIMES {
                // Act
                let ln_f = family.ln_cdf(t, 0.2, shape).expect("valid");
                let f = family.cdf(t, 0.2, shape).expect("valid");

                // Assert
                assert_relative_eq!(ln_f.exp(), f, max_relative = 1e-10);
            }
            assert_eq!(family.ln_cdf(0.0, 0.2, shape), Ok(f64::NEG_INFINITY));
            assert_eq!(family.ln_cdf(f64::INFINITY, 0.2, shape), Ok(0.0));
        }

        // Arrange
        let (k, u) = (2.5_f64, 2e-9_f64);

        // Act
        let tail = Family::Gamma.ln_cdf(1e-8, 0.2, Some(k)).expect("valid");

        // Assert
        assert_abs_diff_eq!(tail, k * u.ln() - ln_gamma(k + 1.0), epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // Out-of-domain arguments are rejected with the matching variant.
    fn evaluators_reject_invalid_arguments() {
        // Act / Assert
        assert!(matches!(
            Family::Exponential.survival(-1.0, 1.0, None),
            Err(RegressionError::InvalidHorizon { .. })
        ));
        assert!(matches!(
            Family::Exponential.survival(1.0, 0.0, None),
            Err(RegressionError::InvalidRate { .. })
        ));
        assert!(matches!(
            Family::Weibull.survival(1.0, 1.0, None),
            Err(RegressionError::InvalidShape { family: "weibull", value: None })
        ));
        assert!(matches!(
            Family::Gamma.density(1.0, 1.0, Some(-2.0)),
            Err(RegressionError::InvalidShape { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Kernel scores match central differences of the kernels.
    //
    // Given
    // -----
    // - ln u ∈ {−2, 0.3, 1.5}, k = 1.8, step 1e-6 in ln λ (= ln u) and ln k.
    //
    // Expect
    // ------
    // - Both score entries within 1e-5 of the numeric derivative.
    fn kernel_scores_match_numeric_derivatives() {
        let h = 1e-6;
        let k = 1.8_f64;
        for family in [Family::Exponential, Family::Weibull, Family::Gamma] {
            for &ln_u in &[-2.0_f64, 0.3, 1.5] {
                // Arrange
                let kk = if family == Family::Exponential { 1.0 } else { k };
                let ln_s = family.ln_s_std(ln_u, kk);

                // Act
                let (g_rate, g_shape) = family.d_ln_g(ln_u, kk);
                let (s_rate, s_shape) = family.d_ln_s(ln_u, kk, ln_s);

                // Assert
                let num_g_rate = (family.ln_g(ln_u + h, kk) - family.ln_g(ln_u - h, kk)) / (2.0 * h);
                let num_s_rate =
                    (family.ln_s_std(ln_u + h, kk) - family.ln_s_std(ln_u - h, kk)) / (2.0 * h);
                assert_abs_diff_eq!(g_rate, num_g_rate, epsilon = 1e-5);
                assert_abs_diff_eq!(s_rate, num_s_rate, epsilon = 1e-5);
                if family != Family::Exponential {
                    let up = kk * h.exp();
                    let down = kk * (-h).exp();
                    let num_g_shape = (family.ln_g(ln_u, up) - family.ln_g(ln_u, down)) / (2.0 * h);
                    let num_s_shape =
                        (family.ln_s_std(ln_u, up) - family.ln_s_std(ln_u, down)) / (2.0 * h);
                    assert_abs_diff_eq!(g_shape, num_g_shape, epsilon = 1e-5);
                    assert_abs_diff_eq!(s_shape, num_s_shape, epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Descriptors and parsing round out the enum.
    fn descriptors_and_parsing() {
        // Act / Assert
        assert_eq!(Family::Exponential.n_shape_params(), 0);
        assert_eq!(Family::Gamma.shape_names(), &["k"]);
        assert_eq!("Weibull".parse::<Family>(), Ok(Family::Weibull));
        assert_eq!(" gamma ".parse::<Family>(), Ok(Family::Gamma));
        assert!(matches!(
            "lognormal".parse::<Family>(),
            Err(RegressionError::UnknownFamily { .. })
        ));
        assert_eq!(Family::Exponential.to_string(), "exponential");
    }
}
