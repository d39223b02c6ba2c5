//! High-level entry point for maximizing a `LogLikelihood`.
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(&theta0, data)`.
/// - Builds the solver for `opts.line_searcher` and runs it from `theta0`.
///
/// # Errors
/// - Propagates errors from `f.check`, the builders, and the run itself
///   (line-search breakdown, non-finite costs raised by the model).
///
/// # Returns
/// An [`OptimOutcome`]. A run that stops on the iteration cap returns `Ok`
/// with `converged == false`; deciding whether that is fatal is left to the
/// caller.
///
/// # Example
/// ```no_run
/// use convoys::optimization::errors::OptResult;
/// use convoys::optimization::loglik_optimizer::{
///     LogLikelihood, MLEOptions, Theta, maximize,
/// };
/// use ndarray::array;
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Concave, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// assert!(out.converged);
/// # Ok::<(), convoys::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Grad, Tolerances},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end maximization of a smooth concave toy likelihood with both
    //   line searches.
    // - Propagation of `check` failures before any solver work.
    // - Reporting an iteration-capped run as not converged.
    // -------------------------------------------------------------------------

    /// `ℓ(θ) = -Σ wᵢ (θᵢ - mᵢ)²` with analytic gradient.
    struct WeightedQuadratic {
        m: Theta,
        w: Theta,
    }

    impl LogLikelihood for WeightedQuadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            let d = theta - &self.m;
            Ok(-(&self.w * &d * &d).sum())
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            if theta.len() != self.m.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: self.m.len(),
                    found: theta.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(&self.w * &(theta - &self.m) * -2.0)
        }
    }

    fn toy() -> WeightedQuadratic {
        WeightedQuadratic { m: array![1.5, -0.5, 3.0], w: array![1.0, 10.0, 0.1] }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the known maximizer and report convergence.
    //
    // Given
    // -----
    // - Weighted quadratic with maximizer m = (1.5, -0.5, 3.0).
    //
    // Expect
    // ------
    // - `converged == true`, θ̂ ≈ m, ℓ(θ̂) ≈ 0.
    fn maximize_recovers_quadratic_maximizer_with_both_line_searches() {
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let model = toy();
            let opts = MLEOptions { line_searcher: ls, ..MLEOptions::default() };

            // Act
            let out = maximize(&model, array![0.0, 0.0, 0.0], &(), &opts)
                .expect("quadratic maximization should succeed");

            // Assert
            assert!(out.converged, "{ls:?} should converge, status {}", out.status);
            for (est, target) in out.theta_hat.iter().zip(model.m.iter()) {
                assert!((est - target).abs() < 1e-4, "{ls:?}: {est} vs {target}");
            }
            assert!(out.value.abs() < 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before the solver and its error is returned unchanged.
    fn maximize_propagates_check_failure() {
        // Arrange
        let model = toy();

        // Act
        let err = maximize(&model, array![0.0], &(), &MLEOptions::default())
            .expect_err("wrong length must fail");

        // Assert
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 3, found: 1 });
    }

    #[test]
    // Purpose
    // -------
    // A run stopped by the iteration cap comes back with `converged == false`.
    //
    // Given
    // -----
    // - max_iter = 1, tiny gradient tolerance, badly scaled start.
    //
    // Expect
    // ------
    // - `Ok(outcome)` with `converged == false` and at most one iteration.
    fn maximize_reports_iteration_cap_as_not_converged() {
        // Arrange
        let model = toy();
        let tols = Tolerances::new(Some(1e-14), None, Some(1)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid");

        // Act
        let out = maximize(&model, array![100.0, -100.0, 50.0], &(), &opts)
            .expect("capped run still yields an outcome");

        // Assert
        assert!(!out.converged);
        assert!(out.iterations <= 1);
    }
}
