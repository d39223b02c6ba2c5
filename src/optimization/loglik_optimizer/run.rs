//! Execution helper that runs an `argmin` solver on a log-likelihood problem
//! and returns a validated [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin_math::ArgminL2Norm;
use log::{debug, info};

/// Run an `argmin` solver for a log-likelihood problem.
///
/// Shared by both line-search variants: sets `theta0` and `max_iters` on the
/// executor state, runs the solver, and converts the final state into an
/// [`OptimOutcome`] (best parameters, `ℓ(θ̂) = -c(θ̂)`, termination status,
/// iteration and evaluation counts, last gradient norm).
///
/// When `opts.verbose` is set, ℓ(θ₀) and ‖∇c(θ₀)‖ are logged at `info`
/// level before the first iteration.
///
/// # Errors
/// - Any `argmin` runtime error (including errors raised by the model inside
///   cost/gradient callbacks), converted into `OptError`.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let max_iter = opts.tols.max_iter;
    let result = Executor::new(problem, solver)
        .configure(|state| {
            let state = state.param(theta0);
            match max_iter {
                Some(m) => state.max_iters(m as u64),
                None => state,
            }
        })
        .run()?;

    let mut state = result.state().clone();
    let iterations = state.get_iter();
    let function_counts = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    debug!("L-BFGS stopped after {iterations} iterations: {termination:?}");
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => info!("init: ell(theta0) = {ll0:.6}, ||grad|| = {:.6}", g.l2_norm()),
        Err(_) => info!("init: ell(theta0) = {ll0:.6}"),
    }
    Ok(())
}
