//! loglik_optimizer::finite_diff — finite-difference gradients and Hessians.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate behind validated helpers so the optimizer and
//! inference layers can request derivatives without touching its API:
//!
//! - [`run_fd_diff`]: forward-difference gradient with error capture, used
//!   by the argmin adapter when a model has no analytic gradient.
//! - [`functional_gradient`]: central-difference gradient of a scalar
//!   functional of `θ` (falls back to forward differences), used by the
//!   delta-method intervals.
//! - [`compute_hessian`]: central-difference Jacobian of an analytic
//!   gradient (falls back to forward differences), symmetrized, used for the
//!   observed information. The removed asymmetry is returned as an estimate
//!   of the differencing error.
//!
//! Invariants
//! ----------
//! - Successful results always pass [`validate_grad`] / [`validate_hessian`].
//! - Errors raised inside an objective during differencing are captured in
//!   a `RefCell` slot and surfaced after the sweep.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// `func` cannot return `Result`, so callers store the first error raised by
/// the objective in `closure_err` and return `NaN`. This helper clears the
/// slot, differentiates, then returns the captured error if any, or the
/// validated gradient.
///
/// # Errors
/// - The captured objective error, converted into `OptError`.
/// - `OptError::InvalidGradient` if the result has non-finite entries.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Gradient of a scalar functional `g(θ)` at `theta`.
///
/// Central differences first; if any entry is non-finite (e.g. `g` is only
/// defined on one side of a boundary), forward differences are tried.
///
/// # Errors
/// - `OptError::InvalidGradient` when both schemes produce non-finite
///   entries.
pub fn functional_gradient<G: Fn(&Theta) -> f64>(func: &G, theta: &Theta) -> OptResult<Grad> {
    let dim = theta.len();
    let central = theta.central_diff(func);
    if validate_grad(&central, dim).is_ok() {
        return Ok(central);
    }
    let forward = theta.forward_diff(func);
    validate_grad(&forward, dim)?;
    Ok(forward)
}

/// Symmetrized finite-difference Hessian with its differencing error.
///
/// The exact Hessian is symmetric, so `|H_ij − H_ji| / 2` of the raw
/// Jacobian measures the finite-difference error in that entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HessianEstimate {
    /// Symmetric `p × p` Hessian.
    pub hess: Hessian,
    /// Entrywise `|H_ij − H_ji| / 2` of the raw Jacobian; zero diagonal.
    pub asymmetry: Hessian,
}

/// Hessian of a scalar objective from its analytic gradient `f`.
///
/// Central-difference Jacobian of `f` at `theta`; on a validation failure the
/// forward-difference Jacobian is used instead. The accepted matrix is
/// symmetrized by averaging off-diagonal pairs.
///
/// # Errors
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<HessianEstimate> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    let asymmetry = symmetrize_hess(&mut hess);
    Ok(HessianEstimate { hess, asymmetry })
}

// ---- Helper methods ----

/// Average each off-diagonal pair in place and return the half-differences
/// that were removed; the diagonal is untouched.
fn symmetrize_hess(hess: &mut Hessian) -> Hessian {
    let mut asymmetry = Hessian::zeros(hess.raw_dim());
    for i in 0..hess.nrows() {
        for j in 0..i {
            let half_gap = 0.5 * (hess[[i, j]] - hess[[j, i]]).abs();
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
            asymmetry[[i, j]] = half_gap;
            asymmetry[[j, i]] = half_gap;
        }
    }
    asymmetry
}
