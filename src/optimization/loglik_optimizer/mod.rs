//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide a small, model-agnostic layer for **maximizing log-likelihoods**
//! `ℓ(θ)`. A model implements [`LogLikelihood`] and calls [`maximize`] to run
//! L-BFGS with a configurable line search, tolerances, and finite-difference
//! fallbacks.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)` and flips analytic gradients.
//! - [`maximize`] validates `θ₀` with [`LogLikelihood::check`], builds the
//!   solver via [`builders`], runs it via [`run::run_lbfgs`], and returns an
//!   [`OptimOutcome`].
//! - [`finite_diff`] supplies gradients/Hessians by finite differences with
//!   validation, both for the optimizer and for post-fit inference.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models implement `ℓ(θ)` and `∇ℓ(θ)`, never the cost.
//! - Invalid inputs surface as [`OptError`](crate::optimization::errors::OptError)
//!   values; nothing here panics.
//! - [`OptimOutcome::converged`] is `true` only for tolerance-based stops.
//!
//! Conventions
//! -----------
//! - Parameters live in unconstrained space as [`Theta`]; mapping to
//!   constrained model parameters is the model's job.
//! - [`OptimOutcome::value`] is reported on the `ℓ` scale.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions ([`adapter`]), solver wiring
//!   ([`builders`]), derivative helpers ([`finite_diff`]), validation
//!   ([`validation`]), configuration/outcome invariants ([`traits`]), and a
//!   toy end-to-end run ([`api`]).
//! - The regression integration tests exercise the full stack on simulated
//!   conversion data.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
