//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to fit the cure-rate regressions: an
//! argmin-backed log-likelihood maximizer, log-space numerical primitives,
//! and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: maximize `ℓ(θ)` with L-BFGS (More–Thuente or
//!   Hager–Zhang), with finite-difference fallbacks and validated outcomes.
//! - [`numerical_stability`]: logistic/log-sigmoid, log-sum-exp, capped
//!   exponentials, and eigenvalue cutoffs shared with inference.
//! - [`errors`]: [`OptError`](errors::OptError) and
//!   [`OptResult<T>`](errors::OptResult), including conversions from argmin
//!   errors.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; everything
//!   user-facing is on the `ℓ` scale.
//! - Parameters, gradients and Hessians use the `ndarray` aliases in
//!   [`loglik_optimizer::types`].
//! - Progress reporting goes through the `log` facade only when
//!   `MLEOptions::verbose` is set; no logger is installed here.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
