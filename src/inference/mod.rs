//! inference — covariance and confidence intervals for fitted models.
//!
//! Purpose
//! -------
//! Post-estimation uncertainty for models fitted in the unconstrained
//! parameter space `θ`: the observed-information covariance of `θ̂` and
//! delta-method intervals for scalar functionals of `θ̂`.
//!
//! Key behaviors
//! -------------
//! - [`observed_covariance`] builds `Σ = J(θ̂)⁺ / n` from the gradient of a
//!   mean log-likelihood, truncating flat directions.
//! - [`delta_interval`] / [`normal_interval`] form
//!   `g(θ̂) ± z·sqrt(∇gᵀ Σ ∇g)`; [`Interval`] maps the bounds through a
//!   monotone link such as the logistic.
//! - [`InferenceError`] / [`InferenceResult`] unify failures.
//!
//! Conventions
//! -----------
//! - Gradients supplied to this module are on the **mean** log-likelihood
//!   scale; the sample size enters only through `observed_covariance`.
//! - Nothing here logs or holds state; callers decide how to degrade when
//!   the information matrix is unusable.
//!
//! Testing notes
//! -------------
//! - Unit tests use quadratic log-likelihoods with closed-form information.
//! - The regression integration tests compare interval widths against
//!   Beta-posterior widths on simulated cohorts.

pub mod errors;
pub mod hessian;
pub mod interval;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{observed_covariance, standard_errors};
pub use self::interval::{Interval, delta_interval, normal_interval, normal_quantile};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::{observed_covariance, standard_errors};
    pub use super::interval::{Interval, delta_interval, normal_interval};
}
