//! numerical_stability — guarded transforms for log-space likelihood work.
//!
//! Purpose
//! -------
//! Collect the small numeric primitives shared by the likelihood, optimizer,
//! and inference layers: the logistic link in linear and log space, log-space
//! sums, and the tolerances used for clamping and eigenvalue truncation.
//!
//! Key behaviors
//! -------------
//! - [`safe_logistic`] / [`log_sigmoid`] evaluate the cure-probability link
//!   without overflow in either tail.
//! - [`log_add_exp`] and [`log1m_exp`] let censored contributions
//!   `ln((1 − c) + c·S)` and cdf logs `ln(1 − S)` be formed from log
//!   survivals that may be extremely negative.
//! - [`capped_exp`] keeps `exp` finite for wild line-search trial steps.
//!
//! Invariants & assumptions
//! ------------------------
//! - All helpers return finite values for finite inputs, except the
//!   documented `−∞` boundary cases of the log-space functions.
//!
//! Downstream usage
//! ----------------
//! - The regression likelihood composes these helpers per unit.
//! - `inference::hessian` uses [`EIGEN_EPS`] for pseudo-inverse truncation.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare against naïve formulas on safe
//!   grids and check tail behavior.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, EXP_ARG_MAX, LOGIT_EPS, capped_exp, log_add_exp, log_sigmoid, log1m_exp, logit,
    safe_logistic, safe_softplus,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, LOGIT_EPS, log_add_exp, log_sigmoid, log1m_exp, logit, safe_logistic,
    };
}
