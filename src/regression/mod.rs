//! regression — cure-rate conversion regression.
//!
//! Purpose
//! -------
//! Model the probability that a unit with covariates `x` has converted by
//! time `t` as `c(x) · F(t)`, where `c(x) = σ(β_c·x)` is the eventual
//! conversion probability and `F` is the CDF of an exponential, Weibull, or
//! gamma time-to-conversion with rate `λ(x) = exp(β_λ·x)`. Units that have
//! not converted are right-censored at their observed time.
//!
//! Layout
//! ------
//! - [`core`]: data, families, parameters, options, validation.
//! - [`models`]: likelihood, [`CureModel`](models::CureModel), and
//!   [`FittedCure`](models::FittedCure).
//! - [`errors`]: [`RegressionError`](errors::RegressionError) and its
//!   coarse [`ErrorKind`](errors::ErrorKind).

pub mod core;
pub mod errors;
pub mod models;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{ErrorKind, RegressionError, RegressionResult};
    pub use super::models::{CureModel, FittedCure, Prediction};
}
