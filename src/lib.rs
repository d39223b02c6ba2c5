//! convoys — cure-rate regression for conversion data.
//!
//! Purpose
//! -------
//! Estimate, from right-censored observations, the probability that a unit
//! eventually converts and how long conversion takes, as functions of the
//! unit's covariates. A fitted model answers "what fraction of units like `x`
//! will have converted by time `t`?" with delta-method confidence intervals.
//!
//! Key behaviors
//! -------------
//! - [`regression`]: datasets, distribution families (exponential, Weibull,
//!   gamma), the [`CureModel`](regression::models::CureModel) estimator, and
//!   the immutable [`FittedCure`](regression::models::FittedCure).
//! - [`optimization`]: a generic `LogLikelihood` trait driven by argmin's
//!   L-BFGS, finite-difference helpers, and numerically stable transforms.
//! - [`inference`]: observed-information covariance and normal intervals.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fitting is synchronous and deterministic; the library draws no random
//!   numbers.
//! - Models and fits hold no interior mutability and are `Send + Sync`.
//! - Every fallible entry point returns a typed error; nothing panics on bad
//!   input.
//!
//! Conventions
//! -----------
//! - Times are non-negative reals in caller-chosen units; rates are per unit
//!   of that time.
//! - Diagnostics go through the `log` facade (`debug!`, `info!`, `warn!`); no
//!   logger is installed by the library.
//!
//! Example
//! -------
//! ```rust
//! use convoys::prelude::*;
//! use ndarray::array;
//!
//! let data = ConversionData::new(
//!     array![[1.0], [1.0], [1.0], [1.0], [1.0], [1.0], [1.0], [1.0]],
//!     vec![true, false, true, true, false, false, true, false],
//!     array![0.4, 12.0, 1.5, 2.2, 12.0, 12.0, 0.9, 12.0],
//! )?;
//! let fit = CureModel::exponential().fit(&data)?;
//! let by_five = fit.predict_ci(&[1.0], 5.0, 0.95)?;
//! assert!(by_five.low <= by_five.value && by_five.value <= by_five.high);
//! # Ok::<(), convoys::regression::errors::RegressionError>(())
//! ```

pub mod inference;
pub mod optimization;
pub mod regression;

pub mod prelude {
    pub use crate::regression::prelude::*;
}
