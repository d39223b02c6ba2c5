//! Estimation options for cure-rate regression.
//!
//! [`CureOptions`] bundles the optimizer configuration with the optional
//! ridge penalty on the regression weights. The defaults are the optimizer
//! defaults (tol_grad 1e-6, tol_cost 1e-12, 1000 iterations, More–Thuente)
//! with no penalty.
use crate::{
    optimization::loglik_optimizer::MLEOptions,
    regression::errors::{RegressionError, RegressionResult},
};

/// `CureOptions` — optimizer settings plus ridge penalty.
///
/// Fields are private so every instance has passed [`CureOptions::new`] (or
/// is the default).
///
/// Fields
/// ------
/// - `mle_opts`: tolerances, line search, verbosity and L-BFGS memory.
/// - `l2_penalty`: `α ≥ 0` in the penalty `0.5 · α · ‖β‖²` subtracted from
///   the total log-likelihood; `ln k` is never penalized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CureOptions {
    mle_opts: MLEOptions,
    l2_penalty: f64,
}

impl CureOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - `InvalidPenalty` if `l2_penalty` is negative or non-finite.
    pub fn new(mle_opts: MLEOptions, l2_penalty: f64) -> RegressionResult<Self> {
        if !l2_penalty.is_finite() || l2_penalty < 0.0 {
            return Err(RegressionError::InvalidPenalty { value: l2_penalty });
        }
        Ok(Self { mle_opts, l2_penalty })
    }

    pub fn mle_opts(&self) -> &MLEOptions {
        &self.mle_opts
    }

    /// Ridge penalty `α`; always finite and `≥ 0`.
    pub fn l2_penalty(&self) -> f64 {
        self.l2_penalty
    }
}
