//! Unified error handling for post-fit inference.
//!
//! `InferenceError` covers failures while turning a fitted `θ̂` into a
//! covariance matrix or a confidence interval: bad confidence levels,
//! shape mismatches between gradients and covariances, a degenerate
//! observed information, and errors bubbling up from the finite-difference
//! layer. `InferenceResult<T>` is the matching result alias.
use crate::optimization::errors::OptError;
use thiserror::Error;

pub type InferenceResult<T> = Result<T, InferenceError>;

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    // ---- Interval configuration ----
    /// Confidence level outside the open interval (0, 1).
    #[error("Inference Error: confidence level must lie in (0, 1), got {level}")]
    InvalidLevel { level: f64 },

    // ---- Shapes ----
    /// Covariance matrix is not `dim × dim`.
    #[error("Inference Error: covariance must be {expected}x{expected}, found {found:?}")]
    CovarianceDimMismatch { expected: usize, found: (usize, usize) },

    /// Functional gradient length does not match the covariance dimension.
    #[error("Inference Error: gradient length {found} does not match parameter dimension {expected}")]
    GradientDimMismatch { expected: usize, found: usize },

    // ---- Numerical ----
    /// Observed information has no eigenvalue above the truncation cutoff.
    #[error("Inference Error: observed information is not positive in any direction (largest eigenvalue {max_eigen})")]
    NonFiniteInformation { max_eigen: f64 },

    /// Normal quantile could not be evaluated.
    #[error("Inference Error: normal quantile unavailable: {0}")]
    Distribution(String),

    // ---- Passthrough ----
    /// Failure inside the finite-difference or validation layer.
    #[error(transparent)]
    Optimization(#[from] OptError),
}

impl InferenceError {
    /// Whether the error stems from caller input rather than the numerics.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            InferenceError::InvalidLevel { .. }
                | InferenceError::CovarianceDimMismatch { .. }
                | InferenceError::GradientDimMismatch { .. }
        )
    }
}
