//! Errors for cure-rate regression (data validation, degeneracy checks,
//! estimation failures, and prediction-time misuse).
//!
//! This module defines the public error type [`RegressionError`] and its
//! coarse classification [`ErrorKind`]. Every failure reachable from the
//! regression API maps to exactly one kind:
//!
//! - [`ErrorKind::InvalidInput`]: the caller can fix the request (shapes,
//!   times, levels, options, `params` on a shapeless family).
//! - [`ErrorKind::FitDidNotConverge`]: the optimizer stopped on its
//!   iteration cap or the numerics broke down.
//! - [`ErrorKind::DegenerateDataset`]: the data cannot identify the model
//!   (no converters overall or within a 0/1 group, an all-zero or
//!   redundant constant covariate).
//!
//! ## Conventions
//! - **Indices are 0-based**; `row` is the unit, `col` the covariate.
//! - Errors from the optimization and inference layers convert through
//!   `From`, keeping their configuration/numerical split.
use crate::{inference::errors::InferenceError, optimization::errors::OptError};
use thiserror::Error;

/// Crate-wide result alias for regression operations.
pub type RegressionResult<T> = Result<T, RegressionError>;

/// Coarse classification of a [`RegressionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    FitDidNotConverge,
    DegenerateDataset,
}

/// Unified error type for cure-rate regression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    // ---- Input/data validation ----
    /// Dataset has no units.
    #[error("Dataset is empty.")]
    EmptyDataset,

    /// Covariates, indicators and times disagree in length.
    #[error("Length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },

    /// Covariate matrix has no columns.
    #[error("Covariate matrix must have at least one column.")]
    ZeroCovariates,

    /// Covariate vector does not match the fitted dimensionality.
    #[error("Covariate dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Covariate entry is NaN/±inf.
    #[error("Covariate at row {row}, column {col} is non-finite: {value}")]
    NonFiniteCovariate { row: usize, col: usize, value: f64 },

    /// Unit time is negative or non-finite.
    #[error("Time at index {index} must be finite and >= 0; got: {value}")]
    InvalidTime { index: usize, value: f64 },

    /// Prediction horizon is negative or NaN.
    #[error("Prediction horizon must be >= 0 (or +inf); got: {value}")]
    InvalidHorizon { value: f64 },

    /// Rate passed to a distribution function is not finite and > 0.
    #[error("Rate must be finite and > 0; got: {value}")]
    InvalidRate { value: f64 },

    /// Shape is missing, non-finite, or non-positive for a shaped family.
    #[error("{family} shape must be finite and > 0; got: {value:?}")]
    InvalidShape { family: &'static str, value: Option<f64> },

    /// Confidence level outside (0, 1).
    #[error("Confidence level must lie in (0, 1); got: {level}")]
    InvalidLevel { level: f64 },

    /// `params` requested on a family without shape parameters.
    #[error("The {family} family has no shape parameters.")]
    NoShapeParameters { family: &'static str },

    /// Family name could not be parsed.
    #[error("Unknown distribution family: {name}")]
    UnknownFamily { name: String },

    /// Ridge penalty is negative or non-finite.
    #[error("Ridge penalty must be finite and >= 0; got: {value}")]
    InvalidPenalty { value: f64 },

    /// Optimizer options were rejected.
    #[error("Invalid optimizer options: {0}")]
    InvalidOptions(OptError),

    // ---- Degenerate datasets ----
    /// No unit converted, so neither sub-model is identified.
    #[error("Dataset has no converted units among {n} units.")]
    NoConverters { n: usize },

    /// Covariate column is zero for every unit.
    #[error("Covariate column {col} is zero for every unit.")]
    ZeroColumn { col: usize },

    /// A second constant column duplicates the intercept.
    #[error("Covariate column {col} is constant and redundant with intercept column {intercept}.")]
    RedundantConstantColumn { col: usize, intercept: usize },

    /// Units with 0/1 covariate `col` equal to `level` include no converter,
    /// so that group's cure fraction has no finite estimate.
    #[error("No unit with covariate column {col} equal to {level} converted.")]
    NoConvertersInGroup { col: usize, level: u8 },

    // ---- Estimation ----
    /// Optimizer stopped without meeting a tolerance.
    #[error("Fit did not converge after {iterations} iterations: {status}")]
    NotConverged { status: String, iterations: usize },

    /// Optimizer or likelihood failed numerically.
    #[error("Optimization failed: {0}")]
    OptimizationFailed(OptError),

    /// Covariance or interval computation failed.
    #[error("Inference failed: {0}")]
    Inference(InferenceError),
}

impl RegressionError {
    /// Coarse kind used by callers to decide how to react.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegressionError::NoConverters { .. }
            | RegressionError::ZeroColumn { .. }
            | RegressionError::RedundantConstantColumn { .. }
            | RegressionError::NoConvertersInGroup { .. } => ErrorKind::DegenerateDataset,
            RegressionError::NotConverged { .. } | RegressionError::OptimizationFailed(_) => {
                ErrorKind::FitDidNotConverge
            }
            RegressionError::Inference(e) if !e.is_configuration() => ErrorKind::FitDidNotConverge,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl From<OptError> for RegressionError {
    fn from(err: OptError) -> Self {
        if err.is_configuration() {
            RegressionError::InvalidOptions(err)
        } else {
            RegressionError::OptimizationFailed(err)
        }
    }
}

impl From<InferenceError> for RegressionError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::InvalidLevel { level } => RegressionError::InvalidLevel { level },
            other => RegressionError::Inference(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The kind assigned to each group of variants.
    // - Conversions from optimizer and inference errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Each variant group lands in the documented kind.
    fn kind_classifies_variant_groups() {
        // Arrange
        let cases = [
            (RegressionError::EmptyDataset, ErrorKind::InvalidInput),
            (RegressionError::InvalidLevel { level: 2.0 }, ErrorKind::InvalidInput),
            (RegressionError::NoShapeParameters { family: "exponential" }, ErrorKind::InvalidInput),
            (RegressionError::NoConverters { n: 10 }, ErrorKind::DegenerateDataset),
            (RegressionError::ZeroColumn { col: 1 }, ErrorKind::DegenerateDataset),
            (
                RegressionError::NoConvertersInGroup { col: 2, level: 1 },
                ErrorKind::DegenerateDataset,
            ),
            (
                RegressionError::NotConverged { status: "MaxItersReached".into(), iterations: 5 },
                ErrorKind::FitDidNotConverge,
            ),
        ];

        // Act / Assert
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Optimizer configuration errors become invalid input; numerical
    // optimizer errors become non-convergence.
    //
    // Given
    // -----
    // - `OptError::InvalidLBFGSMem` and `OptError::NonFiniteCost`.
    //
    // Expect
    // ------
    // - Kinds InvalidInput and FitDidNotConverge respectively.
    fn opt_errors_split_by_configuration() {
        // Arrange
        let config = OptError::InvalidLBFGSMem { mem: 0, reason: "zero" };
        let numeric = OptError::NonFiniteCost { value: f64::INFINITY };

        // Act
        let a: RegressionError = config.into();
        let b: RegressionError = numeric.into();

        // Assert
        assert_eq!(a.kind(), ErrorKind::InvalidInput);
        assert_eq!(b.kind(), ErrorKind::FitDidNotConverge);
    }

    #[test]
    // Purpose
    // -------
    // Inference level errors surface as `InvalidLevel`; information failures
    // count as non-convergence.
    fn inference_errors_convert_by_cause() {
        // Act
        let level: RegressionError = InferenceError::InvalidLevel { level: 0.0 }.into();
        let info: RegressionError = InferenceError::NonFiniteInformation { max_eigen: -1.0 }.into();

        // Assert
        assert_eq!(level, RegressionError::InvalidLevel { level: 0.0 });
        assert_eq!(info.kind(), ErrorKind::FitDidNotConverge);
    }
}
