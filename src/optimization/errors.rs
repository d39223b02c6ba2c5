//! Error surface for the log-likelihood optimizer.
//!
//! [`OptError`] groups configuration mistakes (tolerances, line search,
//! L-BFGS memory), numerical failures (non-finite cost, gradient, Hessian or
//! estimates) and wrapped `argmin` backend errors. [`OptResult<T>`] is the
//! result alias used by every fallible optimizer routine.
use argmin::core::{ArgminError, Error};
use thiserror::Error;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    #[error("Gradient optimization not implemented")]
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    #[error("Gradient dimension mismatch: expected {expected}, found {found}")]
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite
    #[error("Invalid gradient at index {index}: {value}: {reason}")]
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    #[error("Invalid gradient tolerance {tol}: {reason}")]
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost change tolerance needs to be positive and finite.
    #[error("Invalid cost function change tolerance {tol}: {reason}")]
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    #[error("Invalid maximum iterations {max_iter}: {reason}")]
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one tolerance must be provided.
    #[error("No tolerances provided")]
    NoTolerancesProvided,

    /// Invalid line searcher name.
    #[error("Invalid line searcher '{name}': {reason}")]
    InvalidLineSearch { name: String, reason: &'static str },

    /// lbfgs_mem needs to be at least 1.
    #[error("Invalid L-BFGS memory {mem}: {reason}")]
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Parameter vector ----
    /// Initial or trial parameter vector has the wrong length.
    #[error("Theta length mismatch: expected {expected}, found {found}")]
    ThetaLengthMismatch { expected: usize, found: usize },

    /// Initial or trial parameter vector contains a non-finite entry.
    #[error("Invalid theta input at index {index}: {value}, must be finite")]
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    #[error("Non-finite cost value: {value}")]
    NonFiniteCost { value: f64 },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    #[error("Invalid estimated parameter at index {index}: {value}: {reason}")]
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    #[error("Missing estimated parameters (theta hat)")]
    MissingThetaHat,

    // ---- Argmin ---
    #[error("Invalid parameter: {text}")]
    InvalidParameter { text: String },
    #[error("Not implemented: {text}")]
    NotImplemented { text: String },
    #[error("Not initialized: {text}")]
    NotInitialized { text: String },
    #[error("Condition violated: {text}")]
    ConditionViolated { text: String },
    #[error("Checkpoint not found: {text}")]
    CheckPointNotFound { text: String },
    #[error("Potential bug: {text}")]
    PotentialBug { text: String },
    #[error("Impossible error: {text}")]
    ImpossibleError { text: String },
    /// Any other backend failure (line-search breakdown, user error text).
    #[error("Backend error: {text}")]
    BackendError { text: String },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    #[error("Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}")]
    HessianDimMismatch { expected: usize, found: (usize, usize) },

    /// Hessian values need to be finite.
    #[error("Invalid Hessian at ({row}, {col}): {value}, must be finite")]
    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- Fallback ----
    #[error("Unknown error")]
    UnknownError,
}

impl OptError {
    /// `true` for errors caused by invalid optimizer configuration rather
    /// than by the data or the numerical run.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OptError::InvalidTolGrad { .. }
                | OptError::InvalidTolCost { .. }
                | OptError::InvalidMaxIter { .. }
                | OptError::NoTolerancesProvided
                | OptError::InvalidLineSearch { .. }
                | OptError::InvalidLBFGSMem { .. }
        )
    }
}

impl From<Error> for OptError {
    /// Recover an `OptError` raised inside a cost/gradient callback, map
    /// `ArgminError` variants one-to-one, and keep the text of anything else.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}
