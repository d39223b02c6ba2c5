//! regression::models — likelihood, estimator, and fitted model.
//!
//! - [`likelihood`]: the cure-rate log-likelihood behind the optimizer.
//! - [`cure`]: [`CureModel`], configuration and `fit`.
//! - [`fitted`]: [`FittedCure`] and [`Prediction`], the immutable result.

pub mod cure;
pub mod fitted;
pub mod likelihood;

pub use self::cure::CureModel;
pub use self::fitted::{FittedCure, Prediction};
pub use self::likelihood::CureLikelihood;
