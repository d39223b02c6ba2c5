//! regression::core — data, families, parameters, and estimation plumbing.
//!
//! Purpose
//! -------
//! Hold the building blocks shared by the cure-rate likelihood and model:
//! validated conversion data, the distribution families, the θ ↔ model
//! parameter mapping, options, the optimizer start, and identifiability
//! checks.
//!
//! Key behaviors
//! -------------
//! - [`ConversionData`] / [`Unit`]: validated right-censored inputs.
//! - [`Family`]: Exponential, Weibull, Gamma with log-space survival and
//!   density, backed by [`incomplete_gamma`] for the gamma tail.
//! - [`CureParams`]: `(β_c, β_λ, k)` and the θ layout.
//! - [`CureOptions`]: optimizer options plus ridge penalty.
//! - [`initial_theta`]: closed-form start from intercept summaries.
//! - [`validate_identifiable`]: rejects datasets the model cannot identify.
//!
//! Conventions
//! -----------
//! - θ layout is `(β_c[0..d), β_λ[0..d), ln k)`.
//! - Nothing in this module runs the optimizer or logs.

pub mod data;
pub mod family;
pub mod incomplete_gamma;
pub mod init;
pub mod options;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{ColumnProfile, ConversionData, Unit};
pub use self::family::{Family, TIME_FLOOR};
pub use self::init::initial_theta;
pub use self::options::CureOptions;
pub use self::params::CureParams;
pub use self::validation::{validate_covariates, validate_identifiable};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::data::{ConversionData, Unit};
    pub use super::family::Family;
    pub use super::options::CureOptions;
    pub use super::params::CureParams;
}
