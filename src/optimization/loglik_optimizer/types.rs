//! loglik_optimizer::types — numeric aliases and pre-wired solver types.
//!
//! Every optimizer module refers to these aliases instead of spelling out
//! `ndarray` containers or argmin generics, so the backend can change in one
//! place. `Theta` and `Grad` are column vectors of length `p` (number of free
//! parameters); `Hessian` is dense `p × p`.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense second-derivative matrix, `p × p`.
pub type Hessian = Array2<f64>;

/// Scalar objective value. The optimizer minimizes `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters keyed by argmin's names (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search on the crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search on the crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
