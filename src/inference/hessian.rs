//! inference::hessian — parameter covariance from the observed information.
//!
//! Purpose
//! -------
//! Turn the analytic gradient of a **mean** log-likelihood into the
//! asymptotic covariance of `θ̂`. The Hessian is formed by finite
//! differences of the gradient, negated into the observed information
//! `J(θ̂)`, and inverted with a truncated symmetric eigendecomposition.
//!
//! Key behaviors
//! -------------
//! - [`observed_covariance`] returns `Σ = J⁺ / n`, where `n` is the number
//!   of units the mean was taken over.
//! - [`standard_errors`] reads `sqrt(diag Σ)`.
//! - The eigen cutoff runs on the correlation-scaled information
//!   `R = D^{-1/2} J D^{-1/2}`, `D = diag(J)`, so rescaling a covariate
//!   column does not change which directions are kept.
//! - Eigenvalues of `R` below `max(EIGEN_EPS, NOISE_FACTOR · p · ε)` are
//!   dropped, where `ε` is the largest scaled asymmetry of the raw
//!   finite-difference Hessian. A flat direction (e.g. an intercept next to
//!   a full set of indicators) is dropped; identified directions keep
//!   their variance.
//!
//! Invariants & assumptions
//! ------------------------
//! - `compute_hessian` returns a finite, symmetric `p × p` matrix plus its
//!   entrywise asymmetry before symmetrization.
//! - `J⁺ = D^{-1/2} R⁺ D^{-1/2}` is a generalized inverse (`J J⁺ J = J`),
//!   so `aᵀ J⁺ a` is exact for every `a` in the range of `J`: every
//!   identified prediction gets its full variance.
//!
//! Conventions
//! -----------
//! - No explicit inverse is formed; `R⁺ = Σ_k q_k q_kᵀ / λ_k` over the kept
//!   eigenpairs.
//! - Coordinates with non-positive information are left unscaled.
//! - Errors are reported via [`InferenceResult`].
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::{
        loglik_optimizer::{Hessian, finite_diff::compute_hessian},
        numerical_stability::transformations::EIGEN_EPS,
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Multiple of the per-entry differencing error, times `p`, below which an
/// eigenvalue of the scaled information is treated as zero.
const NOISE_FACTOR: f64 = 10.0;

/// Asymptotic covariance of `θ̂` from the gradient of the mean
/// log-likelihood.
///
/// Parameters
/// ----------
/// - `mean_grad`: `θ ↦ ∇ℓ̄(θ)`, the analytic gradient of the mean
///   log-likelihood. Must be C¹ near `theta_hat`.
/// - `theta_hat`: the estimate at which the information is evaluated.
/// - `n_obs`: number of units averaged in `ℓ̄`; the covariance of the sum
///   scale is `J⁺ / n_obs`.
///
/// Errors
/// ------
/// - `InferenceError::Optimization` when the finite-difference Hessian is
///   non-finite or misshapen.
/// - `InferenceError::NonFiniteInformation` when `J(θ̂)` has no eigenvalue
///   above the noise cutoff.
///
/// Example
/// -------
/// ```rust
/// # use ndarray::{Array1, array};
/// # use convoys::inference::hessian::observed_covariance;
/// // ℓ̄(θ) = -½ θᵀ A θ with A = diag(4, 1), so J = A.
/// let grad = |t: &Array1<f64>| array![-4.0 * t[0], -t[1]];
/// let cov = observed_covariance(&grad, &array![0.0, 0.0], 10)?;
/// assert!((cov[[0, 0]] - 0.025).abs() < 1e-8);
/// assert!((cov[[1, 1]] - 0.1).abs() < 1e-8);
/// # Ok::<(), convoys::inference::errors::InferenceError>(())
/// ```
pub fn observed_covariance<F: Fn(&Array1<f64>) -> Array1<f64>>(
    mean_grad: &F, theta_hat: &Array1<f64>, n_obs: usize,
) -> InferenceResult<Array2<f64>> {
    let est = compute_hessian(mean_grad, theta_hat)?;
    let info = -est.hess;
    let mut cov = scaled_pseudo_inverse(&info, &est.asymmetry)?;
    let scale = (n_obs.max(1)) as f64;
    cov.mapv_inplace(|v| v / scale);
    Ok(cov)
}

/// Standard errors `sqrt(diag Σ)` of a covariance matrix.
pub fn standard_errors(cov: &Array2<f64>) -> Array1<f64> {
    cov.diag().mapv(|v| v.max(0.0).sqrt())
}

// ---- Helper methods ----

/// Generalized inverse of a symmetric information matrix, truncated on the
/// correlation scale.
///
/// `noise` holds the entrywise differencing error of `info`.
fn scaled_pseudo_inverse(info: &Hessian, noise: &Hessian) -> InferenceResult<Array2<f64>> {
    let p = info.nrows();
    let scale: Array1<f64> =
        info.diag().mapv(|d| if d.is_finite() && d > 0.0 { d.sqrt().recip() } else { 1.0 });

    let mut scaled = DMatrix::<f64>::zeros(p, p);
    let mut eps: f64 = 0.0;
    for i in 0..p {
        for j in 0..p {
            let s = scale[i] * scale[j];
            scaled[(i, j)] = info[[i, j]] * s;
            eps = eps.max(noise[[i, j]] * s);
        }
    }
    let cutoff = EIGEN_EPS.max(NOISE_FACTOR * p as f64 * eps);

    let eigen = scaled.symmetric_eigen();
    let q = eigen.eigenvectors;
    let eigenvals = eigen.eigenvalues;
    let max_eigen = eigenvals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max_eigen.is_finite() || max_eigen <= cutoff {
        return Err(InferenceError::NonFiniteInformation { max_eigen });
    }

    let mut inv = Array2::<f64>::zeros((p, p));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        for i in 0..p {
            let qi = q[(i, k)] / lambda;
            for j in 0..p {
                inv[[i, j]] += qi * q[(j, k)];
            }
        }
    }
    for ((i, j), v) in inv.indexed_iter_mut() {
        *v *= scale[i] * scale[j];
    }
    Ok(inv)
}
