//! Starting point for the optimizer.
//!
//! The intercept weights are set from closed-form summaries of the data and
//! every other weight starts at zero:
//!
//! - `β_c[intercept] = logit(n_converted / n) / x_intercept`;
//! - `β_λ[intercept] = −ln(mean converted time) / x_intercept`, with the
//!   mean floored at `TIME_FLOOR`;
//! - `ln k = 0` (the exponential special case for Weibull and `k = 1` for
//!   Gamma).
//!
//! Without a constant column all weights start at zero.
use crate::{
    optimization::{loglik_optimizer::Theta, numerical_stability::transformations::logit},
    regression::core::{
        data::{ColumnProfile, ConversionData},
        family::{Family, TIME_FLOOR},
        params::theta_len,
    },
};

/// Initial θ for `family` on `data`.
pub fn initial_theta(data: &ConversionData, family: Family) -> Theta {
    let d = data.dim();
    let mut theta = Theta::zeros(theta_len(family, d));
    let Some(j) = data.intercept_column() else {
        return theta;
    };
    let ColumnProfile::Constant(scale) = data.column_profile(j) else {
        return theta;
    };

    theta[j] = logit(data.converted_share()) / scale;

    let (sum, count) = data
        .converted()
        .iter()
        .zip(data.times().iter())
        .filter(|(c, _)| **c)
        .fold((0.0, 0usize), |(s, n), (_, &t)| (s + t, n + 1));
    if count > 0 {
        let mean_time = (sum / count as f64).max(TIME_FLOOR);
        theta[d + j] = -mean_time.ln() / scale;
    }
    theta
}
