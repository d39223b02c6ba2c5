//! Identifiability checks run before any optimizer work.
//!
//! A dataset is rejected as degenerate when the model cannot be identified
//! from it:
//!
//! - no unit converted (neither `c` nor `λ` is informed);
//! - a covariate column is zero for every unit;
//! - more than one column is constant and non-zero (a second intercept);
//! - a 0/1 column has no converters among its 1-rows, or, next to an
//!   intercept, among its 0-rows. The likelihood then keeps increasing as
//!   that group's cure fraction goes to 0, so no finite maximum exists.
//!
//! Varying columns that are collinear with the intercept (e.g. a full set of
//! group indicators) are allowed; the flat direction they create is handled
//! by the truncated pseudo-inverse at inference time.
use crate::regression::{
    core::data::{ColumnProfile, ConversionData},
    errors::{RegressionError, RegressionResult},
};

/// Reject datasets that cannot identify the cure-rate model.
///
/// # Errors
/// - `NoConverters`, `ZeroColumn`, `RedundantConstantColumn`, or
///   `NoConvertersInGroup`, checked in that order.
pub fn validate_identifiable(data: &ConversionData) -> RegressionResult<()> {
    if data.n_converted() == 0 {
        return Err(RegressionError::NoConverters { n: data.len() });
    }
    let mut intercept: Option<usize> = None;
    for j in 0..data.dim() {
        match data.column_profile(j) {
            ColumnProfile::Zero => return Err(RegressionError::ZeroColumn { col: j }),
            ColumnProfile::Constant(_) => match intercept {
                Some(first) => {
                    return Err(RegressionError::RedundantConstantColumn {
                        col: j,
                        intercept: first,
                    });
                }
                None => intercept = Some(j),
            },
            ColumnProfile::Varying => {}
        }
    }
    check_binary_groups(data, intercept.is_some())
}

/// Check a prediction-time covariate vector against the fitted dimension.
///
/// # Errors
/// - `DimensionMismatch` for a wrong length.
/// - `NonFiniteCovariate` (row 0) for a NaN/±inf entry.
pub fn validate_covariates(x: &[f64], dim: usize) -> RegressionResult<()> {
    if x.len() != dim {
        return Err(RegressionError::DimensionMismatch { expected: dim, found: x.len() });
    }
    match x.iter().position(|v| !v.is_finite()) {
        Some(col) => Err(RegressionError::NonFiniteCovariate { row: 0, col, value: x[col] }),
        None => Ok(()),
    }
}

// ---- Helper methods ----

/// Reject 0/1 columns where one level has no converters. The 0-level only
/// separates when an intercept can absorb the shift.
fn check_binary_groups(data: &ConversionData, has_intercept: bool) -> RegressionResult<()> {
    let binary: Vec<usize> = (0..data.dim())
        .filter(|&j| {
            matches!(data.column_profile(j), ColumnProfile::Varying)
                && data.covariates().column(j).iter().all(|&v| v == 0.0 || v == 1.0)
        })
        .collect();
    if binary.is_empty() {
        return Ok(());
    }

    // seen[b][level]: some converter has column binary[b] == level
    let mut seen = vec![[false; 2]; binary.len()];
    for (i, _) in data.converted().iter().enumerate().filter(|(_, c)| **c) {
        let row = data.row(i);
        for (levels, &j) in seen.iter_mut().zip(&binary) {
            levels[usize::from(row[j] == 1.0)] = true;
        }
    }
    for (levels, &col) in seen.iter().zip(&binary) {
        if !levels[1] {
            return Err(RegressionError::NoConvertersInGroup { col, level: 1 });
        }
        if has_intercept && !levels[0] {
            return Err(RegressionError::NoConvertersInGroup { col, level: 0 });
        }
    }
    Ok(())
}
