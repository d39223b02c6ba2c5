//! Conversion data containers for cure-rate regression.
//!
//! Purpose
//! -------
//! Provide a validated, column-wise container for right-censored conversion
//! data: an `n × d` covariate matrix, a conversion indicator per unit, and a
//! time per unit (time to conversion when converted, censoring time
//! otherwise).
//!
//! Key behaviors
//! -------------
//! - [`ConversionData::new`] validates shapes and values once, so the
//!   likelihood and initialization code can assume clean inputs.
//! - [`ConversionData::from_units`] assembles the same container from a list
//!   of [`Unit`] records.
//! - [`ColumnProfile`] classifies covariate columns for the degeneracy
//!   checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one unit and one covariate column.
//! - Covariates are finite; times are finite and `≥ 0`.
//! - Indicators, times and covariate rows have equal length.
//! - The container is immutable after construction.
//!
//! Conventions
//! -----------
//! - Row `i` of the covariate matrix belongs to unit `i`. A leading column of
//!   ones acts as the intercept, but any constant non-zero column is
//!   recognized as one.
use crate::regression::errors::{RegressionError, RegressionResult};
use ndarray::{Array1, Array2, ArrayView1};

/// One observed unit: covariates, conversion indicator, and time.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub covariates: Vec<f64>,
    pub converted: bool,
    pub time: f64,
}

impl Unit {
    pub fn new(covariates: Vec<f64>, converted: bool, time: f64) -> Self {
        Self { covariates, converted, time }
    }
}

/// Classification of a covariate column across all units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnProfile {
    /// Every entry is exactly zero.
    Zero,
    /// Every entry equals this non-zero value.
    Constant(f64),
    /// At least two distinct values.
    Varying,
}

/// `ConversionData` — validated right-censored conversion dataset.
///
/// Fields
/// ------
/// - `covariates`: `n × d` matrix, finite entries.
/// - `converted`: length-`n` indicators; `true` means the time is an exact
///   time to conversion.
/// - `times`: length-`n` non-negative, finite times.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionData {
    covariates: Array2<f64>,
    converted: Vec<bool>,
    times: Array1<f64>,
}

impl ConversionData {
    /// Validate and wrap column-wise arrays.
    ///
    /// # Errors
    /// - `EmptyDataset` when there are no rows.
    /// - `ZeroCovariates` when there are no columns.
    /// - `LengthMismatch` when indicators or times disagree with the row
    ///   count.
    /// - `NonFiniteCovariate` for the first NaN/±inf covariate.
    /// - `InvalidTime` for the first negative or non-finite time.
    pub fn new(
        covariates: Array2<f64>, converted: Vec<bool>, times: Array1<f64>,
    ) -> RegressionResult<Self> {
        let (n, d) = covariates.dim();
        if n == 0 {
            return Err(RegressionError::EmptyDataset);
        }
        if d == 0 {
            return Err(RegressionError::ZeroCovariates);
        }
        if converted.len() != n {
            return Err(RegressionError::LengthMismatch {
                what: "indicators",
                expected: n,
                found: converted.len(),
            });
        }
        if times.len() != n {
            return Err(RegressionError::LengthMismatch {
                what: "times",
                expected: n,
                found: times.len(),
            });
        }
        if let Some(((row, col), &value)) =
            covariates.indexed_iter().find(|(_, v)| !v.is_finite())
        {
            return Err(RegressionError::NonFiniteCovariate { row, col, value });
        }
        if let Some((index, &value)) =
            times.iter().enumerate().find(|(_, t)| !t.is_finite() || **t < 0.0)
        {
            return Err(RegressionError::InvalidTime { index, value });
        }
        Ok(Self { covariates, converted, times })
    }

    /// Build a dataset from unit records.
    ///
    /// # Errors
    /// - `EmptyDataset` for an empty list.
    /// - `DimensionMismatch` when a unit's covariate length differs from the
    ///   first unit's.
    /// - Anything [`ConversionData::new`] reports.
    pub fn from_units(units: Vec<Unit>) -> RegressionResult<Self> {
        let d = match units.first() {
            Some(u) => u.covariates.len(),
            None => return Err(RegressionError::EmptyDataset),
        };
        let n = units.len();
        let mut covariates = Array2::<f64>::zeros((n, d));
        let mut converted = Vec::with_capacity(n);
        let mut times = Array1::<f64>::zeros(n);
        for (i, unit) in units.into_iter().enumerate() {
            if unit.covariates.len() != d {
                return Err(RegressionError::DimensionMismatch {
                    expected: d,
                    found: unit.covariates.len(),
                });
            }
            covariates.row_mut(i).assign(&ArrayView1::from(&unit.covariates[..]));
            converted.push(unit.converted);
            times[i] = unit.time;
        }
        Self::new(covariates, converted, times)
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Covariate dimensionality `d`.
    pub fn dim(&self) -> usize {
        self.covariates.ncols()
    }

    /// Number of converted units.
    pub fn n_converted(&self) -> usize {
        self.converted.iter().filter(|&&c| c).count()
    }

    /// Observed share of converted units.
    pub fn converted_share(&self) -> f64 {
        self.n_converted() as f64 / self.len() as f64
    }

    pub fn covariates(&self) -> &Array2<f64> {
        &self.covariates
    }

    pub fn converted(&self) -> &[bool] {
        &self.converted
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Covariates of unit `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.covariates.row(i)
    }

    /// Classify covariate column `j`.
    pub fn column_profile(&self, j: usize) -> ColumnProfile {
        let col = self.covariates.column(j);
        let first = col[0];
        if col.iter().any(|&v| v != first) {
            ColumnProfile::Varying
        } else if first == 0.0 {
            ColumnProfile::Zero
        } else {
            ColumnProfile::Constant(first)
        }
    }

    /// Index of the first constant non-zero column, if any.
    pub fn intercept_column(&self) -> Option<usize> {
        (0..self.dim()).find(|&j| matches!(self.column_profile(j), ColumnProfile::Constant(_)))
    }
}
