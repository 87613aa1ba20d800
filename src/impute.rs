//! Missing value imputation applied before any evaluation fold is built.
//!
//! Targets are forward filled: the last observed value is carried into a gap.
//! Exogenous counters (promotions and the like) are zero filled, since an
//! absent record means "no promotion" rather than "unknown".
//!
//! # Example
//!
//! ```
//! use forecast_eval::impute::fill_zero;
//!
//! let promos = fill_zero(&[f64::NAN, 1.0, f64::NAN, 0.0]);
//! assert_eq!(promos, vec![0.0, 1.0, 0.0, 0.0]);
//! ```

use crate::core::{ExogenousFrame, TimeSeries};
use crate::error::{ForecastError, Result};

fn is_missing(v: f64) -> bool {
    !v.is_finite()
}

/// Forward fill a slice; leading gaps stay missing.
pub fn fill_forward(values: &[f64]) -> Vec<f64> {
    let mut last_valid = None;
    values
        .iter()
        .map(|&v| {
            if is_missing(v) {
                last_valid.unwrap_or(v)
            } else {
                last_valid = Some(v);
                v
            }
        })
        .collect()
}

/// Replace every missing value with zero.
pub fn fill_zero(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if is_missing(v) { 0.0 } else { v })
        .collect()
}

/// Forward fill a target series.
///
/// Fails with `MissingValues` when the series starts with a gap, since there
/// is no earlier observation to propagate.
pub fn forward_fill(series: &TimeSeries) -> Result<TimeSeries> {
    let filled = fill_forward(series.values());
    if filled.first().is_some_and(|v| is_missing(*v)) {
        return Err(ForecastError::MissingValues);
    }
    series.with_values(filled)
}

/// Zero fill every column of an exogenous frame.
pub fn zero_fill(frame: &ExogenousFrame) -> Result<ExogenousFrame> {
    let names: Vec<String> = frame.columns().keys().cloned().collect();
    zero_fill_columns(frame, &names)
}

/// Zero fill the named columns, leaving the others untouched.
pub fn zero_fill_columns<S: AsRef<str>>(
    frame: &ExogenousFrame,
    names: &[S],
) -> Result<ExogenousFrame> {
    let mut out = frame.clone();
    for name in names {
        let name = name.as_ref();
        let column = frame.column(name).ok_or_else(|| {
            ForecastError::DataFormat(format!("exogenous frame has no column '{name}'"))
        })?;
        out = out.with_column(name, fill_zero(column))?;
    }
    Ok(out)
}
