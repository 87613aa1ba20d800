//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Accuracy of a set of forecast points.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Mean Absolute Scaled Error (None if the scale is zero or unknown)
    pub mase: Option<f64>,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// `scale` is the in-sample naive error used for MASE, usually from
/// [`naive_scale`] on the training window.
pub fn calculate_metrics(
    actual: &[f64],
    predicted: &[f64],
    scale: Option<f64>,
) -> Result<AccuracyMetrics> {
    let mae = mae(actual, predicted)?;
    let mape = mape(actual, predicted)?;
    let mase = scale.and_then(|s| scaled(mae, s));
    Ok(AccuracyMetrics { mae, mape, mase })
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Mean absolute percentage error, in percent.
///
/// `None` when any actual value is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<Option<f64>> {
    check_lengths(actual, predicted)?;
    if actual.contains(&0.0) {
        return Ok(None);
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    Ok(Some(100.0 * sum / actual.len() as f64))
}

/// Mean absolute (seasonal) first difference of a training window.
///
/// This is the in-sample error of the naive forecast and the denominator of
/// MASE. `None` when the window is not longer than the period.
pub fn naive_scale(train: &[f64], seasonal_period: usize) -> Option<f64> {
    let m = seasonal_period.max(1);
    if train.len() <= m {
        return None;
    }
    let sum: f64 = train.windows(m + 1).map(|w| (w[m] - w[0]).abs()).sum();
    Some(sum / (train.len() - m) as f64)
}

/// Mean absolute scaled error for a single scale.
pub fn mase(actual: &[f64], predicted: &[f64], scale: f64) -> Result<Option<f64>> {
    Ok(scaled(mae(actual, predicted)?, scale))
}

fn scaled(error: f64, scale: f64) -> Option<f64> {
    if scale > 0.0 && scale.is_finite() {
        Some(error / scale)
    } else {
        None
    }
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}
