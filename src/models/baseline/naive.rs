//! Naive forecasting model.
//!
//! The naive method simply forecasts the last observed value for all future periods.

use crate::core::{ExogenousFrame, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::traits::reject_exog;
use crate::models::Forecaster;

/// Naive forecaster that repeats the last value.
#[derive(Debug, Clone, Default)]
pub struct NaiveLast {
    last_value: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl NaiveLast {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for NaiveLast {
    fn fit(&mut self, series: &TimeSeries, exog: Option<&ExogenousFrame>) -> Result<()> {
        reject_exog(self.name(), exog)?;
        let values = series.values();
        let &last = values.last().ok_or(ForecastError::EmptyData)?;

        // Fitted values are shifted history (y_hat[t] = y[t-1])
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(f64::NAN);
        fitted.extend_from_slice(&values[..values.len() - 1]);

        let residuals = values
            .iter()
            .zip(&fitted)
            .map(|(y, f)| y - f)
            .collect();

        self.last_value = Some(last);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize, exog: Option<&ExogenousFrame>) -> Result<Forecast> {
        reject_exog(self.name(), exog)?;
        let last = self.last_value.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![last; horizon]))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "NaiveLast"
    }
}
