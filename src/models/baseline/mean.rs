//! Historical mean forecaster.

use crate::core::{ExogenousFrame, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::traits::reject_exog;
use crate::models::Forecaster;

/// Forecasts the mean of the whole training window for every step.
#[derive(Debug, Clone, Default)]
pub struct NaiveMean {
    mean: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl NaiveMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean of the training window, once fitted.
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }
}

impl Forecaster for NaiveMean {
    fn fit(&mut self, series: &TimeSeries, exog: Option<&ExogenousFrame>) -> Result<()> {
        reject_exog(self.name(), exog)?;
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        self.mean = Some(mean);
        self.fitted = Some(vec![mean; values.len()]);
        self.residuals = Some(values.iter().map(|y| y - mean).collect());
        Ok(())
    }

    fn predict(&self, horizon: usize, exog: Option<&ExogenousFrame>) -> Result<Forecast> {
        reject_exog(self.name(), exog)?;
        let mean = self.mean.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![mean; horizon]))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "NaiveMean"
    }
}
