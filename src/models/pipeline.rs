//! Forecasting on a transformed scale.
//!
//! Wraps another model: the target is transformed before fitting and the
//! forecasts are mapped back with the exact inverse.

use crate::core::{ExogenousFrame, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{BoxedForecaster, Forecaster};
use crate::transform::{FittedTransform, Transform};

/// A forecaster fitted on `transform(y)` whose forecasts are inverted.
pub struct TransformedForecaster {
    transform: Transform,
    inner: BoxedForecaster,
    label: String,
    fitted_transform: Option<FittedTransform>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl TransformedForecaster {
    pub fn new(transform: Transform, inner: BoxedForecaster) -> Self {
        let label = format!("{}({})", transform.name(), inner.name());
        Self {
            transform,
            inner,
            label,
            fitted_transform: None,
            fitted: None,
            residuals: None,
        }
    }

    /// The transform with its parameters resolved, once fitted.
    pub fn fitted_transform(&self) -> Option<FittedTransform> {
        self.fitted_transform
    }

    /// The wrapped model, operating on the transformed scale.
    pub fn inner(&self) -> &dyn Forecaster {
        self.inner.as_ref()
    }
}

impl Forecaster for TransformedForecaster {
    fn fit(&mut self, series: &TimeSeries, exog: Option<&ExogenousFrame>) -> Result<()> {
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let (fitted_transform, transformed) = self.transform.fit_apply(series.values())?;
        self.inner.fit(&series.with_values(transformed)?, exog)?;

        let fitted: Vec<f64> = self
            .inner
            .fitted_values()
            .unwrap_or_default()
            .iter()
            .map(|&v| fitted_transform.inverse(v))
            .collect();
        let residuals = series
            .values()
            .iter()
            .zip(&fitted)
            .map(|(y, f)| y - f)
            .collect();

        self.fitted_transform = Some(fitted_transform);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize, exog: Option<&ExogenousFrame>) -> Result<Forecast> {
        let fitted_transform = self.fitted_transform.ok_or(ForecastError::FitRequired)?;
        let forecast = self.inner.predict(horizon, exog)?;
        Ok(forecast.map(|v| fitted_transform.inverse(v)))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn supports_exog(&self) -> bool {
        self.inner.supports_exog()
    }
}
