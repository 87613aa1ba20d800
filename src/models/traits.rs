//! Forecaster trait defining the common interface for all models.

use crate::core::{ExogenousFrame, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};

/// Common interface for all forecasting models.
///
/// Models are fitted once on a training window and then asked for a fixed
/// number of future steps. Models that use exogenous regressors receive the
/// training rows at fit time and the future rows at predict time.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries, exog: Option<&ExogenousFrame>) -> Result<()>;

    /// Generate predictions for the specified horizon.
    ///
    /// `exog` must hold exactly `horizon` future rows when the model was
    /// fitted with regressors.
    fn predict(&self, horizon: usize, exog: Option<&ExogenousFrame>) -> Result<Forecast>;

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }

    /// Whether the model can use exogenous regressors.
    fn supports_exog(&self) -> bool {
        false
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use forecast_eval::models::{BoxedForecaster, Forecaster};
/// use forecast_eval::models::baseline::NaiveLast;
///
/// let model: BoxedForecaster = Box::new(NaiveLast::new());
/// assert_eq!(model.name(), "NaiveLast");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;

/// Fail when regressors are handed to a model that cannot use them.
pub(crate) fn reject_exog(model: &str, exog: Option<&ExogenousFrame>) -> Result<()> {
    match exog {
        Some(frame) if !frame.columns().is_empty() => Err(ForecastError::InvalidParameter(
            format!("{model} does not support exogenous regressors"),
        )),
        _ => Ok(()),
    }
}
