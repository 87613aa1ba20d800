//! Evaluation configuration.

use serde::{Deserialize, Serialize};

/// Which training window scales the errors in MASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaseScale {
    /// Each fold's errors are scaled by the naive error of that fold's
    /// training window.
    #[default]
    PerFold,
    /// One scale from the first fold's training window for every fold.
    Global,
}

/// Configuration for a rolling-origin evaluation.
///
/// # Example
///
/// ```
/// use forecast_eval::evaluation::{EvaluationConfig, MaseScale};
///
/// let config = EvaluationConfig::new(3)
///     .with_seasonal_period(12)
///     .with_mase_scale(MaseScale::Global)
///     .with_residual_analysis(true);
/// assert_eq!(config.initial_fraction, 0.8);
/// assert_eq!(config.horizon, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Share of the series used by the first training window.
    pub initial_fraction: f64,
    /// Forecast horizon for each fold.
    pub horizon: usize,
    /// Growth of the training window between folds.
    pub step: usize,
    pub mase_scale: MaseScale,
    /// Seasonal period for the naive MASE scale (1 = non-seasonal).
    pub seasonal_period: Option<usize>,
    /// Run Anderson-Darling and Ljung-Box on the forecast errors.
    pub analyze_residuals: bool,
    /// Hand the forecast comparison to the evaluator's renderer.
    pub plot_forecasts: bool,
    /// Significance level of the residual tests.
    pub alpha: f64,
    /// Ljung-Box lags; capped at the number of residuals minus one.
    pub lags: Vec<usize>,
    /// Fit folds on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            initial_fraction: 0.8,
            horizon: 1,
            step: 1,
            mase_scale: MaseScale::PerFold,
            seasonal_period: None,
            analyze_residuals: false,
            plot_forecasts: false,
            alpha: 0.05,
            lags: (1..=10).collect(),
            parallel: false,
        }
    }
}

impl EvaluationConfig {
    /// Default configuration with the given horizon.
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    pub fn with_initial_fraction(mut self, fraction: f64) -> Self {
        self.initial_fraction = fraction;
        self
    }

    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn with_mase_scale(mut self, scale: MaseScale) -> Self {
        self.mase_scale = scale;
        self
    }

    /// Set the seasonal period for MASE calculation.
    pub fn with_seasonal_period(mut self, period: usize) -> Self {
        self.seasonal_period = Some(period);
        self
    }

    pub fn with_residual_analysis(mut self, enabled: bool) -> Self {
        self.analyze_residuals = enabled;
        self
    }

    pub fn with_plot(mut self, enabled: bool) -> Self {
        self.plot_forecasts = enabled;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_lags(mut self, lags: Vec<usize>) -> Self {
        self.lags = lags;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
