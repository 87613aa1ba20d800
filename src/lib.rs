//! # forecast-eval
//!
//! Rolling-origin (expanding-window) evaluation of time series forecasters.
//!
//! A model described by [`models::ModelKind`] is refitted on a growing
//! training window and scored on the points that follow it. The evaluator
//! reports MAE, MAPE and MASE over every forecast, a merged forecast series
//! and, on request, Anderson-Darling and Ljung-Box diagnostics of the
//! forecast errors.
//!
//! Available models are the naive mean and last-value baselines, damped or
//! undamped exponential smoothing, SARIMAX with exogenous regressors, and
//! any of these fitted on a log, square-root or Box-Cox transformed target.
//!
//! ```
//! use forecast_eval::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let values: Vec<f64> = (0..48).map(|i| 100.0 + i as f64).collect();
//! let series = TimeSeries::from_start(start, values, Frequency::Monthly).unwrap();
//!
//! let config = EvaluationConfig::new(3);
//! let summary = evaluate(&ModelKind::arima(0, 1, 0), &series, None, &config).unwrap();
//! println!("{summary}");
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod datasets;
pub mod error;
pub mod evaluation;
pub mod impute;
pub mod models;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{ExogenousFrame, Forecast, Frequency, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::evaluation::{
        evaluate, EvaluationConfig, EvaluationSummary, Evaluator, MaseScale,
    };
    pub use crate::impute::{forward_fill, zero_fill};
    pub use crate::models::{Forecaster, ModelKind, TrendKind};
    pub use crate::transform::Transform;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
