//! Forecasting models.

mod kind;
mod traits;

pub mod arima;
pub mod baseline;
pub mod exponential;
pub mod pipeline;

pub use arima::{ArimaOrder, Sarimax, SeasonalOrder};
pub use exponential::{ExponentialSmoothing, TrendKind};
pub use kind::ModelKind;
pub use pipeline::TransformedForecaster;
pub use traits::{BoxedForecaster, Forecaster};
