//! Exponential smoothing models.
//!
//! A single [`ExponentialSmoothing`] type covers simple smoothing, Holt's
//! linear trend (optionally damped) and additive Holt-Winters seasonality.

mod ets;

pub use ets::{ExponentialSmoothing, SmoothingParams, TrendKind};
