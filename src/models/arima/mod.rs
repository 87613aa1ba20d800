//! Seasonal ARIMA models with optional exogenous regressors.
//!
//! This module provides:
//! - differencing helpers (regular and seasonal) with exact integration
//! - [`Sarimax`]: ARIMA(p, d, q) with an optional seasonal (P, D, Q)\[s\]
//!   component and regression on exogenous columns

mod diff;
mod model;

pub use diff::{
    difference, difference_levels, differencing_lags, integrate, integrate_levels,
    lagged_difference, seasonal_difference,
};
pub use model::{ArimaOrder, SarimaCoefficients, Sarimax, SeasonalOrder};
