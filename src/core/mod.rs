//! Core data structures for time series evaluation.

mod exog;
mod forecast;
mod time_series;

pub use exog::ExogenousFrame;
pub use forecast::Forecast;
pub use time_series::{Frequency, TimeSeries};
