//! Baseline forecasting models.
//!
//! Simple methods that serve as benchmarks for more complex models.

mod mean;
mod naive;

pub use mean::NaiveMean;
pub use naive::NaiveLast;
