//! Numerical helpers shared by the models and the evaluator.

pub mod metrics;
pub mod ols;
pub mod optimization;

pub use metrics::{calculate_metrics, mae, mape, mase, naive_scale, round2, AccuracyMetrics};
pub use ols::{ols_fit, ols_residuals, OLSResult};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
