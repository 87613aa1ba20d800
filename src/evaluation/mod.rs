//! Rolling-origin evaluation.
//!
//! A series is split into expanding training windows, a fresh model is fitted
//! on every window and asked for the next `horizon` points. The forecasts of
//! all folds are scored together and can optionally be checked for normality
//! and autocorrelation.

mod config;
mod evaluator;
mod render;
mod splitter;
mod summary;

pub use config::{EvaluationConfig, MaseScale};
pub use evaluator::{evaluate, Evaluator};
pub use render::{ComparisonRenderer, ForecastComparison, TableRenderer};
pub use splitter::{ExpandingWindowSplitter, Fold, Folds};
pub use summary::{EvaluationSummary, FoldForecast, LagVerdict, NormalityVerdict, ResidualReport};
