//! Error types for the forecast-eval library.

use thiserror::Error;

/// Result type alias for forecasting and evaluation operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while preparing data, fitting models or evaluating them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Training window is shorter than the model order or seasonal period requires.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Missing values present where a complete series is required.
    #[error("missing values detected in data")]
    MissingValues,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Numerical failure outside of model fitting.
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Malformed input: missing or unexpected columns, bad calendar fields.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Iterative model fitting ended without a usable optimum.
    #[error("model failed to converge: {0}")]
    Convergence(String),

    /// Rendering a forecast comparison failed.
    #[error("render error: {0}")]
    Render(String),

    /// A single evaluation fold failed to fit or predict.
    #[error("fold {fold} failed: {source}")]
    FoldFailed {
        fold: usize,
        #[source]
        source: Box<ForecastError>,
    },
}

impl ForecastError {
    /// Wrap an error raised while processing evaluation fold `fold`.
    pub fn in_fold(self, fold: usize) -> Self {
        ForecastError::FoldFailed {
            fold,
            source: Box::new(self),
        }
    }
}
