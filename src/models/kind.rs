//! The closed set of models an evaluation can be run with.

use crate::models::arima::{ArimaOrder, Sarimax, SeasonalOrder};
use crate::models::baseline::{NaiveLast, NaiveMean};
use crate::models::exponential::{ExponentialSmoothing, TrendKind};
use crate::models::pipeline::TransformedForecaster;
use crate::models::BoxedForecaster;
use crate::transform::Transform;
use serde::{Deserialize, Serialize};

/// Description of a model to evaluate.
///
/// A `ModelKind` is plain data: it can be stored as JSON next to notebook
/// parameters and turned into a fresh, unfitted model for every fold.
///
/// # Example
///
/// ```
/// use forecast_eval::models::{ModelKind, TrendKind};
///
/// let kind = ModelKind::ExponentialSmoothing {
///     trend: Some(TrendKind::Additive),
///     damped: true,
///     seasonal_period: None,
/// };
/// let model = kind.build();
/// assert_eq!(model.name(), "ETS(A,Ad,N)");
/// assert!(!model.is_fitted());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelKind {
    /// Mean of the training window.
    NaiveMean,
    /// Last value of the training window.
    NaiveLast,
    ExponentialSmoothing {
        trend: Option<TrendKind>,
        #[serde(default)]
        damped: bool,
        seasonal_period: Option<usize>,
    },
    Sarimax {
        order: ArimaOrder,
        seasonal: Option<SeasonalOrder>,
    },
    /// Any model fitted on a transformed target.
    Transformed {
        transform: Transform,
        inner: Box<ModelKind>,
    },
}

impl ModelKind {
    /// ARIMA(p, d, q) without a seasonal part.
    pub fn arima(p: usize, d: usize, q: usize) -> Self {
        ModelKind::Sarimax {
            order: ArimaOrder::new(p, d, q),
            seasonal: None,
        }
    }

    /// Wrap this model in a variance-stabilising transform.
    pub fn transformed(self, transform: Transform) -> Self {
        ModelKind::Transformed {
            transform,
            inner: Box::new(self),
        }
    }

    /// Create a new, unfitted model instance.
    pub fn build(&self) -> BoxedForecaster {
        match self {
            ModelKind::NaiveMean => Box::new(NaiveMean::new()),
            ModelKind::NaiveLast => Box::new(NaiveLast::new()),
            ModelKind::ExponentialSmoothing {
                trend,
                damped,
                seasonal_period,
            } => Box::new(ExponentialSmoothing::new(*trend, *damped, *seasonal_period)),
            ModelKind::Sarimax { order, seasonal } => {
                Box::new(Sarimax::with_order(*order, *seasonal))
            }
            ModelKind::Transformed { transform, inner } => {
                Box::new(TransformedForecaster::new(*transform, inner.build()))
            }
        }
    }

    /// Whether models of this kind accept exogenous regressors.
    pub fn supports_exog(&self) -> bool {
        match self {
            ModelKind::Sarimax { .. } => true,
            ModelKind::Transformed { inner, .. } => inner.supports_exog(),
            _ => false,
        }
    }
}
