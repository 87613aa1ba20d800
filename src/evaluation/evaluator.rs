//! Rolling-origin evaluation of a model over one series.

use crate::core::{ExogenousFrame, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::evaluation::config::{EvaluationConfig, MaseScale};
use crate::evaluation::render::ComparisonRenderer;
use crate::evaluation::splitter::{ExpandingWindowSplitter, Fold};
use crate::evaluation::summary::{
    merge_folds, EvaluationSummary, FoldForecast, NormalityVerdict, ResidualReport,
};
use crate::models::ModelKind;
use crate::utils::metrics::{calculate_metrics, mase, naive_scale};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

/// Runs expanding-window evaluations with a fixed configuration.
///
/// # Example
///
/// ```
/// use forecast_eval::core::{Frequency, TimeSeries};
/// use forecast_eval::evaluation::{EvaluationConfig, Evaluator};
/// use forecast_eval::models::ModelKind;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let values: Vec<f64> = (1..=10).map(f64::from).collect();
/// let series = TimeSeries::from_start(start, values, Frequency::Daily).unwrap();
///
/// let mut evaluator = Evaluator::new(EvaluationConfig::new(1));
/// let summary = evaluator.evaluate(&ModelKind::NaiveLast, &series, None).unwrap();
/// assert_eq!(summary.n_folds, 2);
/// assert_eq!(summary.mae, 1.0);
/// ```
pub struct Evaluator {
    config: EvaluationConfig,
    renderer: Option<Box<dyn ComparisonRenderer>>,
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("config", &self.config)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            renderer: None,
        }
    }

    /// Renderer used when `plot_forecasts` is enabled.
    pub fn with_renderer(mut self, renderer: impl ComparisonRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate `kind` on `series`, failing on the first failing fold.
    ///
    /// # Errors
    /// - `MissingValues` when the series or the regressors have gaps
    /// - `InsufficientData` when the series yields no fold
    /// - `InvalidParameter` for regressors passed to a model without support
    /// - `FoldFailed` wrapping the first fit or predict error
    /// - errors of the renderer
    ///
    /// Residual diagnostics never fail the evaluation; a normality test that
    /// cannot run is reported as [`NormalityVerdict::Undetermined`].
    pub fn evaluate(
        &mut self,
        kind: &ModelKind,
        series: &TimeSeries,
        exog: Option<&ExogenousFrame>,
    ) -> Result<EvaluationSummary> {
        let folds = self
            .evaluate_folds(kind, series, exog)?
            .into_iter()
            .collect::<Result<Vec<FoldForecast>>>()?;

        let summary = self.summarize(kind, series, folds)?;
        info!(
            model = %summary.model,
            folds = summary.n_folds,
            mae = summary.mae,
            "evaluation finished"
        );

        if self.config.plot_forecasts {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.render(&summary.comparison())?;
            }
        }
        Ok(summary)
    }

    /// Fit and forecast every fold, keeping each fold's outcome.
    ///
    /// Input validation errors are returned directly; fold errors are
    /// returned in place as `FoldFailed`. Outcomes are in fold order.
    pub fn evaluate_folds(
        &self,
        kind: &ModelKind,
        series: &TimeSeries,
        exog: Option<&ExogenousFrame>,
    ) -> Result<Vec<Result<FoldForecast>>> {
        let exog = prepare_exog(kind, series, exog)?;
        let folds = self.folds(series)?;

        let run = |fold: &Fold| {
            run_fold(kind, series, exog.as_ref(), fold).map_err(|err| {
                warn!(fold = fold.index, error = %err, "fold failed");
                err.in_fold(fold.index)
            })
        };

        let outcomes: Vec<Result<FoldForecast>> = if self.config.parallel {
            folds.par_iter().map(run).collect()
        } else {
            folds.iter().map(run).collect()
        };
        Ok(outcomes)
    }

    fn folds(&self, series: &TimeSeries) -> Result<Vec<Fold>> {
        let splitter =
            ExpandingWindowSplitter::new(self.config.initial_fraction, self.config.horizon)?
                .with_step(self.config.step)?;
        let n = series.len();
        let folds: Vec<Fold> = splitter.split(n)?.collect();
        if folds.is_empty() {
            return Err(ForecastError::InsufficientData {
                needed: splitter.initial_train_len(n) + splitter.horizon(),
                got: n,
            });
        }
        Ok(folds)
    }

    fn summarize(
        &self,
        kind: &ModelKind,
        series: &TimeSeries,
        folds: Vec<FoldForecast>,
    ) -> Result<EvaluationSummary> {
        let actual: Vec<f64> = folds.iter().flat_map(|f| f.actual.iter().copied()).collect();
        let predicted: Vec<f64> = folds
            .iter()
            .flat_map(|f| f.predicted.iter().copied())
            .collect();

        let values = series.values();
        let period = self.config.seasonal_period.unwrap_or(1);
        let global_scale = folds
            .first()
            .and_then(|fold| naive_scale(&values[..fold.train_end], period));
        let metrics = calculate_metrics(&actual, &predicted, global_scale)?;
        let mase = match self.config.mase_scale {
            MaseScale::Global => metrics.mase,
            MaseScale::PerFold => per_fold_mase(&folds, values, period)?,
        };
        let (predictions, actuals) = merge_folds(&folds)?;

        let residuals = self.config.analyze_residuals.then(|| {
            let errors: Vec<f64> = actual.iter().zip(&predicted).map(|(a, p)| a - p).collect();
            let report = ResidualReport::analyze(&errors, self.config.alpha, &self.config.lags);
            if let NormalityVerdict::Undetermined(reason) = &report.verdict {
                warn!(n = report.n, %reason, "normality of forecast errors undetermined");
            }
            report
        });

        Ok(EvaluationSummary {
            model: kind.build().name().to_string(),
            n_folds: folds.len(),
            mae: metrics.mae,
            mape: metrics.mape,
            mase,
            folds,
            predictions,
            actuals,
            residuals,
        })
    }
}

/// Evaluate `kind` on `series` with a one-off [`Evaluator`].
pub fn evaluate(
    kind: &ModelKind,
    series: &TimeSeries,
    exog: Option<&ExogenousFrame>,
    config: &EvaluationConfig,
) -> Result<EvaluationSummary> {
    Evaluator::new(config.clone()).evaluate(kind, series, exog)
}

fn prepare_exog(
    kind: &ModelKind,
    series: &TimeSeries,
    exog: Option<&ExogenousFrame>,
) -> Result<Option<ExogenousFrame>> {
    series.ensure_complete()?;
    let Some(frame) = exog else {
        return Ok(None);
    };
    if !frame.columns().is_empty() && !kind.supports_exog() {
        return Err(ForecastError::InvalidParameter(format!(
            "{} does not support exogenous regressors",
            kind.build().name()
        )));
    }
    let aligned = frame.align_to(series)?;
    if aligned.has_missing_values() {
        return Err(ForecastError::MissingValues);
    }
    Ok(Some(aligned))
}

fn run_fold(
    kind: &ModelKind,
    series: &TimeSeries,
    exog: Option<&ExogenousFrame>,
    fold: &Fold,
) -> Result<FoldForecast> {
    let horizon = fold.test.len();
    debug!(fold = fold.index, train_end = fold.train_end(), horizon, "fitting fold");

    let train = series.slice(fold.train.start, fold.train.end)?;
    let test = series.slice(fold.test.start, fold.test.end)?;
    let (train_exog, test_exog) = match exog {
        Some(frame) => (
            Some(frame.slice(fold.train.start, fold.train.end)?),
            Some(frame.slice(fold.test.start, fold.test.end)?),
        ),
        None => (None, None),
    };

    let mut model = kind.build();
    model.fit(&train, train_exog.as_ref())?;
    let predicted = model.predict(horizon, test_exog.as_ref())?.into_values();

    if predicted.len() != horizon {
        return Err(ForecastError::DimensionMismatch {
            expected: horizon,
            got: predicted.len(),
        });
    }
    if predicted.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::ComputationError(format!(
            "{} produced a non-finite forecast",
            model.name()
        )));
    }

    Ok(FoldForecast {
        fold: fold.index,
        train_end: fold.train_end(),
        timestamps: test.timestamps().to_vec(),
        predicted,
        actual: test.values().to_vec(),
    })
}

/// MASE with every fold's errors scaled by its own training window,
/// averaged over all forecast points.
fn per_fold_mase(folds: &[FoldForecast], values: &[f64], period: usize) -> Result<Option<f64>> {
    let mut total = 0.0;
    let mut count = 0usize;
    for fold in folds {
        let Some(scale) = naive_scale(&values[..fold.train_end], period) else {
            return Ok(None);
        };
        let Some(fold_mase) = mase(&fold.actual, &fold.predicted, scale)? else {
            return Ok(None);
        };
        total += fold_mase * fold.actual.len() as f64;
        count += fold.actual.len();
    }
    Ok((count > 0).then(|| total / count as f64))
}
