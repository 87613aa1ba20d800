//! Results of a rolling-origin evaluation.

use crate::core::TimeSeries;
use crate::error::Result;
use crate::evaluation::render::ForecastComparison;
use crate::utils::metrics::round2;
use crate::validation::{
    anderson_darling, ljung_box_lags, AndersonDarlingResult, LjungBoxResult,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Forecasts of one fold next to the values they predicted.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldForecast {
    pub fold: usize,
    /// Length of the training window (the forecast origin is `train_end - 1`).
    pub train_end: usize,
    pub timestamps: Vec<DateTime<Utc>>,
    pub predicted: Vec<f64>,
    pub actual: Vec<f64>,
}

impl FoldForecast {
    /// `actual - predicted` for every step.
    pub fn errors(&self) -> Vec<f64> {
        self.actual
            .iter()
            .zip(&self.predicted)
            .map(|(a, p)| a - p)
            .collect()
    }
}

/// Outcome of the normality test at the configured level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalityVerdict {
    Normal,
    NotNormal,
    /// The test could not be run on these errors, e.g. too few of them or
    /// all equal. Holds the reason.
    Undetermined(String),
}

impl fmt::Display for NormalityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalityVerdict::Normal => write!(f, "normal"),
            NormalityVerdict::NotNormal => write!(f, "not normal"),
            NormalityVerdict::Undetermined(reason) => write!(f, "undetermined ({reason})"),
        }
    }
}

/// Ljung-Box outcome for a single lag.
#[derive(Debug, Clone, PartialEq)]
pub struct LagVerdict {
    pub lag: usize,
    pub statistic: f64,
    pub p_value: f64,
    /// The null of no autocorrelation up to `lag` is rejected.
    pub reject: bool,
}

/// Diagnostics of the out-of-sample forecast errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualReport {
    pub n: usize,
    pub alpha: f64,
    /// `None` when the normality test could not be run.
    pub normality: Option<AndersonDarlingResult>,
    pub verdict: NormalityVerdict,
    pub ljung_box: Vec<LagVerdict>,
}

impl ResidualReport {
    /// Test `residuals` for normality and autocorrelation at level `alpha`.
    ///
    /// Never fails: a sample the normality test cannot handle yields
    /// [`NormalityVerdict::Undetermined`], and lags the sample cannot
    /// support are left out.
    pub fn analyze(residuals: &[f64], alpha: f64, lags: &[usize]) -> Self {
        let (normality, verdict) = match anderson_darling(residuals) {
            Ok(result) => {
                let verdict = if result.is_normal(alpha) {
                    NormalityVerdict::Normal
                } else {
                    NormalityVerdict::NotNormal
                };
                (Some(result), verdict)
            }
            Err(err) => (None, NormalityVerdict::Undetermined(err.to_string())),
        };
        let ljung_box = ljung_box_lags(residuals, lags)
            .into_iter()
            .map(|LjungBoxResult { statistic, p_value, lags, .. }| LagVerdict {
                lag: lags,
                statistic,
                p_value,
                reject: p_value <= alpha,
            })
            .collect();

        Self {
            n: residuals.len(),
            alpha,
            normality,
            verdict,
            ljung_box,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.verdict == NormalityVerdict::Normal
    }

    /// Lags at which autocorrelation was detected.
    pub fn autocorrelated_lags(&self) -> Vec<usize> {
        self.ljung_box
            .iter()
            .filter(|v| v.reject)
            .map(|v| v.lag)
            .collect()
    }
}

impl fmt::Display for ResidualReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.normality {
            Some(ad) => writeln!(
                f,
                "Anderson-Darling: A2 = {:.2}, p = {:.2} -> {} (alpha = {})",
                round2(ad.statistic),
                round2(ad.p_value),
                self.verdict,
                self.alpha
            )?,
            None => writeln!(f, "Anderson-Darling: {}", self.verdict)?,
        }
        writeln!(f, "Ljung-Box:")?;
        for v in &self.ljung_box {
            let outcome = if v.reject {
                "autocorrelated"
            } else {
                "no autocorrelation"
            };
            writeln!(
                f,
                "  lag {:>2}: Q = {:.2}, p = {:.2} -> {}",
                v.lag,
                round2(v.statistic),
                round2(v.p_value),
                outcome
            )?;
        }
        Ok(())
    }
}

/// Aggregated result of evaluating one model.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub model: String,
    pub n_folds: usize,
    pub mae: f64,
    /// Percent; `None` when an actual value is zero.
    pub mape: Option<f64>,
    /// `None` when a naive scale is zero or undefined.
    pub mase: Option<f64>,
    pub folds: Vec<FoldForecast>,
    /// One prediction per timestamp; later origins replace earlier ones.
    pub predictions: TimeSeries,
    /// Actual values on the index of `predictions`.
    pub actuals: TimeSeries,
    pub residuals: Option<ResidualReport>,
}

impl EvaluationSummary {
    /// Every forecast error, fold by fold.
    pub fn errors(&self) -> Vec<f64> {
        self.folds.iter().flat_map(|f| f.errors()).collect()
    }

    /// Actual and merged predicted values side by side.
    pub fn comparison(&self) -> ForecastComparison {
        ForecastComparison {
            model: self.model.clone(),
            timestamps: self.predictions.timestamps().to_vec(),
            actual: self.actuals.values().to_vec(),
            predicted: self.predictions.values().to_vec(),
        }
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = |v: Option<f64>, suffix: &str| match v {
            Some(v) => format!("{:.2}{suffix}", round2(v)),
            None => "n/a".to_string(),
        };
        writeln!(f, "model: {}", self.model)?;
        writeln!(f, "folds: {}", self.n_folds)?;
        writeln!(f, "MAE:  {:.2}", round2(self.mae))?;
        writeln!(f, "MAPE: {}", optional(self.mape, "%"))?;
        writeln!(f, "MASE: {}", optional(self.mase, ""))?;
        if let Some(report) = &self.residuals {
            write!(f, "{report}")?;
        }
        Ok(())
    }
}

/// Merge fold forecasts into one series per quantity, keeping the latest
/// origin for every timestamp.
pub(crate) fn merge_folds(folds: &[FoldForecast]) -> Result<(TimeSeries, TimeSeries)> {
    let mut merged: BTreeMap<DateTime<Utc>, (f64, f64)> = BTreeMap::new();
    for fold in folds {
        for ((ts, p), a) in fold.timestamps.iter().zip(&fold.predicted).zip(&fold.actual) {
            merged.insert(*ts, (*p, *a));
        }
    }
    let timestamps: Vec<DateTime<Utc>> = merged.keys().copied().collect();
    let predicted = merged.values().map(|(p, _)| *p).collect();
    let actual = merged.values().map(|(_, a)| *a).collect();
    Ok((
        TimeSeries::univariate(timestamps.clone(), predicted)?,
        TimeSeries::univariate(timestamps, actual)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i)
    }

    fn fold(index: usize, start: i64, predicted: Vec<f64>, actual: Vec<f64>) -> FoldForecast {
        FoldForecast {
            fold: index,
            train_end: start as usize,
            timestamps: (0..predicted.len() as i64).map(|h| day(start + h)).collect(),
            predicted,
            actual,
        }
    }

    #[test]
    fn later_origin_wins_on_overlap() {
        let folds = vec![
            fold(0, 8, vec![1.0, 2.0], vec![10.0, 11.0]),
            fold(1, 9, vec![3.0, 4.0], vec![11.0, 12.0]),
        ];
        let (predictions, actuals) = merge_folds(&folds).unwrap();
        assert_eq!(predictions.values(), &[1.0, 3.0, 4.0]);
        assert_eq!(actuals.values(), &[10.0, 11.0, 12.0]);
        assert_eq!(predictions.timestamps(), &[day(8), day(9), day(10)]);
    }

    #[test]
    fn fold_errors() {
        let f = fold(0, 3, vec![8.0, 9.0], vec![9.0, 10.0]);
        assert_eq!(f.errors(), vec![1.0, 1.0]);
    }

    fn summary(mape: Option<f64>) -> EvaluationSummary {
        let folds = vec![fold(0, 8, vec![8.0], vec![9.0]), fold(1, 9, vec![9.0], vec![10.0])];
        let (predictions, actuals) = merge_folds(&folds).unwrap();
        EvaluationSummary {
            model: "NaiveLast".to_string(),
            n_folds: 2,
            mae: 1.0,
            mape,
            mase: Some(1.0),
            folds,
            predictions,
            actuals,
            residuals: None,
        }
    }

    #[test]
    fn summary_display_rounds_to_two_decimals() {
        let text = summary(Some(10.555_555)).to_string();
        assert!(text.contains("model: NaiveLast"));
        assert!(text.contains("folds: 2"));
        assert!(text.contains("MAE:  1.00"));
        assert!(text.contains("MAPE: 10.56%"));
        assert!(text.contains("MASE: 1.00"));
    }

    #[test]
    fn missing_metric_is_shown_as_na() {
        let text = summary(None).to_string();
        assert!(text.contains("MAPE: n/a"));
    }

    #[test]
    fn comparison_uses_merged_series() {
        let comparison = summary(None).comparison();
        assert_eq!(comparison.predicted, vec![8.0, 9.0]);
        assert_eq!(comparison.actual, vec![9.0, 10.0]);
        assert_eq!(comparison.timestamps.len(), 2);
    }

    #[test]
    fn residual_report_flags_autocorrelation() {
        let residuals: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 1.0 } else { -1.2 }).collect();
        let report = ResidualReport::analyze(&residuals, 0.05, &[1, 2, 3]);
        assert_eq!(report.n, 60);
        assert_eq!(report.ljung_box.len(), 3);
        assert_eq!(report.autocorrelated_lags(), vec![1, 2, 3]);

        let text = report.to_string();
        assert!(text.starts_with("Anderson-Darling: A2 = "));
        assert!(text.contains("lag  1: Q = "));
    }

    #[test]
    fn too_few_errors_leave_normality_undetermined() {
        let report = ResidualReport::analyze(&[1.0, -1.0], 0.05, &[1]);
        assert_eq!(report.n, 2);
        assert!(report.normality.is_none());
        assert!(matches!(report.verdict, NormalityVerdict::Undetermined(_)));
        assert!(!report.is_normal());
        assert!(report.ljung_box.is_empty());
        assert!(report.to_string().starts_with("Anderson-Darling: undetermined ("));
    }

    #[test]
    fn constant_errors_keep_ljung_box_results() {
        let report = ResidualReport::analyze(&[1.0; 20], 0.05, &[1, 2]);
        assert!(report.normality.is_none());
        assert!(matches!(report.verdict, NormalityVerdict::Undetermined(_)));
        assert_eq!(report.ljung_box.len(), 2);
        assert!(report.ljung_box.iter().all(|v| v.p_value == 1.0 && !v.reject));
        assert!(report.autocorrelated_lags().is_empty());
    }
}
