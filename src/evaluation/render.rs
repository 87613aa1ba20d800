//! Rendering of actual vs. predicted values.

use crate::error::{ForecastError, Result};
use crate::utils::metrics::round2;
use chrono::{DateTime, Utc};
use std::io::Write;

/// Actual and predicted values on a shared timestamp index.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastComparison {
    pub model: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

impl ForecastComparison {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Sink for forecast comparisons, e.g. a chart or a text table.
pub trait ComparisonRenderer {
    fn render(&mut self, comparison: &ForecastComparison) -> Result<()>;
}

/// Writes a comparison as an aligned text table.
///
/// ```
/// use forecast_eval::evaluation::{ComparisonRenderer, ForecastComparison, TableRenderer};
/// use chrono::{TimeZone, Utc};
///
/// let comparison = ForecastComparison {
///     model: "NaiveLast".to_string(),
///     timestamps: vec![Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()],
///     actual: vec![10.0],
///     predicted: vec![9.0],
/// };
/// let mut renderer = TableRenderer::new(Vec::new());
/// renderer.render(&comparison).unwrap();
/// let text = String::from_utf8(renderer.into_inner()).unwrap();
/// assert!(text.contains("2024-03-01"));
/// ```
#[derive(Debug)]
pub struct TableRenderer<W: Write> {
    out: W,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_table(&mut self, comparison: &ForecastComparison) -> std::io::Result<()> {
        writeln!(self.out, "{}", comparison.model)?;
        writeln!(
            self.out,
            "{:<12} {:>12} {:>12} {:>12}",
            "date", "actual", "predicted", "error"
        )?;
        let rows = comparison
            .timestamps
            .iter()
            .zip(&comparison.actual)
            .zip(&comparison.predicted);
        for ((ts, actual), predicted) in rows {
            writeln!(
                self.out,
                "{:<12} {:>12.2} {:>12.2} {:>12.2}",
                ts.format("%Y-%m-%d").to_string(),
                round2(*actual),
                round2(*predicted),
                round2(actual - predicted)
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> ComparisonRenderer for TableRenderer<W> {
    fn render(&mut self, comparison: &ForecastComparison) -> Result<()> {
        if comparison.actual.len() != comparison.len()
            || comparison.predicted.len() != comparison.len()
        {
            return Err(ForecastError::DimensionMismatch {
                expected: comparison.len(),
                got: comparison.actual.len().min(comparison.predicted.len()),
            });
        }
        self.write_table(comparison)
            .map_err(|e| ForecastError::Render(e.to_string()))
    }
}
