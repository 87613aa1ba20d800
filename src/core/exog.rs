//! Exogenous regressors aligned with a target series.

use crate::core::time_series::{validate_increasing, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Named regressor columns sharing one timestamp index.
///
/// Columns are kept in name order so that regression coefficients are
/// assigned deterministically.
#[derive(Debug, Clone, PartialEq)]
pub struct ExogenousFrame {
    timestamps: Vec<DateTime<Utc>>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl ExogenousFrame {
    /// Create a frame; every column must match the index length.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        validate_increasing(&timestamps)?;
        for values in columns.values() {
            if values.len() != timestamps.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: timestamps.len(),
                    got: values.len(),
                });
            }
        }
        Ok(Self {
            timestamps,
            columns,
        })
    }

    /// Create a frame indexed like `series`.
    pub fn for_series(series: &TimeSeries, columns: BTreeMap<String, Vec<f64>>) -> Result<Self> {
        Self::new(series.timestamps().to_vec(), columns)
    }

    /// Add a column, replacing any column with the same name.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.timestamps.len(),
                got: values.len(),
            });
        }
        self.columns.insert(name.into(), values);
        Ok(self)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn columns(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.columns
    }

    /// Column names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_missing_values(&self) -> bool {
        self.columns
            .values()
            .any(|col| col.iter().any(|v| !v.is_finite()))
    }

    /// Rows `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<ExogenousFrame> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }
        Ok(ExogenousFrame {
            timestamps: self.timestamps[start..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col[start..end].to_vec()))
                .collect(),
        })
    }

    /// Restrict the frame to the index of `series`.
    ///
    /// The frame may cover a superset of the series index, but every series
    /// timestamp must be present.
    pub fn align_to(&self, series: &TimeSeries) -> Result<ExogenousFrame> {
        let mut rows = Vec::with_capacity(series.len());
        let mut cursor = 0;
        for ts in series.timestamps() {
            while cursor < self.timestamps.len() && self.timestamps[cursor] < *ts {
                cursor += 1;
            }
            if cursor == self.timestamps.len() || self.timestamps[cursor] != *ts {
                return Err(ForecastError::TimestampError(format!(
                    "exogenous frame has no row for {ts}"
                )));
            }
            rows.push(cursor);
        }

        Ok(ExogenousFrame {
            timestamps: series.timestamps().to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), rows.iter().map(|&r| col[r]).collect()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn promo_frame(n: usize) -> ExogenousFrame {
        let mut columns = BTreeMap::new();
        columns.insert("promotions".to_string(), (0..n).map(|i| i as f64).collect());
        ExogenousFrame::new(make_timestamps(n), columns).unwrap()
    }

    #[test]
    fn frame_rejects_short_column() {
        let mut columns = BTreeMap::new();
        columns.insert("promotions".to_string(), vec![1.0, 2.0]);
        let result = ExogenousFrame::new(make_timestamps(3), columns);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn names_are_sorted() {
        let frame = promo_frame(3)
            .with_column("holiday", vec![0.0, 1.0, 0.0])
            .unwrap();
        assert_eq!(frame.names(), vec!["holiday", "promotions"]);
    }

    #[test]
    fn slice_uses_row_ranges() {
        let frame = promo_frame(6);
        let sliced = frame.slice(2, 4).unwrap();
        assert_eq!(sliced.column("promotions").unwrap(), &[2.0, 3.0]);
        assert_eq!(sliced.timestamps(), &frame.timestamps()[2..4]);
    }

    #[test]
    fn align_to_restricts_superset() {
        let frame = promo_frame(10);
        let series = TimeSeries::univariate(frame.timestamps()[3..7].to_vec(), vec![0.0; 4])
            .unwrap();

        let aligned = frame.align_to(&series).unwrap();
        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned.column("promotions").unwrap(), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn align_to_rejects_uncovered_index() {
        let frame = promo_frame(5);
        let series = TimeSeries::univariate(make_timestamps(7), vec![0.0; 7]).unwrap();
        assert!(matches!(
            frame.align_to(&series),
            Err(ForecastError::TimestampError(_))
        ));
    }

    #[test]
    fn missing_values_are_detected() {
        let frame = promo_frame(3)
            .with_column("price", vec![1.0, f64::NAN, 2.0])
            .unwrap();
        assert!(frame.has_missing_values());
        assert!(!promo_frame(3).has_missing_values());
    }
}
