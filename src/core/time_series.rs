//! TimeSeries data structure for representing ordered observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Sampling frequency of a regular time index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Advance a timestamp by `steps` periods.
    ///
    /// Calendar frequencies use month arithmetic, so month-end dates are
    /// clamped the way `chrono::Months` clamps them.
    pub fn advance(&self, timestamp: DateTime<Utc>, steps: u32) -> Option<DateTime<Utc>> {
        match self {
            Frequency::Hourly => timestamp.checked_add_signed(Duration::hours(steps as i64)),
            Frequency::Daily => timestamp.checked_add_signed(Duration::days(steps as i64)),
            Frequency::Weekly => timestamp.checked_add_signed(Duration::weeks(steps as i64)),
            Frequency::Monthly => timestamp.checked_add_months(Months::new(steps)),
            Frequency::Quarterly => timestamp.checked_add_months(Months::new(3 * steps)),
            Frequency::Yearly => timestamp.checked_add_months(Months::new(12 * steps)),
        }
    }

    /// Typical seasonal period for this frequency (e.g. 12 for monthly data).
    pub fn seasonal_period(&self) -> usize {
        match self {
            Frequency::Hourly => 24,
            Frequency::Daily => 7,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Yearly => 1,
        }
    }
}

/// A univariate time series with a strictly increasing timestamp index.
///
/// Missing observations are stored as `NaN` and must be imputed before the
/// series is handed to an evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Frequency>,
}

impl TimeSeries {
    /// Create a series from timestamps and values.
    ///
    /// Timestamps must be strictly increasing and match the values in length.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        validate_increasing(&timestamps)?;

        Ok(Self {
            timestamps,
            values,
            frequency: None,
        })
    }

    /// Create a series whose index is gap-free at the given frequency.
    pub fn with_frequency(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        frequency: Frequency,
    ) -> Result<Self> {
        let mut series = Self::univariate(timestamps, values)?;
        for (i, w) in series.timestamps.windows(2).enumerate() {
            if frequency.advance(w[0], 1) != Some(w[1]) {
                return Err(ForecastError::TimestampError(format!(
                    "gap in {:?} index between positions {} and {}",
                    frequency,
                    i,
                    i + 1
                )));
            }
        }
        series.frequency = Some(frequency);
        Ok(series)
    }

    /// Create a regular series of `values.len()` periods starting at `start`.
    pub fn from_start(start: DateTime<Utc>, values: Vec<f64>, frequency: Frequency) -> Result<Self> {
        let timestamps = (0..values.len() as u32)
            .map(|i| {
                frequency.advance(start, i).ok_or_else(|| {
                    ForecastError::TimestampError("timestamp out of range".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_frequency(timestamps, values, frequency)
    }

    /// Create a daily series from calendar dates.
    pub fn from_dates(dates: &[NaiveDate], values: Vec<f64>) -> Result<Self> {
        let timestamps = dates.iter().map(|d| midnight(*d)).collect();
        Self::with_frequency(timestamps, values, Frequency::Daily)
    }

    /// Create a monthly series from `(year, month)` pairs.
    pub fn from_year_month(periods: &[(i32, u32)], values: Vec<f64>) -> Result<Self> {
        let timestamps = periods
            .iter()
            .map(|&(year, month)| {
                NaiveDate::from_ymd_opt(year, month, 1)
                    .map(midnight)
                    .ok_or_else(|| {
                        ForecastError::DataFormat(format!("invalid period {year}-{month:02}"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_frequency(timestamps, values, Frequency::Monthly)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the index frequency, if known.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Timestamps of the `horizon` periods following the last observation.
    ///
    /// Requires a known frequency.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
        let frequency = self.frequency.ok_or_else(|| {
            ForecastError::TimestampError("series has no frequency".to_string())
        })?;
        let last = *self.timestamps.last().ok_or(ForecastError::EmptyData)?;
        (1..=horizon as u32)
            .map(|h| {
                frequency.advance(last, h).ok_or_else(|| {
                    ForecastError::TimestampError("timestamp out of range".to_string())
                })
            })
            .collect()
    }

    /// Extract the observations in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
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

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            frequency: self.frequency,
        })
    }

    /// Check if the series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Fail with `MissingValues` unless every observation is present.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.has_missing_values() {
            return Err(ForecastError::MissingValues);
        }
        Ok(())
    }

    /// Return a copy with every value transformed by `f`, keeping the index.
    pub fn map_values<F>(&self, f: F) -> TimeSeries
    where
        F: Fn(f64) -> f64,
    {
        TimeSeries {
            timestamps: self.timestamps.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
            frequency: self.frequency,
        }
    }

    /// Return a copy with the values replaced, keeping the index.
    pub fn with_values(&self, values: Vec<f64>) -> Result<TimeSeries> {
        if values.len() != self.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.len(),
                got: values.len(),
            });
        }
        Ok(TimeSeries {
            timestamps: self.timestamps.clone(),
            values,
            frequency: self.frequency,
        })
    }

    /// Multiply every value by `factor`.
    pub fn scaled(&self, factor: f64) -> TimeSeries {
        self.map_values(|v| v * factor)
    }
}

pub(crate) fn validate_increasing(timestamps: &[DateTime<Utc>]) -> Result<()> {
    if timestamps.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ForecastError::TimestampError(
            "timestamps must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_daily_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn time_series_constructs_univariate_data() {
        let ts = TimeSeries::univariate(make_daily_timestamps(5), vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap();

        assert_eq!(ts.len(), 5);
        assert!(!ts.is_empty());
        assert_eq!(ts.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ts.frequency(), None);
    }

    #[test]
    fn time_series_rejects_unsorted_timestamps() {
        let mut timestamps = make_daily_timestamps(3);
        timestamps.swap(1, 2);
        let result = TimeSeries::univariate(timestamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn time_series_rejects_duplicate_timestamps() {
        let mut timestamps = make_daily_timestamps(3);
        timestamps[2] = timestamps[1];
        let result = TimeSeries::univariate(timestamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn time_series_rejects_length_mismatch() {
        let result = TimeSeries::univariate(make_daily_timestamps(3), vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn with_frequency_detects_gaps() {
        let mut timestamps = make_daily_timestamps(4);
        timestamps[3] = timestamps[3] + Duration::days(1);
        let result = TimeSeries::with_frequency(timestamps, vec![1.0; 4], Frequency::Daily);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn monthly_index_handles_uneven_month_lengths() {
        let periods = [(2023, 11), (2023, 12), (2024, 1), (2024, 2), (2024, 3)];
        let ts = TimeSeries::from_year_month(&periods, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(ts.frequency(), Some(Frequency::Monthly));

        let future = ts.future_timestamps(2).unwrap();
        assert_eq!(future[0], Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(future[1], Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn from_year_month_rejects_invalid_month() {
        let result = TimeSeries::from_year_month(&[(2024, 13)], vec![1.0]);
        assert!(matches!(result, Err(ForecastError::DataFormat(_))));
    }

    #[test]
    fn from_year_month_rejects_missing_month() {
        let result = TimeSeries::from_year_month(&[(2024, 1), (2024, 3)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn from_start_builds_regular_index() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let ts = TimeSeries::from_start(start, vec![0.0; 8], Frequency::Quarterly).unwrap();
        assert_eq!(
            ts.timestamps()[4],
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn slice_keeps_frequency_and_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ts = TimeSeries::from_start(start, (0..10).map(f64::from).collect(), Frequency::Daily)
            .unwrap();

        let sliced = ts.slice(2, 5).unwrap();
        assert_eq!(sliced.values(), &[2.0, 3.0, 4.0]);
        assert_eq!(sliced.frequency(), Some(Frequency::Daily));

        assert!(matches!(
            ts.slice(5, 11),
            Err(ForecastError::IndexOutOfBounds { index: 11, size: 10 })
        ));
        assert!(matches!(
            ts.slice(5, 2),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn ensure_complete_reports_missing_values() {
        let ts = TimeSeries::univariate(make_daily_timestamps(3), vec![1.0, f64::NAN, 3.0])
            .unwrap();
        assert!(ts.has_missing_values());
        assert_eq!(ts.ensure_complete(), Err(ForecastError::MissingValues));
    }

    #[test]
    fn future_timestamps_requires_frequency() {
        let ts = TimeSeries::univariate(make_daily_timestamps(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            ts.future_timestamps(2),
            Err(ForecastError::TimestampError(_))
        ));
    }

    #[test]
    fn scaled_multiplies_values() {
        let ts = TimeSeries::univariate(make_daily_timestamps(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.scaled(2.5).values(), &[2.5, 5.0, 7.5]);
    }
}
