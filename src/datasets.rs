//! Shaping in-memory tables into evaluation inputs.
//!
//! Reading files is left to the caller; these helpers take already-parsed
//! rows or columns and apply the dataset conventions:
//! - monthly tables with `(year, month, value)` rows,
//! - daily tables with `(date, value)` rows,
//! - per-company sales tables whose column names encode company, quantity
//!   (`QTY`) and promotion (`PROMO`) counters.

use crate::core::{ExogenousFrame, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Name of the exogenous column produced by [`CompanySales`].
pub const PROMOTIONS: &str = "promotions";

/// Build a monthly series from `(year, month, value)` rows in time order.
pub fn monthly_series(rows: &[(i32, u32, f64)]) -> Result<TimeSeries> {
    if rows.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    let periods: Vec<(i32, u32)> = rows.iter().map(|&(y, m, _)| (y, m)).collect();
    let values = rows.iter().map(|&(_, _, v)| v).collect();
    TimeSeries::from_year_month(&periods, values)
}

/// Build a daily series from `(date, value)` rows in time order.
pub fn daily_series(rows: &[(NaiveDate, f64)]) -> Result<TimeSeries> {
    if rows.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    let dates: Vec<NaiveDate> = rows.iter().map(|&(d, _)| d).collect();
    let values = rows.iter().map(|&(_, v)| v).collect();
    TimeSeries::from_dates(&dates, values)
}

/// Total sales and promotion count of one company.
#[derive(Debug, Clone)]
pub struct CompanySales {
    /// Daily total quantity sold.
    pub sales: TimeSeries,
    /// Daily promotion count, in a single [`PROMOTIONS`] column.
    pub promotions: ExogenousFrame,
}

impl CompanySales {
    /// Select one company's columns and aggregate them.
    ///
    /// A column belongs to the company when its name contains `company`
    /// (e.g. `"B1"`). Columns also containing `"QTY"` are summed into the
    /// sales target; columns containing `"PROMO"` are summed into the
    /// promotion count. A missing entry makes the row sum missing, so the
    /// imputer decides how the gap is filled.
    pub fn from_columns(
        dates: &[NaiveDate],
        columns: &[(String, Vec<f64>)],
        company: &str,
    ) -> Result<Self> {
        if dates.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        for (name, values) in columns {
            if values.len() != dates.len() {
                return Err(ForecastError::DataFormat(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
        }

        let company_columns: Vec<&(String, Vec<f64>)> = columns
            .iter()
            .filter(|(name, _)| name.contains(company))
            .collect();

        let qty = sum_matching(&company_columns, "QTY", dates.len()).ok_or_else(|| {
            ForecastError::DataFormat(format!("no QTY column for company '{company}'"))
        })?;
        let promo =
            sum_matching(&company_columns, "PROMO", dates.len()).unwrap_or_else(|| vec![0.0; dates.len()]);

        let sales = TimeSeries::from_dates(dates, qty)?;
        let mut frame = BTreeMap::new();
        frame.insert(PROMOTIONS.to_string(), promo);
        let promotions = ExogenousFrame::for_series(&sales, frame)?;

        Ok(Self { sales, promotions })
    }
}

fn sum_matching(columns: &[&(String, Vec<f64>)], marker: &str, rows: usize) -> Option<Vec<f64>> {
    let matching: Vec<&Vec<f64>> = columns
        .iter()
        .filter(|(name, _)| name.contains(marker))
        .map(|(_, values)| values)
        .collect();
    if matching.is_empty() {
        return None;
    }
    Some(
        (0..rows)
            .map(|i| matching.iter().map(|col| col[i]).sum())
            .collect(),
    )
}
