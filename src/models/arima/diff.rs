//! Differencing utilities for ARIMA models.
//!
//! Regular and seasonal differencing are both differences at a lag: lag 1
//! for `d` and lag `s` for `D`. Every intermediate level is kept so that
//! forecasts on the differenced scale can be integrated back exactly.

/// Apply differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    lagged_difference(series, &vec![1; d])
}

/// Apply seasonal differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Seasonal differencing order
/// * `period` - Seasonal period
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    lagged_difference(series, &vec![period; d])
}

/// Lags for `d` regular and `seasonal_d` seasonal differences, regular first.
pub fn differencing_lags(d: usize, seasonal_d: usize, period: usize) -> Vec<usize> {
    let mut lags = vec![1; d];
    if period > 0 {
        lags.extend(std::iter::repeat(period).take(seasonal_d));
    }
    lags
}

/// Difference at each lag in turn.
pub fn lagged_difference(series: &[f64], lags: &[usize]) -> Vec<f64> {
    difference_levels(series, lags)
        .pop()
        .unwrap_or_else(|| series.to_vec())
}

/// Every level of the differencing: `levels[0]` is the input and
/// `levels[k + 1]` is `levels[k]` differenced at `lags[k]`.
///
/// Differencing stops early when a level becomes too short for its lag.
pub fn difference_levels(series: &[f64], lags: &[usize]) -> Vec<Vec<f64>> {
    let mut levels = vec![series.to_vec()];
    for &lag in lags {
        let Some(current) = levels.last() else { break };
        if current.len() <= lag {
            break;
        }
        let next = current[lag..]
            .iter()
            .zip(current.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
        levels.push(next);
    }
    levels
}

/// Integrate forecasts made on the most differenced level back to the
/// scale of `levels[0]`.
///
/// `levels` and `lags` must come from [`difference_levels`].
pub fn integrate_levels(forecast: &[f64], levels: &[Vec<f64>], lags: &[usize]) -> Vec<f64> {
    let depth = (levels.len().saturating_sub(1)).min(lags.len());
    let mut current = forecast.to_vec();

    for k in (0..depth).rev() {
        let lag = lags[k];
        let base = &levels[k];
        let mut extended = base.clone();
        for &step in &current {
            let anchor = extended[extended.len() - lag];
            extended.push(step + anchor);
        }
        current = extended[base.len()..].to_vec();
    }
    current
}

/// Integrate (reverse differencing) a differenced series.
///
/// # Arguments
/// * `differenced` - Future values of the `d`-times differenced series
/// * `original` - The original series (needed for initial values)
/// * `d` - Differencing order used
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let lags = vec![1; d];
    integrate_levels(differenced, &difference_levels(original, &lags), &lags)
}
