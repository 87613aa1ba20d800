//! Autocorrelation tests for model residuals.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Ljung-Box test result for one lag.
#[derive(Debug, Clone, PartialEq)]
pub struct LjungBoxResult {
    /// Test statistic Q
    pub statistic: f64,
    pub p_value: f64,
    /// Number of lags tested
    pub lags: usize,
    /// Degrees of freedom
    pub df: usize,
}

impl LjungBoxResult {
    /// Returns true if we fail to reject the null (residuals are white noise).
    pub fn is_white_noise(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Perform the Ljung-Box test for autocorrelation in residuals.
///
/// Tests the null hypothesis that residuals are independently distributed.
///
/// # Arguments
/// * `residuals` - Model residuals
/// * `lags` - Number of lags to include (default: min(10, n/5)), capped at n - 1
/// * `fitted_params` - Number of fitted parameters (degrees of freedom adjustment)
pub fn ljung_box(residuals: &[f64], lags: Option<usize>, fitted_params: usize) -> LjungBoxResult {
    let n = residuals.len();
    if n < 3 {
        return LjungBoxResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            df: 0,
        };
    }

    let lags = lags
        .unwrap_or_else(|| 10.min(n / 5).max(1))
        .clamp(1, n - 1);
    let df = lags.saturating_sub(fitted_params).max(1);

    let acf = autocorrelations(residuals, lags);
    let Some(acf) = acf else {
        // A constant series has no autocorrelation to detect.
        return LjungBoxResult {
            statistic: 0.0,
            p_value: 1.0,
            lags,
            df,
        };
    };

    let q: f64 = acf
        .iter()
        .enumerate()
        .map(|(i, r)| r * r / (n - (i + 1)) as f64)
        .sum::<f64>()
        * n as f64
        * (n + 2) as f64;

    LjungBoxResult {
        statistic: q,
        p_value: chi_squared_sf(q, df),
        lags,
        df,
    }
}

/// Run [`ljung_box`] once per lag, dropping lags the sample cannot support.
///
/// The result is ordered like `lags` with duplicates removed. Fewer than
/// three residuals support no lag at all.
pub fn ljung_box_lags(residuals: &[f64], lags: &[usize]) -> Vec<LjungBoxResult> {
    let n = residuals.len();
    if n < 3 {
        return Vec::new();
    }
    let mut wanted: Vec<usize> = Vec::with_capacity(lags.len());
    for &k in lags {
        if k >= 1 && k < n && !wanted.contains(&k) {
            wanted.push(k);
        }
    }
    wanted
        .into_iter()
        .map(|k| ljung_box(residuals, Some(k), 0))
        .collect()
}

/// Sample autocorrelations at lags `1..=max_lag`; `None` for a constant series.
fn autocorrelations(x: &[f64], max_lag: usize) -> Option<Vec<f64>> {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let centered: Vec<f64> = x.iter().map(|v| v - mean).collect();
    let var: f64 = centered.iter().map(|v| v * v).sum();
    if var == 0.0 {
        return None;
    }
    Some(
        (1..=max_lag)
            .map(|k| {
                centered[k..]
                    .iter()
                    .zip(&centered)
                    .map(|(a, b)| a * b)
                    .sum::<f64>()
                    / var
            })
            .collect(),
    )
}

/// Survival function of the chi-squared distribution.
fn chi_squared_sf(x: f64, df: usize) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    match ChiSquared::new(df as f64) {
        Ok(dist) => dist.sf(x.max(0.0)),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn white_noise_like_sequence() {
        let residuals: Vec<f64> = (0..100)
            .map(|i| ((i * 17 + 13) % 97) as f64 / 50.0 - 1.0)
            .collect();

        let result = ljung_box(&residuals, Some(10), 0);

        assert!(result.statistic >= 0.0);
        assert!(result.p_value >= 0.0 && result.p_value <= 1.0);
        assert_eq!(result.lags, 10);
    }

    #[test]
    fn autocorrelated_series_is_rejected() {
        let mut residuals = vec![0.0; 100];
        residuals[0] = 1.0;
        for i in 1..100 {
            residuals[i] = 0.9 * residuals[i - 1] + 0.1 * ((i * 17) % 23) as f64 / 23.0;
        }

        let result = ljung_box(&residuals, Some(10), 0);
        assert!(result.p_value < 0.05);
        assert!(!result.is_white_noise(0.05));
    }

    #[test]
    fn alternating_series_has_large_statistic() {
        let residuals: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let result = ljung_box(&residuals, Some(1), 0);
        // r_1 = -49/50, Q = n(n+2) r_1^2 / (n-1)
        let r1: f64 = -49.0 / 50.0;
        assert_relative_eq!(result.statistic, 50.0 * 52.0 * r1 * r1 / 49.0, epsilon = 1e-9);
        assert!(result.p_value < 1e-6);
    }

    #[test]
    fn constant_series_is_white_noise() {
        let result = ljung_box(&[3.0; 20], Some(5), 0);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn lags_are_capped() {
        let residuals = vec![1.0, -0.5, 0.3, -0.2, 0.8];
        assert_eq!(ljung_box(&residuals, Some(40), 0).lags, 4);
        assert_eq!(ljung_box(&[1.0, 2.0], Some(1), 0).lags, 0);
    }

    #[test]
    fn fitted_params_reduce_degrees_of_freedom() {
        let residuals: Vec<f64> = (0..60).map(|i| (i as f64 * 1.3).sin()).collect();
        assert_eq!(ljung_box(&residuals, Some(10), 2).df, 8);
        assert_eq!(ljung_box(&residuals, Some(2), 5).df, 1);
    }

    #[test]
    fn per_lag_results() {
        let residuals: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64).collect();
        let results = ljung_box_lags(&residuals, &[1, 2, 3, 40]);
        let lags: Vec<usize> = results.iter().map(|r| r.lags).collect();
        assert_eq!(lags, vec![1, 2, 3]);
        // Q grows with the number of lags
        assert!(results[1].statistic >= results[0].statistic);
        assert!(results[2].statistic >= results[1].statistic);
    }

    #[test]
    fn repeated_lags_are_reported_once() {
        let residuals: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64).collect();
        let lags: Vec<usize> = ljung_box_lags(&residuals, &[1, 2, 1, 3, 2])
            .iter()
            .map(|r| r.lags)
            .collect();
        assert_eq!(lags, vec![1, 2, 3]);
        assert!(ljung_box_lags(&[1.0, -1.0], &[1]).is_empty());
    }

    #[test]
    fn chi_squared_survival() {
        assert_relative_eq!(chi_squared_sf(0.0, 3), 1.0, epsilon = 1e-12);
        // P(X > 3.841) for df = 1 is 0.05
        assert_relative_eq!(chi_squared_sf(3.841_458_820_694_124, 1), 0.05, epsilon = 1e-6);
        assert!(chi_squared_sf(f64::NAN, 2).is_nan());
    }
}
