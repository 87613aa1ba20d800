//! Anderson-Darling test for normality of residuals.
//!
//! Mean and variance are estimated from the sample, so the critical values
//! and p-value follow Stephens (1974) and D'Agostino & Stephens (1986) for
//! the composite normal case.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Significance levels with tabulated critical values.
pub const SIGNIFICANCE_LEVELS: [f64; 5] = [0.15, 0.10, 0.05, 0.025, 0.01];

/// Asymptotic critical values for the composite normal case.
const ASYMPTOTIC_CRITICAL: [f64; 5] = [0.576, 0.656, 0.787, 0.918, 1.092];

/// Minimum sample size for a meaningful statistic.
const MIN_SAMPLE: usize = 8;

/// Anderson-Darling test result.
#[derive(Debug, Clone, PartialEq)]
pub struct AndersonDarlingResult {
    /// Test statistic A²
    pub statistic: f64,
    /// Small-sample adjusted statistic `A² (1 + 0.75/n + 2.25/n²)`
    pub adjusted_statistic: f64,
    /// P-value (approximate)
    pub p_value: f64,
    /// Critical values for [`SIGNIFICANCE_LEVELS`], adjusted for sample size.
    pub critical_values: [f64; 5],
    /// Sample size
    pub n: usize,
}

impl AndersonDarlingResult {
    /// Whether normality is not rejected at `alpha`.
    ///
    /// Tabulated levels compare the statistic with its critical value; other
    /// levels fall back to the p-value.
    pub fn is_normal(&self, alpha: f64) -> bool {
        match SIGNIFICANCE_LEVELS
            .iter()
            .position(|&level| (level - alpha).abs() < 1e-9)
        {
            Some(i) => self.statistic < self.critical_values[i],
            None => self.p_value > alpha,
        }
    }
}

/// Perform the Anderson-Darling test of the null hypothesis that `sample`
/// comes from a normal distribution.
///
/// # Errors
/// `InsufficientData` for fewer than 8 finite values, `ComputationError`
/// for a sample with zero variance.
pub fn anderson_darling(sample: &[f64]) -> Result<AndersonDarlingResult> {
    let mut x: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    let n = x.len();
    if n < MIN_SAMPLE {
        return Err(ForecastError::InsufficientData {
            needed: MIN_SAMPLE,
            got: n,
        });
    }
    x.sort_by(|a, b| a.total_cmp(b));

    let nf = n as f64;
    let mean = x.iter().sum::<f64>() / nf;
    let variance = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0);
    if variance <= 0.0 {
        return Err(ForecastError::ComputationError(
            "Anderson-Darling test needs a sample with non-zero variance".to_string(),
        ));
    }

    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ComputationError(e.to_string()))?;
    let sd = variance.sqrt();
    let z: Vec<f64> = x.iter().map(|v| (v - mean) / sd).collect();

    let sum: f64 = (0..n)
        .map(|i| {
            let weight = (2 * i + 1) as f64;
            weight * (standard.cdf(z[i]).ln() + standard.sf(z[n - 1 - i]).ln())
        })
        .sum();
    let statistic = -nf - sum / nf;
    let adjusted_statistic = statistic * (1.0 + 0.75 / nf + 2.25 / (nf * nf));

    let shrink = 1.0 + 4.0 / nf - 25.0 / (nf * nf);
    let critical_values = ASYMPTOTIC_CRITICAL.map(|c| c / shrink);

    Ok(AndersonDarlingResult {
        statistic,
        adjusted_statistic,
        p_value: p_value(adjusted_statistic),
        critical_values,
        n,
    })
}

/// D'Agostino & Stephens approximation of the p-value.
fn p_value(a: f64) -> f64 {
    if !a.is_finite() {
        return 0.0;
    }
    let p = if a >= 0.6 {
        (1.2937 - 5.709 * a + 0.0186 * a * a).exp()
    } else if a >= 0.34 {
        (0.9177 - 4.279 * a - 1.38 * a * a).exp()
    } else if a >= 0.2 {
        1.0 - (-8.318 + 42.796 * a - 59.938 * a * a).exp()
    } else {
        1.0 - (-13.436 + 101.14 * a - 223.73 * a * a).exp()
    };
    p.clamp(0.0, 1.0)
}
