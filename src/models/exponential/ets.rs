//! Exponential smoothing with optional trend, damping and additive seasonality.
//!
//! One model covers the Holt-Winters family: simple smoothing, Holt's
//! linear trend (optionally damped), exponential (multiplicative) trend and
//! additive seasonal variants of each.

use crate::core::{ExogenousFrame, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::traits::reject_exog;
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use serde::{Deserialize, Serialize};

const SMOOTHING_BOUNDS: (f64, f64) = (0.0001, 0.9999);
const DAMPING_BOUNDS: (f64, f64) = (0.8, 0.98);

/// How the trend component combines with the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendKind {
    /// `l + h × b`
    Additive,
    /// `l × b^h`; requires strictly positive data.
    Multiplicative,
}

/// Smoothing parameters chosen by the optimiser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: Option<f64>,
    pub phi: Option<f64>,
    pub gamma: Option<f64>,
}

/// Exponential smoothing forecaster.
///
/// The model equations (additive trend, additive season with period `m`):
/// - Forecast: `ŷ_t = l_{t-1} + φ b_{t-1} + s_{t-m}`
/// - Level: `l_t = α (y_t - s_{t-m}) + (1-α) (l_{t-1} + φ b_{t-1})`
/// - Trend: `b_t = β (l_t - l_{t-1}) + (1-β) φ b_{t-1}`
/// - Season: `s_t = γ (y_t - l_t) + (1-γ) s_{t-m}`
///
/// `φ` is fixed at 1 unless the trend is damped, in which case it is
/// estimated in `[0.8, 0.98]`. All smoothing parameters are estimated by
/// minimising the one-step-ahead sum of squared errors with Nelder-Mead.
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    trend: Option<TrendKind>,
    damped: bool,
    seasonal_period: Option<usize>,
    label: String,
    params: Option<SmoothingParams>,
    state: Option<FinalState>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct FinalState {
    level: f64,
    trend: f64,
    season: Vec<f64>,
    n: usize,
}

/// Output of one pass of the smoothing recursion.
struct Pass {
    sse: f64,
    fitted: Vec<f64>,
    state: FinalState,
}

impl ExponentialSmoothing {
    /// Create an unfitted model.
    ///
    /// Invalid combinations (damping without a trend, a seasonal period
    /// below 2) are reported by [`Forecaster::fit`].
    pub fn new(trend: Option<TrendKind>, damped: bool, seasonal_period: Option<usize>) -> Self {
        let trend_code = match (trend, damped) {
            (None, _) => "N",
            (Some(TrendKind::Additive), false) => "A",
            (Some(TrendKind::Additive), true) => "Ad",
            (Some(TrendKind::Multiplicative), false) => "M",
            (Some(TrendKind::Multiplicative), true) => "Md",
        };
        let season_code = if seasonal_period.is_some() { "A" } else { "N" };
        Self {
            trend,
            damped,
            seasonal_period,
            label: format!("ETS(A,{trend_code},{season_code})"),
            params: None,
            state: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Simple exponential smoothing (level only).
    pub fn simple() -> Self {
        Self::new(None, false, None)
    }

    /// Holt's linear trend, optionally damped.
    pub fn holt(damped: bool) -> Self {
        Self::new(Some(TrendKind::Additive), damped, None)
    }

    /// Additive Holt-Winters with the given seasonal period.
    pub fn holt_winters(seasonal_period: usize, damped: bool) -> Self {
        Self::new(Some(TrendKind::Additive), damped, Some(seasonal_period))
    }

    /// Estimated parameters, once fitted.
    pub fn params(&self) -> Option<SmoothingParams> {
        self.params
    }

    fn validate(&self, values: &[f64]) -> Result<()> {
        if self.damped && self.trend.is_none() {
            return Err(ForecastError::InvalidParameter(
                "damping requires a trend component".to_string(),
            ));
        }
        let needed = match self.seasonal_period {
            Some(m) if m < 2 => {
                return Err(ForecastError::InvalidParameter(format!(
                    "seasonal period must be at least 2, got {m}"
                )))
            }
            Some(m) => 2 * m,
            None if self.trend.is_some() => 3,
            None => 2,
        };
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }
        if self.trend == Some(TrendKind::Multiplicative) && values.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "multiplicative trend requires positive values".to_string(),
            ));
        }
        Ok(())
    }

    /// Initial level, trend and season, plus the index the recursion starts at.
    fn initial_state(&self, values: &[f64]) -> (f64, f64, Vec<f64>, usize) {
        match self.seasonal_period {
            Some(m) => {
                let first = values[..m].iter().sum::<f64>() / m as f64;
                let second = values[m..2 * m].iter().sum::<f64>() / m as f64;
                let centre = (m as f64 - 1.0) / 2.0;
                let (level, trend, slope) = match self.trend {
                    None => (first, 0.0, 0.0),
                    Some(TrendKind::Additive) => {
                        let b = (second - first) / m as f64;
                        (first + b * centre, b, b)
                    }
                    Some(TrendKind::Multiplicative) => {
                        let b = (second / first).powf(1.0 / m as f64);
                        (first * b.powf(centre), b, (second - first) / m as f64)
                    }
                };
                let season = (0..m)
                    .map(|i| values[i] - (first + slope * (i as f64 - centre)))
                    .collect();
                (level, trend, season, m)
            }
            None => {
                let trend = match self.trend {
                    None => 0.0,
                    Some(TrendKind::Additive) => values[1] - values[0],
                    Some(TrendKind::Multiplicative) => values[1] / values[0],
                };
                (values[0], trend, Vec::new(), 1)
            }
        }
    }

    fn run(&self, values: &[f64], p: &SmoothingParams) -> Pass {
        let (mut l, mut b, mut season, start) = self.initial_state(values);
        let phi = p.phi.unwrap_or(1.0);
        let beta = p.beta.unwrap_or(0.0);
        let gamma = p.gamma.unwrap_or(0.0);
        let m = season.len();

        let mut fitted = Vec::with_capacity(values.len());
        fitted.extend_from_slice(&values[..start]);
        let mut sse = 0.0;

        for (t, &y) in values.iter().enumerate().skip(start) {
            let s = if m > 0 { season[t % m] } else { 0.0 };
            let projected = match self.trend {
                None => l,
                Some(TrendKind::Additive) => l + phi * b,
                Some(TrendKind::Multiplicative) => l * b.powf(phi),
            };
            let forecast = projected + s;
            let error = y - forecast;
            fitted.push(forecast);
            sse += error * error;

            let l_prev = l;
            l = p.alpha * (y - s) + (1.0 - p.alpha) * projected;
            b = match self.trend {
                None => 0.0,
                Some(TrendKind::Additive) => beta * (l - l_prev) + (1.0 - beta) * phi * b,
                Some(TrendKind::Multiplicative) => {
                    beta * (l / l_prev) + (1.0 - beta) * b.powf(phi)
                }
            };
            if m > 0 {
                season[t % m] = gamma * (y - l) + (1.0 - gamma) * s;
            }
        }

        Pass {
            sse,
            fitted,
            state: FinalState {
                level: l,
                trend: b,
                season,
                n: values.len(),
            },
        }
    }

    /// Estimate parameters by minimising the in-sample SSE.
    fn optimize(&self, values: &[f64]) -> Result<SmoothingParams> {
        let has_trend = self.trend.is_some();
        let seasonal = self.seasonal_period.is_some();

        let mut initial = vec![0.3];
        let mut bounds = vec![SMOOTHING_BOUNDS];
        if has_trend {
            initial.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        if self.damped {
            initial.push(0.95);
            bounds.push(DAMPING_BOUNDS);
        }
        if seasonal {
            initial.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }

        let unpack = |x: &[f64]| {
            let mut it = x.iter().copied();
            let alpha = it.next().unwrap_or(0.3);
            let beta = if has_trend { it.next() } else { None };
            let phi = if self.damped { it.next() } else { None };
            let gamma = if seasonal { it.next() } else { None };
            SmoothingParams {
                alpha,
                beta,
                phi,
                gamma,
            }
        };

        let result = nelder_mead(
            |x| self.run(values, &unpack(x)).sse,
            &initial,
            Some(&bounds),
            NelderMeadConfig::default(),
        );
        if !result.is_finite() {
            return Err(ForecastError::Convergence(format!(
                "{}: sum of squared errors is not finite",
                self.label
            )));
        }
        Ok(unpack(&result.optimal_point))
    }

    /// Sum of φ^1..φ^h, or h without damping.
    fn damped_sum(phi: f64, h: usize) -> f64 {
        if (phi - 1.0).abs() < 1e-10 {
            h as f64
        } else {
            phi * (1.0 - phi.powi(h as i32)) / (1.0 - phi)
        }
    }
}

impl Forecaster for ExponentialSmoothing {
    fn fit(&mut self, series: &TimeSeries, exog: Option<&ExogenousFrame>) -> Result<()> {
        reject_exog(&self.label, exog)?;
        let values = series.values();
        self.validate(values)?;

        let params = self.optimize(values)?;
        let pass = self.run(values, &params);

        self.residuals = Some(values.iter().zip(&pass.fitted).map(|(y, f)| y - f).collect());
        self.fitted = Some(pass.fitted);
        self.state = Some(pass.state);
        self.params = Some(params);
        Ok(())
    }

    fn predict(&self, horizon: usize, exog: Option<&ExogenousFrame>) -> Result<Forecast> {
        reject_exog(&self.label, exog)?;
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        let phi = self.params.and_then(|p| p.phi).unwrap_or(1.0);
        let m = state.season.len();

        let predictions = (1..=horizon)
            .map(|h| {
                let damped = Self::damped_sum(phi, h);
                let base = match self.trend {
                    None => state.level,
                    Some(TrendKind::Additive) => state.level + damped * state.trend,
                    Some(TrendKind::Multiplicative) => state.level * state.trend.powf(damped),
                };
                let s = if m > 0 {
                    state.season[(state.n - 1 + h) % m]
                } else {
                    0.0
                };
                base + s
            })
            .collect();

        Ok(Forecast::from_values(predictions))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        TimeSeries::univariate(timestamps, values).unwrap()
    }

    #[test]
    fn names_follow_ets_notation() {
        assert_eq!(ExponentialSmoothing::simple().name(), "ETS(A,N,N)");
        assert_eq!(ExponentialSmoothing::holt(true).name(), "ETS(A,Ad,N)");
        assert_eq!(ExponentialSmoothing::holt_winters(12, false).name(), "ETS(A,A,A)");
    }

    #[test]
    fn simple_smoothing_of_constant_series() {
        let mut model = ExponentialSmoothing::simple();
        model.fit(&make_series(vec![7.0; 10]), None).unwrap();
        let forecast = model.predict(3, None).unwrap();
        for p in forecast.primary() {
            assert_relative_eq!(*p, 7.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn holt_extends_linear_trend() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        let mut model = ExponentialSmoothing::holt(false);
        model.fit(&make_series(values), None).unwrap();

        let forecast = model.predict(3, None).unwrap();
        assert_relative_eq!(forecast.primary()[0], 50.0, epsilon = 1e-6);
        assert_relative_eq!(forecast.primary()[2], 54.0, epsilon = 1e-6);
    }

    #[test]
    fn damped_trend_flattens() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        let mut model = ExponentialSmoothing::holt(true);
        model.fit(&make_series(values), None).unwrap();

        let phi = model.params().unwrap().phi.unwrap();
        assert!((0.8..=0.98).contains(&phi), "phi = {phi}");

        let forecast = model.predict(10, None).unwrap();
        let steps: Vec<f64> = forecast.primary().windows(2).map(|w| w[1] - w[0]).collect();
        for pair in steps.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn repeats_additive_season() {
        let pattern = [10.0, 20.0, 30.0, 20.0];
        let values: Vec<f64> = (0..20).map(|i| pattern[i % 4]).collect();
        let mut model = ExponentialSmoothing::new(None, false, Some(4));
        model.fit(&make_series(values), None).unwrap();

        let forecast = model.predict(4, None).unwrap();
        for (p, expected) in forecast.primary().iter().zip(pattern) {
            assert_relative_eq!(*p, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn multiplicative_trend_extends_growth() {
        let values: Vec<f64> = (0..15).map(|i| 100.0 * 1.05_f64.powi(i)).collect();
        let last = values[14];
        let mut model = ExponentialSmoothing::new(Some(TrendKind::Multiplicative), false, None);
        model.fit(&make_series(values), None).unwrap();

        let forecast = model.predict(2, None).unwrap();
        assert_relative_eq!(forecast.primary()[0], last * 1.05, max_relative = 1e-6);
        assert_relative_eq!(forecast.primary()[1], last * 1.05 * 1.05, max_relative = 1e-6);
    }

    #[test]
    fn multiplicative_trend_rejects_non_positive() {
        let mut model = ExponentialSmoothing::new(Some(TrendKind::Multiplicative), false, None);
        let result = model.fit(&make_series(vec![1.0, 0.0, 2.0, 3.0]), None);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn seasonal_needs_two_periods() {
        let mut model = ExponentialSmoothing::holt_winters(4, false);
        let result = model.fit(&make_series(vec![1.0; 7]), None);
        assert_eq!(
            result,
            Err(ForecastError::InsufficientData { needed: 8, got: 7 })
        );
    }

    #[test]
    fn damping_without_trend_is_invalid() {
        let mut model = ExponentialSmoothing::new(None, true, None);
        let result = model.fit(&make_series(vec![1.0; 10]), None);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn predict_requires_fit() {
        let model = ExponentialSmoothing::holt(false);
        assert_eq!(model.predict(2, None), Err(ForecastError::FitRequired));
    }

    #[test]
    fn residuals_match_fitted_values() {
        let values = vec![3.0, 5.0, 4.0, 6.0, 8.0, 7.0, 9.0, 11.0];
        let mut model = ExponentialSmoothing::holt(false);
        model.fit(&make_series(values.clone()), None).unwrap();

        let fitted = model.fitted_values().unwrap();
        let residuals = model.residuals().unwrap();
        for i in 0..values.len() {
            assert_relative_eq!(values[i] - fitted[i], residuals[i], epsilon = 1e-12);
        }
    }
}
