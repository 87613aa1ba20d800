//! Seasonal ARIMA with exogenous regressors.

use crate::core::{ExogenousFrame, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference_levels, differencing_lags, integrate_levels};
use crate::models::Forecaster;
use crate::utils::ols::{ols_fit, ols_residuals, OLSResult};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use serde::{Deserialize, Serialize};

/// Non-seasonal order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Seasonal order `(P, D, Q)[s]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    /// Seasonal period (s)
    pub period: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }
}

/// Coefficients of the four lag polynomials.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SarimaCoefficients {
    pub intercept: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

/// SARIMAX forecasting model.
///
/// Regression with SARIMA errors: when regressors are given, the target is
/// first regressed on them by OLS and the SARIMA(p,d,q)(P,D,Q)\[s\] model is
/// fitted to the regression residuals. Forecasts add the regression
/// contribution of the future regressor rows back.
///
/// The AR and MA polynomials are multiplicative:
/// `(1 - φ(L))(1 - Φ(L^s)) w_t = (1 + θ(L))(1 + Θ(L^s)) e_t`,
/// where `w` is the differenced series. Coefficients are estimated by
/// conditional sum of squares.
#[derive(Debug, Clone)]
pub struct Sarimax {
    order: ArimaOrder,
    seasonal: Option<SeasonalOrder>,
    label: String,
    coefficients: Option<SarimaCoefficients>,
    /// Expanded AR polynomial: `w_t` depends on `ar_poly[k] * w_{t-1-k}`.
    ar_poly: Vec<f64>,
    /// Expanded MA polynomial.
    ma_poly: Vec<f64>,
    regression: Option<OLSResult>,
    lags: Vec<usize>,
    levels: Vec<Vec<f64>>,
    errors: Vec<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl Sarimax {
    /// Create a non-seasonal ARIMA(p, d, q) model.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_order(ArimaOrder::new(p, d, q), None)
    }

    /// Create a model from explicit orders.
    pub fn with_order(order: ArimaOrder, seasonal: Option<SeasonalOrder>) -> Self {
        let label = match seasonal {
            Some(s) => format!(
                "SARIMAX({},{},{})({},{},{})[{}]",
                order.p, order.d, order.q, s.p, s.d, s.q, s.period
            ),
            None => format!("SARIMAX({},{},{})", order.p, order.d, order.q),
        };
        Self {
            order,
            seasonal,
            label,
            coefficients: None,
            ar_poly: Vec::new(),
            ma_poly: Vec::new(),
            regression: None,
            lags: Vec::new(),
            levels: Vec::new(),
            errors: Vec::new(),
            fitted: None,
            residuals: None,
        }
    }

    /// Add a seasonal component.
    pub fn seasonal(self, p: usize, d: usize, q: usize, period: usize) -> Self {
        Self::with_order(self.order, Some(SeasonalOrder::new(p, d, q, period)))
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn seasonal_order(&self) -> Option<SeasonalOrder> {
        self.seasonal
    }

    /// Estimated coefficients, once fitted.
    pub fn coefficients(&self) -> Option<&SarimaCoefficients> {
        self.coefficients.as_ref()
    }

    /// Regression on the exogenous columns, when fitted with regressors.
    pub fn regression(&self) -> Option<&OLSResult> {
        self.regression.as_ref()
    }

    fn seasonal_parts(&self) -> (usize, usize, usize, usize) {
        self.seasonal
            .map(|s| (s.p, s.d, s.q, s.period))
            .unwrap_or((0, 0, 0, 0))
    }

    /// Shortest training window the orders allow.
    pub fn min_length(&self) -> usize {
        let (sp, sd, sq, s) = self.seasonal_parts();
        let ar_span = self.order.p + sp * s;
        let ma_span = self.order.q + sq * s;
        self.order.d + sd * s + ar_span.max(ma_span) + 2
    }

    /// Multiply `(1 + a_1 L + ...)` by `(1 + b_1 L^s + ...)` and drop the
    /// leading 1. `sign` is -1 for AR polynomials and +1 for MA polynomials.
    fn expand(regular: &[f64], seasonal: &[f64], period: usize, sign: f64) -> Vec<f64> {
        let mut left = vec![1.0];
        left.extend(regular.iter().map(|c| sign * c));
        let mut right = vec![0.0; seasonal.len() * period + 1];
        right[0] = 1.0;
        for (j, c) in seasonal.iter().enumerate() {
            right[(j + 1) * period] = sign * c;
        }

        let mut product = vec![0.0; left.len() + right.len() - 1];
        for (i, a) in left.iter().enumerate() {
            for (j, b) in right.iter().enumerate() {
                product[i + j] += a * b;
            }
        }
        product[1..].iter().map(|c| sign * c).collect()
    }

    fn unpack(&self, params: &[f64]) -> SarimaCoefficients {
        let (sp, _, sq, _) = self.seasonal_parts();
        let (p, q) = (self.order.p, self.order.q);
        let mut offset = 1;
        let mut take = |k: usize| {
            let slice = params[offset..offset + k].to_vec();
            offset += k;
            slice
        };
        let ar = take(p);
        let ma = take(q);
        let seasonal_ar = take(sp);
        let seasonal_ma = take(sq);
        SarimaCoefficients {
            intercept: params[0],
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
        }
    }

    fn polynomials(&self, c: &SarimaCoefficients) -> (Vec<f64>, Vec<f64>) {
        let period = self.seasonal.map(|s| s.period).unwrap_or(1);
        (
            Self::expand(&c.ar, &c.seasonal_ar, period, -1.0),
            Self::expand(&c.ma, &c.seasonal_ma, period, 1.0),
        )
    }

    /// One-step predictions and errors of the ARMA recursion on `w`.
    fn filter(w: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> (Vec<f64>, Vec<f64>, usize) {
        let n = w.len();
        let start = ar.len().max(ma.len()).min(n);
        let mut predictions = vec![f64::NAN; n];
        let mut errors = vec![0.0; n];

        for t in start..n {
            let mut pred = intercept;
            for (k, a) in ar.iter().enumerate() {
                pred += a * (w[t - 1 - k] - intercept);
            }
            for (k, b) in ma.iter().enumerate() {
                pred += b * errors[t - 1 - k];
            }
            predictions[t] = pred;
            errors[t] = w[t] - pred;
        }
        (predictions, errors, start)
    }

    fn css(&self, w: &[f64], params: &[f64]) -> f64 {
        let coefficients = self.unpack(params);
        let (ar, ma) = self.polynomials(&coefficients);
        let (_, errors, start) = Self::filter(w, coefficients.intercept, &ar, &ma);
        errors[start..].iter().map(|e| e * e).sum()
    }

    /// Estimate coefficients using conditional least squares.
    fn estimate(&self, w: &[f64]) -> Result<SarimaCoefficients> {
        let (sp, _, sq, _) = self.seasonal_parts();
        let (p, q) = (self.order.p, self.order.q);
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let n_coef = p + q + sp + sq;

        let mut initial = vec![mean];
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        for k in [p, q, sp, sq] {
            for i in 0..k {
                initial.push(0.1 / (i + 1) as f64);
                bounds.push((-0.99, 0.99));
            }
        }

        if n_coef == 0 {
            return Ok(self.unpack(&initial));
        }

        let config = NelderMeadConfig {
            max_iter: 500 * (n_coef + 1),
            ..Default::default()
        };
        let result = nelder_mead(|x| self.css(w, x), &initial, Some(&bounds), config);
        if !result.is_finite() {
            return Err(ForecastError::Convergence(format!(
                "{}: conditional sum of squares is not finite",
                self.label
            )));
        }
        Ok(self.unpack(&result.optimal_point))
    }

    fn check_regressors(&self, exog: &ExogenousFrame, rows: usize) -> Result<()> {
        if exog.len() != rows {
            return Err(ForecastError::DimensionMismatch {
                expected: rows,
                got: exog.len(),
            });
        }
        if exog.has_missing_values() {
            return Err(ForecastError::MissingValues);
        }
        Ok(())
    }
}

impl Default for Sarimax {
    fn default() -> Self {
        Self::with_order(ArimaOrder::default(), None)
    }
}

impl Forecaster for Sarimax {
    fn fit(&mut self, series: &TimeSeries, exog: Option<&ExogenousFrame>) -> Result<()> {
        let values = series.values();
        let min_len = self.min_length();
        if values.len() < min_len {
            return Err(ForecastError::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }
        if let Some(s) = self.seasonal {
            if s.period < 2 {
                return Err(ForecastError::InvalidParameter(format!(
                    "seasonal period must be at least 2, got {}",
                    s.period
                )));
            }
        }

        let regression = match exog.filter(|frame| !frame.columns().is_empty()) {
            Some(frame) => {
                self.check_regressors(frame, values.len())?;
                Some(ols_fit(values, frame)?)
            }
            None => None,
        };
        let target = match (&regression, exog) {
            (Some(ols), Some(frame)) => ols_residuals(values, ols, frame)?,
            _ => values.to_vec(),
        };

        let (_, sd, _, s) = self.seasonal_parts();
        let lags = differencing_lags(self.order.d, sd, s);
        let levels = difference_levels(&target, &lags);
        let w = levels.last().cloned().unwrap_or_default();

        let coefficients = self.estimate(&w)?;
        let (ar_poly, ma_poly) = self.polynomials(&coefficients);
        let (_, errors, start) = Self::filter(&w, coefficients.intercept, &ar_poly, &ma_poly);

        // The one-step error on the differenced scale is also the one-step
        // error on the original scale.
        let undefined = values.len() - w.len() + start;
        let residuals: Vec<f64> = (0..values.len())
            .map(|t| {
                if t < undefined {
                    f64::NAN
                } else {
                    errors[t - (values.len() - w.len())]
                }
            })
            .collect();
        let fitted = values.iter().zip(&residuals).map(|(y, e)| y - e).collect();

        self.coefficients = Some(coefficients);
        self.ar_poly = ar_poly;
        self.ma_poly = ma_poly;
        self.regression = regression;
        self.lags = lags;
        self.levels = levels;
        self.errors = errors;
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize, exog: Option<&ExogenousFrame>) -> Result<Forecast> {
        let coefficients = self.coefficients.as_ref().ok_or(ForecastError::FitRequired)?;

        let offsets = match (&self.regression, exog) {
            (Some(ols), Some(frame)) => {
                self.check_regressors(frame, horizon)?;
                Some(ols.predict(frame)?)
            }
            (Some(_), None) => {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} was fitted with regressors; future rows are required",
                    self.label
                )))
            }
            (None, Some(frame)) if !frame.columns().is_empty() => {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} was fitted without regressors",
                    self.label
                )))
            }
            (None, _) => None,
        };

        let w = self.levels.last().ok_or(ForecastError::FitRequired)?;
        let mu = coefficients.intercept;
        let mut extended = w.clone();
        let mut errors = self.errors.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = mu;
            for (k, a) in self.ar_poly.iter().enumerate() {
                if t > k {
                    pred += a * (extended[t - 1 - k] - mu);
                }
            }
            for (k, b) in self.ma_poly.iter().enumerate() {
                if t > k {
                    pred += b * errors[t - 1 - k];
                }
            }
            extended.push(pred);
            // Future errors are zero in expectation.
            errors.push(0.0);
        }

        let predictions = integrate_levels(&extended[w.len()..], &self.levels, &self.lags);
        let forecast = Forecast::from_values(predictions);
        Ok(match offsets {
            Some(offsets) => forecast.offset_by(&offsets),
            None => forecast,
        })
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

    fn supports_exog(&self) -> bool {
        true
    }
}
