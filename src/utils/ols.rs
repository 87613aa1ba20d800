//! Ordinary least squares for exogenous regressors.
//!
//! Models that accept regressors fit `y = intercept + X β` first and model the
//! remaining signal as a time series; forecasts add `intercept + X_future β`
//! back.

use crate::core::ExogenousFrame;
use crate::error::{ForecastError, Result};

/// Fitted regression on the columns of an [`ExogenousFrame`].
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// One coefficient per regressor, in `regressor_names` order.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Column names in the order used for fitting.
    pub regressor_names: Vec<String>,
}

impl OLSResult {
    /// Regression contribution for each row of `frame`.
    ///
    /// The frame must contain exactly the columns used for fitting.
    pub fn predict(&self, frame: &ExogenousFrame) -> Result<Vec<f64>> {
        if frame.columns().len() != self.regressor_names.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "expected regressors {:?}, got {:?}",
                self.regressor_names,
                frame.names()
            )));
        }

        let mut predictions = vec![self.intercept; frame.len()];
        for (name, coef) in self.regressor_names.iter().zip(&self.coefficients) {
            let column = frame.column(name).ok_or_else(|| {
                ForecastError::InvalidParameter(format!("missing regressor '{name}'"))
            })?;
            for (pred, x) in predictions.iter_mut().zip(column) {
                *pred += coef * x;
            }
        }
        Ok(predictions)
    }

    pub fn num_regressors(&self) -> usize {
        self.coefficients.len()
    }
}

/// Fit `y = intercept + Σ β_i x_i` by solving the normal equations.
///
/// A tiny ridge term keeps the system positive definite when a regressor
/// is constant over the training window (e.g. no promotions at all).
pub fn ols_fit(y: &[f64], frame: &ExogenousFrame) -> Result<OLSResult> {
    let n = y.len();
    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if frame.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: frame.len(),
        });
    }

    let regressor_names: Vec<String> = frame.columns().keys().cloned().collect();
    let x_cols: Vec<&[f64]> = frame.columns().values().map(Vec::as_slice).collect();
    let k = x_cols.len() + 1;

    // Row i of the design matrix is [1, x_1[i], ..., x_m[i]].
    let row = |i: usize, j: usize| if j == 0 { 1.0 } else { x_cols[j - 1][i] };

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (i, &yi) in y.iter().enumerate() {
        for a in 0..k {
            let xa = row(i, a);
            xty[a] += xa * yi;
            for b in 0..=a {
                xtx[a][b] += xa * row(i, b);
            }
        }
    }
    for a in 0..k {
        for b in 0..a {
            xtx[b][a] = xtx[a][b];
        }
        xtx[a][a] += 1e-8;
    }

    let beta = cholesky_solve(&xtx, &xty).ok_or_else(|| {
        ForecastError::ComputationError("regression matrix is not positive definite".into())
    })?;

    Ok(OLSResult {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        regressor_names,
    })
}

/// `y - fitted` for the training rows.
pub fn ols_residuals(y: &[f64], ols: &OLSResult, frame: &ExogenousFrame) -> Result<Vec<f64>> {
    let fitted = ols.predict(frame)?;
    if fitted.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: y.len(),
            got: fitted.len(),
        });
    }
    Ok(y.iter().zip(&fitted).map(|(a, f)| a - f).collect())
}

/// Solve `A x = b` for symmetric positive definite `A`.
fn cholesky_solve(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let sum = a[i][j] - (0..j).map(|k| l[i][k] * l[j][k]).sum::<f64>();
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][i] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut z = vec![0.0; n];
    for i in 0..n {
        z[i] = (b[i] - (0..i).map(|j| l[i][j] * z[j]).sum::<f64>()) / l[i][i];
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        x[i] = (z[i] - (i + 1..n).map(|j| l[j][i] * x[j]).sum::<f64>()) / l[i][i];
    }
    Some(x)
}
