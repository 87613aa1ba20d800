//! Variance-stabilising transformations with exact inverses.
//!
//! # Example
//!
//! ```
//! use forecast_eval::transform::Transform;
//!
//! let series = vec![1.0, 10.0, 100.0];
//! let (fitted, transformed) = Transform::Log.fit_apply(&series).unwrap();
//! let restored: Vec<f64> = transformed.iter().map(|&y| fitted.inverse(y)).collect();
//! assert!((restored[2] - 100.0).abs() < 1e-9);
//! ```

pub mod boxcox;

pub use boxcox::{boxcox, boxcox_lambda, inv_boxcox};

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Transform applied to a target before fitting a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    /// Natural logarithm; requires strictly positive data.
    Log,
    /// Square root; requires non-negative data.
    Sqrt,
    /// Box-Cox; lambda estimated by maximum likelihood when `None`.
    BoxCox { lambda: Option<f64> },
}

/// A transform with every parameter resolved, ready to invert forecasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FittedTransform {
    Log,
    Sqrt,
    BoxCox { lambda: f64 },
}

impl Transform {
    /// Resolve parameters on `values` and return the transformed data.
    pub fn fit_apply(&self, values: &[f64]) -> Result<(FittedTransform, Vec<f64>)> {
        let fitted = match *self {
            Transform::Log => {
                require(values, |v| v > 0.0, "log transform requires positive values")?;
                FittedTransform::Log
            }
            Transform::Sqrt => {
                require(values, |v| v >= 0.0, "sqrt transform requires non-negative values")?;
                FittedTransform::Sqrt
            }
            Transform::BoxCox { lambda } => {
                require(values, |v| v > 0.0, "Box-Cox transform requires positive values")?;
                FittedTransform::BoxCox {
                    lambda: lambda.unwrap_or_else(|| boxcox_lambda(values)),
                }
            }
        };
        let transformed = values.iter().map(|&v| fitted.apply(v)).collect();
        Ok((fitted, transformed))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Log => "Log",
            Transform::Sqrt => "Sqrt",
            Transform::BoxCox { .. } => "BoxCox",
        }
    }
}

impl FittedTransform {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            FittedTransform::Log => value.ln(),
            FittedTransform::Sqrt => value.sqrt(),
            FittedTransform::BoxCox { lambda } => boxcox::boxcox_value(value, lambda),
        }
    }

    /// Map a value on the transformed scale back to the original scale.
    pub fn inverse(&self, value: f64) -> f64 {
        match *self {
            FittedTransform::Log => value.exp(),
            // Negative forecasts on the sqrt scale are clipped to zero.
            FittedTransform::Sqrt => value.max(0.0).powi(2),
            FittedTransform::BoxCox { lambda } => boxcox::inv_boxcox_value(value, lambda),
        }
    }
}

fn require(values: &[f64], ok: impl Fn(f64) -> bool, message: &str) -> Result<()> {
    if values.iter().all(|&v| ok(v)) {
        Ok(())
    } else {
        Err(ForecastError::InvalidParameter(message.to_string()))
    }
}
