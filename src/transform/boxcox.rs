//! Box-Cox power transformation.
//!
//! For lambda != 0: `y = (x^lambda - 1) / lambda`; for lambda == 0: `y = ln(x)`.

const LAMBDA_EPS: f64 = 1e-10;

/// Search interval for the maximum likelihood lambda.
const LAMBDA_RANGE: (f64, f64) = (-1.0, 2.0);

/// Apply Box-Cox with a given lambda. Non-positive inputs map to NaN.
pub fn boxcox(series: &[f64], lambda: f64) -> Vec<f64> {
    series.iter().map(|&x| boxcox_value(x, lambda)).collect()
}

pub(crate) fn boxcox_value(x: f64, lambda: f64) -> f64 {
    if x <= 0.0 {
        f64::NAN
    } else if lambda.abs() < LAMBDA_EPS {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

/// Inverse Box-Cox: `x = (lambda * y + 1)^(1/lambda)`, or `exp(y)` for lambda == 0.
pub fn inv_boxcox(transformed: &[f64], lambda: f64) -> Vec<f64> {
    transformed
        .iter()
        .map(|&y| inv_boxcox_value(y, lambda))
        .collect()
}

pub(crate) fn inv_boxcox_value(y: f64, lambda: f64) -> f64 {
    if lambda.abs() < LAMBDA_EPS {
        return y.exp();
    }
    let base = lambda * y + 1.0;
    if base <= 0.0 {
        f64::NAN
    } else {
        base.powf(1.0 / lambda)
    }
}

/// Maximum likelihood lambda for strictly positive data.
///
/// Maximises the profile log-likelihood by golden-section search over
/// `[-1, 2]`. Returns 1.0 (identity up to a shift) when fewer than two
/// positive values are available.
pub fn boxcox_lambda(series: &[f64]) -> f64 {
    let positive: Vec<f64> = series.iter().copied().filter(|&x| x > 0.0).collect();
    if positive.len() < 2 {
        return 1.0;
    }

    let invphi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let (mut a, mut b) = LAMBDA_RANGE;
    let mut c = b - invphi * (b - a);
    let mut d = a + invphi * (b - a);
    let mut fc = boxcox_llf(&positive, c);
    let mut fd = boxcox_llf(&positive, d);

    while (b - a).abs() > 1e-6 {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - invphi * (b - a);
            fc = boxcox_llf(&positive, c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + invphi * (b - a);
            fd = boxcox_llf(&positive, d);
        }
    }

    (a + b) / 2.0
}

/// Profile log-likelihood (up to a constant) of normal data after the transform.
fn boxcox_llf(series: &[f64], lambda: f64) -> f64 {
    let n = series.len() as f64;
    let transformed = boxcox(series, lambda);
    let mean = transformed.iter().sum::<f64>() / n;
    let variance = transformed.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / n;
    if !variance.is_finite() || variance <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let log_sum: f64 = series.iter().map(|x| x.ln()).sum();
    -0.5 * n * variance.ln() + (lambda - 1.0) * log_sum
}
