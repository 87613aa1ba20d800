//! Derivative-free minimisation used to estimate smoothing and ARMA parameters.

/// Result of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex collapsed within tolerance before `max_iter`.
    pub converged: bool,
}

impl NelderMeadResult {
    /// A run is usable when it ended on a finite objective value.
    pub fn is_finite(&self) -> bool {
        self.optimal_value.is_finite() && self.optimal_point.iter().all(|p| p.is_finite())
    }
}

/// Configuration for Nelder-Mead.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop when the spread of objective values falls below this.
    pub tolerance: f64,
    /// Relative size of the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimise `objective` starting from `initial`.
///
/// Points are clamped into `bounds` (one `(min, max)` pair per dimension)
/// whenever bounds are given. Non-finite objective values are treated as
/// +infinity so that they are always replaced first.
///
/// # Example
/// ```
/// use forecast_eval::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
/// assert!((result.optimal_point[0] - 2.0).abs() < 1e-3);
/// assert!((result.optimal_point[1] + 1.0).abs() < 1e-3);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    };

    if n == 0 {
        let value = eval(initial);
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: value,
            iterations: 0,
            converged: true,
        };
    }

    let clamp = |mut x: Vec<f64>| {
        if let Some(b) = bounds {
            for (xi, &(lo, hi)) in x.iter_mut().zip(b) {
                *xi = xi.clamp(lo, hi);
            }
        }
        x
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp(initial.to_vec()));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp(vertex));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        if (values[n] - values[0]).abs() < config.tolerance {
            converged = true;
            break;
        }

        // Centroid of every vertex except the worst.
        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
            .collect();
        let towards = |from: &[f64], coef: f64| -> Vec<f64> {
            clamp(
                centroid
                    .iter()
                    .zip(from)
                    .map(|(c, p)| c + coef * (p - c))
                    .collect(),
            )
        };

        let reflected = towards(&simplex[n], -REFLECT);
        let fr = eval(&reflected);

        if fr < values[0] {
            let expanded = towards(&simplex[n], -REFLECT * EXPAND);
            let fe = eval(&expanded);
            if fe < fr {
                simplex[n] = expanded;
                values[n] = fe;
            } else {
                simplex[n] = reflected;
                values[n] = fr;
            }
            continue;
        }

        if fr < values[n - 1] {
            simplex[n] = reflected;
            values[n] = fr;
            continue;
        }

        let (contracted, limit) = if fr < values[n] {
            (towards(&reflected, CONTRACT), fr)
        } else {
            (towards(&simplex[n], CONTRACT), values[n])
        };
        let fc = eval(&contracted);
        if fc < limit {
            simplex[n] = contracted;
            values[n] = fc;
            continue;
        }

        let best = simplex[0].clone();
        for i in 1..=n {
            let shrunk: Vec<f64> = best
                .iter()
                .zip(&simplex[i])
                .map(|(b, x)| b + SHRINK * (x - b))
                .collect();
            simplex[i] = clamp(shrunk);
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}
