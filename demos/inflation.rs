//! Rolling-origin evaluation of several models on monthly inflation data.
//!
//! Run with: cargo run --example inflation

use forecast_eval::datasets::monthly_series;
use forecast_eval::evaluation::{EvaluationConfig, Evaluator, TableRenderer};
use forecast_eval::models::{ArimaOrder, ModelKind, SeasonalOrder, TrendKind};
use forecast_eval::transform::Transform;

fn main() {
    println!("=== Monthly inflation: rolling-origin evaluation ===\n");

    // Synthetic year-over-year inflation, 2010-2023
    let rows: Vec<(i32, u32, f64)> = (0..168)
        .map(|i| {
            let t = i as f64;
            let value = 2.0
                + 0.015 * t                                           // slow drift
                + 0.5 * (2.0 * std::f64::consts::PI * t / 12.0).sin() // yearly wave
                + 0.2 * (t * 0.37).cos();                             // wiggle
            (2010 + i / 12, (i % 12) as u32 + 1, value)
        })
        .collect();
    let series = monthly_series(&rows).unwrap();
    println!("{} monthly observations", series.len());

    let models = vec![
        ModelKind::NaiveMean,
        ModelKind::NaiveLast,
        ModelKind::ExponentialSmoothing {
            trend: Some(TrendKind::Additive),
            damped: false,
            seasonal_period: Some(12),
        },
        ModelKind::ExponentialSmoothing {
            trend: Some(TrendKind::Additive),
            damped: true,
            seasonal_period: Some(12),
        },
        ModelKind::Sarimax {
            order: ArimaOrder::new(1, 0, 1),
            seasonal: Some(SeasonalOrder::new(0, 1, 1, 12)),
        },
        ModelKind::arima(1, 1, 0).transformed(Transform::Log),
        ModelKind::NaiveLast.transformed(Transform::BoxCox { lambda: None }),
    ];

    let config = EvaluationConfig::new(3)
        .with_seasonal_period(12)
        .with_residual_analysis(true)
        .with_lags(vec![1, 3, 6, 12]);
    let mut evaluator = Evaluator::new(config);

    for kind in &models {
        println!("\n--- {} ---", kind.build().name());
        match evaluator.evaluate(kind, &series, None) {
            Ok(summary) => print!("{summary}"),
            Err(e) => println!("evaluation failed: {e}"),
        }
    }

    // Print the merged forecasts of the damped model as a table
    println!("\n--- Forecast comparison ---");
    let mut evaluator = Evaluator::new(EvaluationConfig::new(3).with_plot(true))
        .with_renderer(TableRenderer::new(std::io::stdout()));
    evaluator.evaluate(&models[3], &series, None).unwrap();
}
