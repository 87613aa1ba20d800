//! Daily pasta sales of one company with promotions as a regressor.
//!
//! Run with: cargo run --example pasta_sales

use chrono::NaiveDate;
use forecast_eval::datasets::CompanySales;
use forecast_eval::evaluation::{EvaluationConfig, Evaluator};
use forecast_eval::impute::{forward_fill, zero_fill};
use forecast_eval::models::{ArimaOrder, ModelKind, SeasonalOrder};

fn main() {
    println!("=== Pasta sales: company B1 ===\n");

    let n = 365;
    let start = NaiveDate::from_ymd_opt(2014, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();

    // Two products of B1 plus one product of another company
    let promo = |i: usize, offset: usize| -> f64 {
        if i % 23 == 7 {
            f64::NAN // no record
        } else if (i + offset) % 9 < 2 {
            1.0
        } else {
            0.0
        }
    };
    let qty = |i: usize, offset: usize, base: f64| -> f64 {
        if i % 61 == 30 {
            return f64::NAN;
        }
        let p = promo(i, offset);
        let p = if p.is_nan() { 0.0 } else { p };
        base + 12.0 * p + 4.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin()
    };
    let columns = vec![
        ("QTY_B1_1".to_string(), (0..n).map(|i| qty(i, 0, 30.0)).collect()),
        ("QTY_B1_2".to_string(), (0..n).map(|i| qty(i, 4, 18.0)).collect()),
        ("PROMO_B1_1".to_string(), (0..n).map(|i| promo(i, 0)).collect()),
        ("PROMO_B1_2".to_string(), (0..n).map(|i| promo(i, 4)).collect()),
        ("QTY_B2_1".to_string(), vec![11.0; n]),
    ];

    let company = CompanySales::from_columns(&dates, &columns, "B1").unwrap();
    let sales = forward_fill(&company.sales).unwrap();
    let promotions = zero_fill(&company.promotions).unwrap();
    println!("{} days, regressors: {:?}", sales.len(), promotions.names());

    let config = EvaluationConfig::new(7)
        .with_seasonal_period(7)
        .with_residual_analysis(true)
        .with_lags(vec![1, 7, 14])
        .with_parallel(true);
    let mut evaluator = Evaluator::new(config);

    let weekly = ModelKind::Sarimax {
        order: ArimaOrder::new(1, 0, 0),
        seasonal: Some(SeasonalOrder::new(0, 1, 1, 7)),
    };
    let runs = vec![
        ("mean", ModelKind::NaiveMean, false),
        ("SARIMA", weekly.clone(), false),
        ("SARIMAX + promotions", weekly, true),
    ];

    for (label, kind, with_promotions) in runs {
        println!("\n--- {label} ---");
        let exog = with_promotions.then_some(&promotions);
        match evaluator.evaluate(&kind, &sales, exog) {
            Ok(summary) => print!("{summary}"),
            Err(e) => println!("evaluation failed: {e}"),
        }
    }
}
