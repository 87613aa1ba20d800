//! End-to-end evaluation scenarios.
//!
//! Monthly inflation-like data with smoothing models, daily sales with a
//! promotion regressor, residual diagnostics on seeded noise, and the
//! failure paths a caller has to handle.

use chrono::NaiveDate;
use forecast_eval::datasets::{daily_series, monthly_series, CompanySales, PROMOTIONS};
use forecast_eval::evaluation::{
    evaluate, EvaluationConfig, Evaluator, MaseScale, NormalityVerdict, TableRenderer,
};
use forecast_eval::impute::{forward_fill, zero_fill};
use forecast_eval::models::{ArimaOrder, ModelKind, SeasonalOrder, TrendKind};
use forecast_eval::transform::Transform;
use forecast_eval::ForecastError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Ten years of a smooth monthly rate with a yearly wave.
fn inflation_rows() -> Vec<(i32, u32, f64)> {
    (0..120)
        .map(|i| {
            let year = 2012 + i / 12;
            let month = (i % 12) as u32 + 1;
            let t = i as f64;
            let value = 2.0 + 0.01 * t + 0.4 * (2.0 * std::f64::consts::PI * t / 12.0).sin();
            (year, month, value)
        })
        .collect()
}

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2014, 1, 2).unwrap();
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

/// Daily pasta sales of two companies; B1 sells 15 more units per promotion.
fn pasta_columns(n: usize) -> Vec<(String, Vec<f64>)> {
    let promo: Vec<f64> = (0..n)
        .map(|i| match i {
            _ if i % 17 == 3 => f64::NAN,
            _ if i % 5 == 0 => 1.0,
            _ => 0.0,
        })
        .collect();
    let qty: Vec<f64> = (0..n)
        .map(|i| {
            if i == 40 {
                return f64::NAN;
            }
            let p = if promo[i].is_nan() { 0.0 } else { promo[i] };
            20.0 + 15.0 * p + 0.5 * (i as f64 * 0.9).sin()
        })
        .collect();
    vec![
        ("QTY_B1_1".to_string(), qty),
        ("PROMO_B1_1".to_string(), promo),
        ("QTY_B2_1".to_string(), vec![7.0; n]),
        ("PROMO_B2_1".to_string(), vec![0.0; n]),
    ]
}

#[test]
fn monthly_inflation_with_smoothing_models() {
    let series = monthly_series(&inflation_rows()).unwrap();
    let config = EvaluationConfig::new(3).with_seasonal_period(12);

    let naive = evaluate(&ModelKind::NaiveLast, &series, None, &config).unwrap();
    let holt_winters = evaluate(
        &ModelKind::ExponentialSmoothing {
            trend: Some(TrendKind::Additive),
            damped: true,
            seasonal_period: Some(12),
        },
        &series,
        None,
        &config,
    )
    .unwrap();

    // 120 - 96 - 3 + 1
    assert_eq!(naive.n_folds, 22);
    assert_eq!(holt_winters.n_folds, 22);
    assert_eq!(holt_winters.model, "ETS(A,Ad,A)");
    assert!(holt_winters.mae < naive.mae);
    assert!(holt_winters.mase.unwrap() < naive.mase.unwrap());
    assert!(holt_winters.mape.is_some());
    assert_eq!(holt_winters.predictions.len(), 24);
}

#[test]
fn sarima_on_monthly_data() {
    let series = monthly_series(&inflation_rows()).unwrap();
    let kind = ModelKind::Sarimax {
        order: ArimaOrder::new(1, 0, 0),
        seasonal: Some(SeasonalOrder::new(0, 1, 0, 12)),
    };
    let summary = evaluate(&kind, &series, None, &EvaluationConfig::new(1)).unwrap();
    assert_eq!(summary.model, "SARIMAX(1,0,0)(0,1,0)[12]");
    assert_eq!(summary.n_folds, 24);
    assert!(summary.mae < 0.1, "mae = {}", summary.mae);
}

#[test]
fn transformed_pipeline_stays_on_original_scale() {
    let series = monthly_series(&inflation_rows()).unwrap();
    let plain = evaluate(&ModelKind::NaiveLast, &series, None, &EvaluationConfig::new(1)).unwrap();
    let logged = evaluate(
        &ModelKind::NaiveLast.transformed(Transform::Log),
        &series,
        None,
        &EvaluationConfig::new(1),
    )
    .unwrap();
    assert_eq!(logged.model, "Log(NaiveLast)");
    assert!((plain.mae - logged.mae).abs() < 1e-9);
}

#[test]
fn pasta_sales_with_promotions() {
    let n = 100;
    let company = CompanySales::from_columns(&dates(n), &pasta_columns(n), "B1").unwrap();
    assert!(company.sales.has_missing_values());
    assert!(company.promotions.has_missing_values());

    let sales = forward_fill(&company.sales).unwrap();
    let promotions = zero_fill(&company.promotions).unwrap();
    assert_eq!(promotions.names(), vec![PROMOTIONS]);

    let config = EvaluationConfig::new(7);
    let with_promotions =
        evaluate(&ModelKind::arima(1, 0, 0), &sales, Some(&promotions), &config).unwrap();
    let baseline = evaluate(&ModelKind::NaiveMean, &sales, None, &config).unwrap();

    // 100 - 80 - 7 + 1
    assert_eq!(with_promotions.n_folds, 14);
    assert!(
        with_promotions.mae < baseline.mae,
        "{} vs {}",
        with_promotions.mae,
        baseline.mae
    );
}

#[test]
fn incomplete_pasta_data_is_rejected() {
    let n = 100;
    let company = CompanySales::from_columns(&dates(n), &pasta_columns(n), "B1").unwrap();
    let config = EvaluationConfig::new(7);

    let unfilled = evaluate(
        &ModelKind::arima(1, 0, 0),
        &forward_fill(&company.sales).unwrap(),
        Some(&company.promotions),
        &config,
    );
    assert_eq!(unfilled.unwrap_err(), ForecastError::MissingValues);

    let missing_target = evaluate(&ModelKind::NaiveMean, &company.sales, None, &config);
    assert_eq!(missing_target.unwrap_err(), ForecastError::MissingValues);
}

#[test]
fn normal_residuals_are_mostly_judged_normal() {
    let noise = Normal::new(0.0, 1.0).unwrap();
    let config = EvaluationConfig::new(1).with_residual_analysis(true);

    let mut normal = 0;
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows: Vec<(NaiveDate, f64)> = dates(250)
            .into_iter()
            .map(|d| (d, 10.0 + noise.sample(&mut rng)))
            .collect();
        let series = daily_series(&rows).unwrap();
        let summary = evaluate(&ModelKind::NaiveMean, &series, None, &config).unwrap();
        let report = summary.residuals.unwrap();
        assert_eq!(report.n, 50);
        if report.verdict == NormalityVerdict::Normal {
            normal += 1;
        }
    }
    assert!(normal >= 15, "only {normal} of 20 runs judged normal");
}

#[test]
fn trending_residuals_show_autocorrelation() {
    let rows: Vec<(NaiveDate, f64)> = dates(200)
        .into_iter()
        .enumerate()
        .map(|(i, d)| (d, (i as f64 * 0.3).sin() * 10.0))
        .collect();
    let series = daily_series(&rows).unwrap();
    let config = EvaluationConfig::new(1)
        .with_residual_analysis(true)
        .with_lags(vec![1, 5]);
    let summary = evaluate(&ModelKind::NaiveMean, &series, None, &config).unwrap();
    let report = summary.residuals.unwrap();
    assert_eq!(report.autocorrelated_lags(), vec![1, 5]);
}

#[test]
fn too_short_training_window_fails_the_fold() {
    let series = monthly_series(&inflation_rows()[..30]).unwrap();
    let kind = ModelKind::Sarimax {
        order: ArimaOrder::new(1, 0, 0),
        seasonal: Some(SeasonalOrder::new(1, 1, 0, 12)),
    };
    let err = evaluate(&kind, &series, None, &EvaluationConfig::new(1)).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::FoldFailed { fold: 0, ref source }
            if matches!(**source, ForecastError::InsufficientData { .. })
    ));
}

#[test]
fn configuration_from_json() {
    let config: EvaluationConfig = serde_json::from_str(
        r#"{"horizon": 3, "mase_scale": "global", "seasonal_period": 12}"#,
    )
    .unwrap();
    let kind: ModelKind = serde_json::from_str(
        r#"{"model": "exponential_smoothing", "trend": null, "seasonal_period": 12}"#,
    )
    .unwrap();

    let series = monthly_series(&inflation_rows()).unwrap();
    let summary = evaluate(&kind, &series, None, &config).unwrap();
    assert_eq!(config.mase_scale, MaseScale::Global);
    assert_eq!(summary.model, "ETS(A,N,A)");
    assert_eq!(summary.n_folds, 22);
}

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn table_renderer_prints_the_comparison() {
    let buffer = SharedBuffer::default();
    let series = monthly_series(&inflation_rows()).unwrap();
    let mut evaluator = Evaluator::new(EvaluationConfig::new(1).with_plot(true))
        .with_renderer(TableRenderer::new(buffer.clone()));
    let summary = evaluator
        .evaluate(&ModelKind::NaiveLast, &series, None)
        .unwrap();

    let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "NaiveLast");
    assert_eq!(lines.len(), summary.predictions.len() + 2);
    assert!(lines[2].starts_with("2020-01-01"));
    assert!(lines.last().unwrap().starts_with("2021-12-01"));
}
