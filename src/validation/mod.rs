//! Statistical tests for model residuals.
//!
//! # Example
//!
//! ```
//! use forecast_eval::validation::{anderson_darling, ljung_box};
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb_result = ljung_box(&residuals, Some(5), 0);
//! if lb_result.is_white_noise(0.05) {
//!     println!("Residuals pass Ljung-Box test");
//! }
//!
//! let ad = anderson_darling(&residuals).unwrap();
//! println!("A2 = {:.3}, normal: {}", ad.statistic, ad.is_normal(0.05));
//! ```

pub mod normality;
pub mod residual_tests;

pub use normality::{anderson_darling, AndersonDarlingResult, SIGNIFICANCE_LEVELS};
pub use residual_tests::{ljung_box, ljung_box_lags, LjungBoxResult};
