//! Expanding-window train/test splitting.

use crate::error::{ForecastError, Result};
use std::ops::Range;

/// One train/test split of a series, as index ranges.
///
/// The training window always starts at 0 and the test window starts right
/// after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Position of the fold, starting at 0.
    pub index: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

impl Fold {
    /// Index of the first forecast step (the forecast origin + 1).
    pub fn train_end(&self) -> usize {
        self.train.end
    }
}

/// Splitter whose training window grows by `step` for every fold.
///
/// Fold `k` trains on `[0, floor(initial_fraction * n) + k * step)` and tests
/// on the following `horizon` points. A fold whose test window would run
/// past the end of the data is dropped, never truncated.
///
/// # Example
///
/// ```
/// use forecast_eval::evaluation::ExpandingWindowSplitter;
///
/// let splitter = ExpandingWindowSplitter::new(0.8, 1).unwrap();
/// let folds: Vec<_> = splitter.split(10).unwrap().collect();
/// assert_eq!(folds.len(), 2);
/// assert_eq!(folds[0].train, 0..8);
/// assert_eq!(folds[1].test, 9..10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandingWindowSplitter {
    initial_fraction: f64,
    horizon: usize,
    step: usize,
}

impl ExpandingWindowSplitter {
    /// Create a splitter with a step of 1.
    ///
    /// # Errors
    /// `InvalidParameter` when `initial_fraction` is not in `(0, 1)` or
    /// `horizon` is 0.
    pub fn new(initial_fraction: f64, horizon: usize) -> Result<Self> {
        if !(initial_fraction > 0.0 && initial_fraction < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "initial fraction must be in (0, 1), got {initial_fraction}"
            )));
        }
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            initial_fraction,
            horizon,
            step: 1,
        })
    }

    /// Grow the training window by `step` points per fold.
    pub fn with_step(mut self, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(ForecastError::InvalidParameter(
                "step must be at least 1".to_string(),
            ));
        }
        self.step = step;
        Ok(self)
    }

    pub fn initial_fraction(&self) -> f64 {
        self.initial_fraction
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Length of the first training window for a series of `n` points.
    pub fn initial_train_len(&self, n: usize) -> usize {
        (self.initial_fraction * n as f64).floor() as usize
    }

    /// Number of folds [`split`](Self::split) yields for `n` points.
    pub fn n_folds(&self, n: usize) -> Result<usize> {
        Ok(self.split(n)?.len())
    }

    /// Lazily enumerate the folds for a series of `n` points.
    ///
    /// Every call starts again from the first fold.
    ///
    /// # Errors
    /// `InsufficientData` when the initial training window would be empty.
    pub fn split(&self, n: usize) -> Result<Folds> {
        let initial = self.initial_train_len(n);
        if initial == 0 {
            return Err(ForecastError::InsufficientData {
                needed: (1.0 / self.initial_fraction).ceil() as usize,
                got: n,
            });
        }
        Ok(Folds {
            next_train_end: initial,
            index: 0,
            n,
            horizon: self.horizon,
            step: self.step,
        })
    }
}

/// Iterator over the folds of an [`ExpandingWindowSplitter`].
#[derive(Debug, Clone)]
pub struct Folds {
    next_train_end: usize,
    index: usize,
    n: usize,
    horizon: usize,
    step: usize,
}

impl Iterator for Folds {
    type Item = Fold;

    fn next(&mut self) -> Option<Fold> {
        let train_end = self.next_train_end;
        if train_end + self.horizon > self.n {
            return None;
        }
        let fold = Fold {
            index: self.index,
            train: 0..train_end,
            test: train_end..train_end + self.horizon,
        };
        self.index += 1;
        self.next_train_end += self.step;
        Some(fold)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.n.checked_sub(self.next_train_end + self.horizon) {
            Some(slack) => slack / self.step + 1,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Folds {}
