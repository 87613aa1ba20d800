//! Forecast result structure for holding point predictions.

/// Point predictions for consecutive future steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { point: values }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Get the point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    /// Apply `f` to every prediction, e.g. to invert a transform.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            point: self.point.into_iter().map(f).collect(),
        }
    }

    /// Add `offsets` step by step, e.g. a regression contribution.
    pub fn offset_by(mut self, offsets: &[f64]) -> Self {
        for (p, o) in self.point.iter_mut().zip(offsets) {
            *p += o;
        }
        self
    }

    pub fn into_values(self) -> Vec<f64> {
        self.point
    }
}
