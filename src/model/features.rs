//! Feature vector consumed by every classifier.
//!
//! The column order is fixed by how the model was trained and must never
//! change: `[N, P, K, temperature, humidity, ph, rainfall]`.

use serde::{Deserialize, Serialize};

/// Number of input features
pub const NUM_FEATURES: usize = 7;

/// Form keys / training columns, in model input order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

/// A single row of model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }

    /// Value at a column index (panics on out-of-range, callers validate indices at load time)
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    /// Name of the first column holding NaN or an infinity, if any
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.0
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| FEATURE_NAMES[i])
    }
}
