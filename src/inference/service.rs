//! Prediction service
//!
//! Owns the per-request pipeline: parse the submitted form fields, assemble a
//! single feature row in training column order, run the classifier, and fold
//! every failure into a [`PredictionOutcome`]. Nothing in here returns an
//! error to the caller.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use super::outcome::{PredictError, PredictionOutcome};
use crate::model::{Classifier, FeatureVector, FEATURE_NAMES, NUM_FEATURES};

/// Remove `_` digit separators; each one must sit between two digits
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }

    let bytes = text.as_bytes();
    let is_digit_at = |i: Option<usize>| {
        i.and_then(|i| bytes.get(i))
            .is_some_and(|b| b.is_ascii_digit())
    };
    let well_placed = bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'_')
        .all(|(i, _)| is_digit_at(i.checked_sub(1)) && is_digit_at(Some(i + 1)));

    well_placed.then(|| Cow::Owned(text.replace('_', "")))
}

/// Parse one form value as a float, ignoring surrounding whitespace
///
/// Accepts `_` separators between digits (`1_000.5`).
fn parse_float(raw: &str) -> Option<f64> {
    strip_digit_separators(raw.trim())?.parse::<f64>().ok()
}

/// Build the model input row from submitted form fields
///
/// Fields are read in [`FEATURE_NAMES`] order; the first missing or
/// non-numeric one aborts parsing.
pub fn parse_features(fields: &HashMap<String, String>) -> Result<FeatureVector, PredictError> {
    let mut values = [0.0; NUM_FEATURES];

    for (slot, &name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
        let raw = fields.get(name).ok_or(PredictError::MissingField(name))?;
        *slot = parse_float(raw).ok_or_else(|| PredictError::InvalidNumber {
            field: name,
            value: raw.clone(),
        })?;
    }

    Ok(FeatureVector::new(values))
}

/// Runs predictions against a shared, read-only classifier
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    /// Run the full pipeline for one submitted form
    pub fn handle_predict(&self, fields: &HashMap<String, String>) -> PredictionOutcome {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let result = parse_features(fields).and_then(|row| self.invoke(&row));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(label) => info!(
                request_id = %request_id,
                label = %label,
                elapsed_ms,
                "Prediction succeeded"
            ),
            Err(error) => warn!(
                request_id = %request_id,
                kind = %error.kind(),
                error = %error,
                elapsed_ms,
                "Prediction failed"
            ),
        }

        result.into()
    }

    /// Predict a single row and take the first label
    fn invoke(&self, row: &FeatureVector) -> Result<String, PredictError> {
        let labels = self
            .model
            .predict(std::slice::from_ref(row))
            .map_err(|e| PredictError::ModelInvocation(e.to_string()))?;

        labels
            .into_iter()
            .next()
            .ok_or_else(|| PredictError::ModelInvocation("model returned no prediction".to_string()))
    }
}
