//! Model loading
//!
//! Reads the exported artifact from disk exactly once. Any failure here is
//! meant to abort startup: the server never runs without a valid model.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::features::FEATURE_NAMES;
use super::{Classifier, CropModel, LoadedModel};
use crate::utils::error::{CropError, Result};

/// On-disk model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Training column order, checked against [`FEATURE_NAMES`] when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub model: CropModel,
}

impl ModelArtifact {
    pub fn new(model: CropModel) -> Self {
        Self {
            feature_names: Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect()),
            model,
        }
    }

    /// Check the column order and the model structure
    pub fn into_model(self) -> Result<LoadedModel> {
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(CropError::InvalidArtifact(format!(
                    "feature_names {:?} do not match expected order {:?}",
                    names, FEATURE_NAMES
                )));
            }
        }
        LoadedModel::try_from(self.model)
    }
}

/// Decode and validate an artifact from its JSON text
pub fn parse_model(json: &str) -> Result<LoadedModel> {
    let artifact: ModelArtifact = serde_json::from_str(json)?;
    artifact.into_model()
}

/// Load the classifier artifact at `path`
///
/// # Errors
/// * [`CropError::ModelNotFound`] if nothing exists at `path`
/// * [`CropError::Io`] if the file cannot be read
/// * [`CropError::Serialization`] / [`CropError::InvalidArtifact`] if it is corrupt
pub fn load_model(path: &Path) -> Result<LoadedModel> {
    if !path.exists() {
        return Err(CropError::ModelNotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path)?;
    debug!("Read {} bytes from {:?}", json.len(), path);

    let model = parse_model(&json)?;

    info!(
        "Loaded {} model from {:?} ({} classes)",
        model.family(),
        path,
        model.classes().len()
    );

    Ok(model)
}
