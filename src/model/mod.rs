//! Model module: the classifier interface and the supported model families
//!
//! A trained model is exported to a JSON artifact whose `"type"` tag selects
//! the family. The loader decodes and validates it once at startup; afterwards
//! the model is only ever read.
//!
//! A decoded [`CropModel`] cannot predict on its own. It has to pass
//! validation and become a [`LoadedModel`] first, so traversal never sees an
//! out-of-range node or feature index.
//!
//! ## Supported families
//!
//! - `decision_tree`: a single CART tree
//! - `random_forest`: probability-averaging ensemble of trees
//! - `gaussian_nb`: Gaussian naive Bayes

pub mod features;
pub mod loader;
pub mod naive_bayes;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::utils::error::{CropError, Result};

pub use features::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};
pub use loader::{load_model, parse_model};
pub use naive_bayes::GaussianNb;
pub use tree::{DecisionTree, RandomForest, Tree};

/// A trained classifier mapping feature rows to crop labels
///
/// Implementations are immutable after construction and shared across
/// request handlers without locking.
pub trait Classifier: Send + Sync {
    /// Predict one label per input row
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>>;

    /// Labels this model can produce
    fn classes(&self) -> &[String];

    /// Short name of the model family
    fn family(&self) -> &'static str;
}

/// Every classifier family the artifact format can carry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CropModel {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    GaussianNb(GaussianNb),
}

impl CropModel {
    /// Check structural consistency
    pub fn validate(&self) -> Result<()> {
        if self.classes().is_empty() {
            return Err(CropError::InvalidArtifact("class list is empty".to_string()));
        }
        let checked = match self {
            CropModel::DecisionTree(m) => m.validate(),
            CropModel::RandomForest(m) => m.validate(),
            CropModel::GaussianNb(m) => m.validate(),
        };
        checked.map_err(CropError::InvalidArtifact)
    }

    fn predict_index(&self, row: &FeatureVector) -> usize {
        match self {
            CropModel::DecisionTree(m) => m.predict_index(row),
            CropModel::RandomForest(m) => m.predict_index(row),
            CropModel::GaussianNb(m) => m.predict_index(row),
        }
    }

    /// Labels this model can produce
    pub fn classes(&self) -> &[String] {
        match self {
            CropModel::DecisionTree(m) => &m.classes,
            CropModel::RandomForest(m) => &m.classes,
            CropModel::GaussianNb(m) => &m.classes,
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            CropModel::DecisionTree(_) => "decision_tree",
            CropModel::RandomForest(_) => "random_forest",
            CropModel::GaussianNb(_) => "gaussian_nb",
        }
    }
}

/// A [`CropModel`] that passed validation and is ready to serve predictions
#[derive(Debug, Clone)]
pub struct LoadedModel(CropModel);

impl TryFrom<CropModel> for LoadedModel {
    type Error = CropError;

    fn try_from(model: CropModel) -> Result<Self> {
        model.validate()?;
        Ok(Self(model))
    }
}

impl Classifier for LoadedModel {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>> {
        if let Some((i, name)) = rows
            .iter()
            .enumerate()
            .find_map(|(i, r)| r.first_non_finite().map(|name| (i, name)))
        {
            return Err(CropError::Inference(format!(
                "Input contains NaN or infinity (row {}, column '{}')",
                i, name
            )));
        }

        let classes = self.0.classes();
        rows.iter()
            .map(|row| {
                let index = self.0.predict_index(row);
                classes.get(index).cloned().ok_or_else(|| {
                    CropError::Inference(format!("predicted class index {} out of range", index))
                })
            })
            .collect()
    }

    fn classes(&self) -> &[String] {
        self.0.classes()
    }

    fn family(&self) -> &'static str {
        self.0.family()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::naive_bayes::tests::two_class_nb;
    use crate::model::tree::tests::rainfall_tree;

    fn decoded_tree() -> CropModel {
        CropModel::DecisionTree(DecisionTree {
            classes: vec!["rice".to_string(), "maize".to_string()],
            tree: rainfall_tree(),
        })
    }

    fn tree_model() -> LoadedModel {
        LoadedModel::try_from(decoded_tree()).unwrap()
    }

    #[test]
    fn test_predict_labels_per_row() {
        let model = tree_model();
        let rows = [
            FeatureVector::new([90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]),
            FeatureVector::new([78.0, 42.0, 42.0, 20.1, 81.6, 7.6, 62.7]),
        ];
        let labels = model.predict(&rows).unwrap();
        assert_eq!(labels, vec!["rice".to_string(), "maize".to_string()]);
    }

    #[test]
    fn test_predict_rejects_non_finite_input() {
        let model = tree_model();
        let rows = [FeatureVector::new([90.0, 42.0, 43.0, f64::NAN, 82.0, 6.5, 202.9])];
        let err = model.predict(&rows).unwrap_err();
        assert!(matches!(err, CropError::Inference(ref msg) if msg.contains("temperature")));
    }

    #[test]
    fn test_validate_rejects_empty_classes() {
        let mut nb = two_class_nb();
        nb.classes.clear();
        nb.class_prior.clear();
        nb.theta.clear();
        nb.var.clear();
        assert!(CropModel::GaussianNb(nb).validate().is_err());
    }

    #[test]
    fn test_decoded_model_must_validate_before_predicting() {
        let json = r#"{
            "type": "decision_tree",
            "classes": ["rice", "maize"],
            "tree": {
                "children_left": [7, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [6, -2, -2],
                "threshold": [150.0, -2.0, -2.0],
                "value": [[5.0, 5.0], [0.0, 4.0], [5.0, 1.0]]
            }
        }"#;
        let decoded: CropModel = serde_json::from_str(json).unwrap();
        let err = LoadedModel::try_from(decoded).unwrap_err();
        assert!(matches!(err, CropError::InvalidArtifact(_)));

        let bad_feature = json.replace("[6, -2, -2]", "[42, -2, -2]");
        let decoded: CropModel = serde_json::from_str(&bad_feature).unwrap();
        assert!(LoadedModel::try_from(decoded).is_err());
    }

    #[test]
    fn test_family_names() {
        assert_eq!(tree_model().family(), "decision_tree");
        assert_eq!(CropModel::GaussianNb(two_class_nb()).family(), "gaussian_nb");
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_value(decoded_tree()).unwrap();
        assert_eq!(json["type"], "decision_tree");
        assert_eq!(json["classes"][0], "rice");
    }
}
