//! Gaussian naive Bayes classifier
//!
//! Parameter names follow scikit-learn's fitted attributes
//! (`class_prior_`, `theta_`, `var_`) so an export step can dump them directly.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, NUM_FEATURES};
use super::tree::argmax;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianNb {
    pub classes: Vec<String>,
    pub class_prior: Vec<f64>,
    /// Per-class feature means
    pub theta: Vec<[f64; NUM_FEATURES]>,
    /// Per-class feature variances
    pub var: Vec<[f64; NUM_FEATURES]>,
}

impl GaussianNb {
    pub fn validate(&self) -> Result<(), String> {
        let n = self.classes.len();
        if self.class_prior.len() != n || self.theta.len() != n || self.var.len() != n {
            return Err(format!(
                "expected {} priors, means and variances, got {}, {} and {}",
                n,
                self.class_prior.len(),
                self.theta.len(),
                self.var.len()
            ));
        }
        if let Some(i) = self.class_prior.iter().position(|p| !(*p > 0.0)) {
            return Err(format!("class {} has non-positive prior", i));
        }
        for (i, (means, vars)) in self.theta.iter().zip(&self.var).enumerate() {
            if means.iter().any(|m| !m.is_finite()) {
                return Err(format!("class {} has a non-finite mean", i));
            }
            if vars.iter().any(|v| !(*v > 0.0) || !v.is_finite()) {
                return Err(format!("class {} has a non-positive variance", i));
            }
        }
        Ok(())
    }

    /// Unnormalised log posterior per class
    pub fn joint_log_likelihood(&self, row: &FeatureVector) -> Vec<f64> {
        self.class_prior
            .iter()
            .zip(self.theta.iter().zip(&self.var))
            .map(|(prior, (means, vars))| {
                let log_pdf: f64 = (0..NUM_FEATURES)
                    .map(|j| {
                        let diff = row.get(j) - means[j];
                        -0.5 * (2.0 * PI * vars[j]).ln() - 0.5 * diff * diff / vars[j]
                    })
                    .sum();
                prior.ln() + log_pdf
            })
            .collect()
    }

    pub fn predict_index(&self, row: &FeatureVector) -> usize {
        argmax(&self.joint_log_likelihood(row))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn two_class_nb() -> GaussianNb {
        GaussianNb {
            classes: vec!["rice".to_string(), "chickpea".to_string()],
            class_prior: vec![0.5, 0.5],
            theta: vec![
                [80.0, 48.0, 40.0, 23.7, 82.3, 6.4, 236.2],
                [40.0, 67.8, 79.9, 18.9, 16.9, 7.3, 80.1],
            ],
            var: vec![[100.0, 50.0, 10.0, 5.0, 2.0, 0.5, 900.0]; 2],
        }
    }

    #[test]
    fn test_predicts_nearest_class() {
        let nb = two_class_nb();
        assert!(nb.validate().is_ok());

        let wet = FeatureVector::new([90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]);
        assert_eq!(nb.predict_index(&wet), 0);

        let dry = FeatureVector::new([40.0, 68.0, 80.0, 19.0, 17.0, 7.2, 80.0]);
        assert_eq!(nb.predict_index(&dry), 1);
    }

    #[test]
    fn test_validate_rejects_zero_variance() {
        let mut nb = two_class_nb();
        nb.var[1][4] = 0.0;
        assert!(nb.validate().unwrap_err().contains("class 1"));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut nb = two_class_nb();
        nb.class_prior.pop();
        assert!(nb.validate().is_err());
    }
}
