//! Decision tree and random forest classifiers
//!
//! Trees use the flat array layout exported by scikit-learn's `tree_`
//! attribute: node `i` is a leaf when `children_left[i] == -1`, otherwise
//! samples with `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the
//! per-class weight at that node.

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, NUM_FEATURES};

/// Marker for "no child" in the children arrays
pub const TREE_LEAF: i64 = -1;

/// A single fitted tree in flat array form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl Tree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    /// Validate structure against the expected number of classes
    ///
    /// Children must point strictly forward, which rules out cycles and
    /// guarantees `leaf_for` terminates.
    pub fn validate(&self, num_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!(
                "tree arrays disagree on node count (children_left has {})",
                n
            ));
        }

        for node in 0..n {
            if self.value[node].len() != num_classes {
                return Err(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    self.value[node].len(),
                    num_classes
                ));
            }

            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(format!("node {} has exactly one child", node));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!(
                        "node {} points to invalid child {}",
                        node, child
                    ));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature >= NUM_FEATURES as i64 {
                return Err(format!(
                    "node {} splits on feature {} (only {} features)",
                    node, feature, NUM_FEATURES
                ));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }

        Ok(())
    }

    /// Walk from the root to the leaf that `row` lands in
    fn leaf_for(&self, row: &FeatureVector) -> usize {
        let mut node = 0;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if row.get(feature) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Class probabilities at the leaf for `row` (leaf weights normalised to sum to 1)
    pub fn predict_proba(&self, row: &FeatureVector) -> Vec<f64> {
        let weights = &self.value[self.leaf_for(row)];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            vec![0.0; weights.len()]
        }
    }
}

/// Index of the largest value; ties go to the lowest index
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Single decision tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub classes: Vec<String>,
    pub tree: Tree,
}

impl DecisionTree {
    pub fn validate(&self) -> Result<(), String> {
        self.tree.validate(self.classes.len())
    }

    pub fn predict_index(&self, row: &FeatureVector) -> usize {
        argmax(&self.tree.predict_proba(row))
    }
}

/// Forest of trees combined by averaging their class probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<String>,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len())
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn predict_proba(&self, row: &FeatureVector) -> Vec<f64> {
        let mut mean = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in mean.iter_mut().zip(tree.predict_proba(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        mean.iter_mut().for_each(|p| *p /= n);
        mean
    }

    pub fn predict_index(&self, row: &FeatureVector) -> usize {
        argmax(&self.predict_proba(row))
    }
}
