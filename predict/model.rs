use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

// --- Public Data Structures ---
// These structs define the human-readable format of a trained classifier when
// serialized to a TOML file.

/// An opaque pre-trained binary classifier.
///
/// Implementations are read-only after construction and shared across every
/// request, hence the `Send + Sync` bound.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was trained on.
    fn n_features_in(&self) -> usize;

    /// Returns the raw class label for one feature vector.
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError>;
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression: class 1 when `sigmoid(intercept + coefficients · x)`
/// reaches the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    /// Probability of class 1 for one feature vector.
    pub fn probability(&self, x: ArrayView1<f64>) -> f64 {
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        let eta = self.intercept + coefficients.dot(&x);
        // Clamp eta so exp() cannot overflow.
        1.0 / (1.0 + f64::exp(-eta.clamp(-700.0, 700.0)))
    }
}

/// A node of a binary decision tree, stored in a flat array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: i64 },
}

/// A single tree. Node 0 is the root and children always follow their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// A majority-vote ensemble of decision trees. Ties go to class 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierSpec {
    Logistic(LogisticModel),
    Forest(ForestModel),
}

/// The top-level, self-contained classifier artifact.
/// This is the structure that gets saved to and loaded from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub n_features_in: usize,
    /// Training column names, kept for humans reading the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub classifier: ClassifierSpec,
}

/// Custom error type for model loading, saving, and prediction.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read or write model file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML model file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to serialize model to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("Input has {found} features, but the model was trained on {expected}.")]
    MismatchedFeatureCount { found: usize, expected: usize },
    #[error("Input feature {index} is not a finite number.")]
    NonFiniteInput { index: usize },
    #[error("Model returned label {0}, expected 0 or 1.")]
    UnexpectedLabel(i64),
}

impl ModelArtifact {
    /// Saves the artifact in a human-readable TOML format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Loads an artifact from a TOML file and checks that it is well formed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let toml_string = fs::read_to_string(path)?;
        Self::from_toml(&toml_string)
    }

    pub fn from_toml(text: &str) -> Result<Self, ModelError> {
        let artifact: Self = toml::from_str(text)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks the structural invariants prediction relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_features_in == 0 {
            return Err(invalid("n_features_in must be positive"));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features_in {
                return Err(invalid(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features_in
                )));
            }
        }

        match &self.classifier {
            ClassifierSpec::Logistic(model) => {
                if model.coefficients.len() != self.n_features_in {
                    return Err(invalid(format!(
                        "{} coefficients for {} features",
                        model.coefficients.len(),
                        self.n_features_in
                    )));
                }
                let all_finite = model.intercept.is_finite()
                    && model.threshold.is_finite()
                    && model.coefficients.iter().all(|c| c.is_finite());
                if !all_finite {
                    return Err(invalid("logistic parameters must be finite"));
                }
            }
            ClassifierSpec::Forest(forest) => {
                if forest.trees.is_empty() {
                    return Err(invalid("forest has no trees"));
                }
                for (t, tree) in forest.trees.iter().enumerate() {
                    internal::validate_tree(tree, self.n_features_in)
                        .map_err(|reason| invalid(format!("tree {t}: {reason}")))?;
                }
            }
        }
        Ok(())
    }
}

impl Classifier for ModelArtifact {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        // --- 1. Validate Inputs ---
        if features.len() != self.n_features_in {
            return Err(ModelError::MismatchedFeatureCount {
                found: features.len(),
                expected: self.n_features_in,
            });
        }
        if let Some(index) = features.iter().position(|x| !x.is_finite()) {
            return Err(ModelError::NonFiniteInput { index });
        }

        // --- 2. Evaluate ---
        let x = ArrayView1::from(features);
        match &self.classifier {
            ClassifierSpec::Logistic(model) => internal::logistic_label(model, x),
            ClassifierSpec::Forest(forest) => internal::forest_label(forest, x),
        }
    }
}

fn invalid(reason: impl Into<String>) -> ModelError {
    ModelError::InvalidArtifact(reason.into())
}

/// Internal module for prediction-specific implementation details.
mod internal {
    use super::*;

    // Evaluation does not assume `validate` has run.
    pub(super) fn logistic_label(
        model: &LogisticModel,
        x: ArrayView1<f64>,
    ) -> Result<i64, ModelError> {
        if model.coefficients.len() != x.len() {
            return Err(invalid(format!(
                "{} coefficients for {} features",
                model.coefficients.len(),
                x.len()
            )));
        }
        Ok(i64::from(model.probability(x) >= model.threshold))
    }

    pub(super) fn forest_label(forest: &ForestModel, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        let mut positive = 0;
        for tree in &forest.trees {
            if tree_label(tree, x)? == 1 {
                positive += 1;
            }
        }
        Ok(i64::from(2 * positive > forest.trees.len()))
    }

    /// Walks from the root. A child at or before its parent would never reach
    /// a leaf, so it is reported instead of followed.
    fn tree_label(tree: &DecisionTree, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        let mut index = 0;
        loop {
            match tree.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x.get(*feature).ok_or_else(|| {
                        invalid(format!(
                            "node {index} splits on feature {feature} of {}",
                            x.len()
                        ))
                    })?;
                    let next = if *value <= *threshold { *left } else { *right };
                    if next <= index {
                        return Err(invalid(format!("node {index} has invalid child {next}")));
                    }
                    index = next;
                }
                None => return Err(invalid(format!("tree has no node {index}"))),
            }
        }
    }

    /// Children must point forward, which makes every walk from the root finite.
    pub(super) fn validate_tree(tree: &DecisionTree, n_features: usize) -> Result<(), String> {
        if tree.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in tree.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } => {
                    if !matches!(value, 0 | 1) {
                        return Err(format!("leaf {index} has class {value}, expected 0 or 1"));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {index} splits on feature {feature} of {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {index} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= tree.nodes.len() {
                            return Err(format!("node {index} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
