//! Gradient-boosted decision trees for multi-class classification.
//!
//! Each boosting stage holds one regression tree per output. Raw scores are
//! `init + learning_rate * Σ leaf`, turned into probabilities by softmax
//! (more than two classes) or a sigmoid on a single output (two classes).
//!
//! Trees are stored flat: node 0 is the root, a split goes left when
//! `row[feature] <= threshold`, and children always sit after their parent.

use croptype_core::{MODEL_FEATURES, NUM_FEATURES};
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, Prediction};
use crate::error::FormatError;

/// Artifact format version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
            } = *node
            {
                if feature >= NUM_FEATURES {
                    return Err(format!("node {idx} splits on feature {feature}"));
                }
                if threshold.is_nan() {
                    return Err(format!("node {idx} has a NaN threshold"));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {idx} has invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Largest leaf magnitude, an upper bound on any single contribution.
    fn max_leaf_magnitude(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Leaf { value } => Some(value.abs()),
                Node::Split { .. } => None,
            })
            .fold(0.0, f64::max)
    }

    /// Leaf value reached by `row`. Requires a validated tree.
    fn leaf_value(&self, row: &[f64; NUM_FEATURES]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

/// On-disk layout of the classifier artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtFile {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub classes: Vec<usize>,
    pub learning_rate: f64,
    pub init_scores: Vec<f64>,
    pub stages: Vec<Vec<Tree>>,
}

/// A validated gradient-boosted tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GbdtFile", into = "GbdtFile")]
pub struct GradientBoostedTrees {
    classes: Vec<usize>,
    learning_rate: f64,
    init_scores: Vec<f64>,
    stages: Vec<Vec<Tree>>,
}

impl GradientBoostedTrees {
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Score outputs per row: one for binary models, one per class otherwise.
    pub fn num_outputs(&self) -> usize {
        outputs_for(self.classes.len())
    }

    /// Raw additive scores before the probability link.
    pub fn raw_scores(&self, row: &[f64; NUM_FEATURES]) -> Vec<f64> {
        let mut raw = self.init_scores.clone();
        for stage in &self.stages {
            for (score, tree) in raw.iter_mut().zip(stage) {
                *score += self.learning_rate * tree.leaf_value(row);
            }
        }
        raw
    }
}

fn outputs_for(num_classes: usize) -> usize {
    if num_classes == 2 { 1 } else { num_classes }
}

impl TryFrom<GbdtFile> for GradientBoostedTrees {
    type Error = FormatError;

    fn try_from(file: GbdtFile) -> Result<Self, Self::Error> {
        if file.format_version != FORMAT_VERSION {
            return Err(FormatError(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                file.format_version
            )));
        }
        if file.feature_names.iter().map(String::as_str).ne(MODEL_FEATURES) {
            return Err(FormatError(format!(
                "model trained on {:?}, expected {MODEL_FEATURES:?}",
                file.feature_names
            )));
        }
        if file.classes.is_empty() {
            return Err(FormatError("model has no classes".into()));
        }
        let mut sorted = file.classes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != file.classes.len() {
            return Err(FormatError("duplicate class codes".into()));
        }
        if !file.learning_rate.is_finite() {
            return Err(FormatError("learning rate must be finite".into()));
        }

        let outputs = outputs_for(file.classes.len());
        if file.init_scores.len() != outputs {
            return Err(FormatError(format!(
                "{} init scores for {outputs} outputs",
                file.init_scores.len()
            )));
        }
        for (s, stage) in file.stages.iter().enumerate() {
            if stage.len() != outputs {
                return Err(FormatError(format!(
                    "stage {s} has {} trees for {outputs} outputs",
                    stage.len()
                )));
            }
            for (k, tree) in stage.iter().enumerate() {
                tree.validate()
                    .map_err(|e| FormatError(format!("stage {s} tree {k}: {e}")))?;
            }
        }

        // Every reachable raw score must stay finite for the probability link.
        for (k, init) in file.init_scores.iter().enumerate() {
            let leaves: f64 = file
                .stages
                .iter()
                .map(|stage| stage[k].max_leaf_magnitude())
                .sum();
            let bound = init.abs() + file.learning_rate.abs() * leaves;
            if !bound.is_finite() {
                return Err(FormatError(format!("raw scores for output {k} can overflow")));
            }
        }

        Ok(Self {
            classes: file.classes,
            learning_rate: file.learning_rate,
            init_scores: file.init_scores,
            stages: file.stages,
        })
    }
}

impl From<GradientBoostedTrees> for GbdtFile {
    fn from(model: GradientBoostedTrees) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            feature_names: MODEL_FEATURES.iter().map(|s| s.to_string()).collect(),
            classes: model.classes,
            learning_rate: model.learning_rate,
            init_scores: model.init_scores,
            stages: model.stages,
        }
    }
}

impl Classifier for GradientBoostedTrees {
    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn predict_with_proba(&self, row: &[f64; NUM_FEATURES]) -> Prediction {
        let raw = self.raw_scores(row);
        let probabilities = if self.classes.len() == 2 {
            let p = sigmoid(raw[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&raw)
        };
        let class = self.classes[argmax(&probabilities)];
        Prediction {
            class,
            probabilities,
        }
    }

    fn name(&self) -> &str {
        "gradient_boosting"
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
