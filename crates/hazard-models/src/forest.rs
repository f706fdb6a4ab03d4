//! Random-forest evaluator for persisted model artifacts.
//!
//! Artifacts carry the trained forests as explicit tree structures so the
//! adapters only ever walk them; no training happens here.

use serde::{Deserialize, Serialize};

/// Number of Saffir-Simpson classes emitted by the cyclone classifier (0-5).
pub const CYCLONE_CLASSES: usize = 6;

/// One node of a binary decision tree.
///
/// A `Leaf` carries either a single regression value or a per-class vote
/// distribution, depending on the enclosing model kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl Node {
    /// Walk the tree for one feature vector and return the reached leaf value.
    fn eval<'a>(&'a self, features: &[f64]) -> &'a [f64] {
        match self {
            Node::Leaf { value } => value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if features[*feature] <= *threshold {
                    left.eval(features)
                } else {
                    right.eval(features)
                }
            }
        }
    }

    /// Largest feature index referenced anywhere in the tree, if any split exists.
    fn max_feature(&self) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Split {
                feature,
                left,
                right,
                ..
            } => {
                let below = left.max_feature().max(right.max_feature());
                Some(below.map_or(*feature, |b| b.max(*feature)))
            }
        }
    }

    fn leaf_widths_are(&self, width: usize) -> bool {
        match self {
            Node::Leaf { value } => value.len() == width,
            Node::Split { left, right, .. } => {
                left.leaf_widths_are(width) && right.leaf_widths_are(width)
            }
        }
    }
}

/// An ensemble of decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    pub trees: Vec<Node>,
}

/// A trained model as persisted inside an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    /// Forest regressor; prediction is the mean of tree outputs.
    Regressor(Forest),
    /// Forest classifier over the Saffir-Simpson categories; prediction is
    /// the arg-max of the averaged per-class vote distributions.
    Classifier(Forest),
}

impl Model {
    /// Mean tree output for a regressor.
    ///
    /// Callers validate shape and kind up front (see `validate`), so a
    /// classifier here yields the mean of class-0 votes; adapters never
    /// take that path.
    pub fn predict_value(&self, features: &[f64]) -> f64 {
        let forest = self.forest();
        if forest.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = forest
            .trees
            .iter()
            .map(|t| t.eval(features).first().copied().unwrap_or(0.0))
            .sum();
        sum / forest.trees.len() as f64
    }

    /// Averaged, normalized class probabilities for a classifier.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; CYCLONE_CLASSES] {
        let forest = self.forest();
        let mut probs = [0.0; CYCLONE_CLASSES];
        for tree in &forest.trees {
            let votes = tree.eval(features);
            let total: f64 = votes.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for (p, v) in probs.iter_mut().zip(votes) {
                *p += v / total;
            }
        }
        let total: f64 = probs.iter().sum();
        if total > 0.0 {
            for p in &mut probs {
                *p /= total;
            }
        }
        probs
    }

    /// Check structural consistency against a declared feature count.
    ///
    /// Regressor leaves must hold exactly one value, classifier leaves one
    /// vote per class, and no split may reference a feature outside the
    /// artifact's schema.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let (forest, leaf_width) = match self {
            Model::Regressor(f) => (f, 1),
            Model::Classifier(f) => (f, CYCLONE_CLASSES),
        };
        if forest.trees.is_empty() {
            return Err("model has no trees".to_string());
        }
        for (i, tree) in forest.trees.iter().enumerate() {
            if !tree.leaf_widths_are(leaf_width) {
                return Err(format!("tree {i} has leaves of width != {leaf_width}"));
            }
            if let Some(max) = tree.max_feature() {
                if max >= n_features {
                    return Err(format!(
                        "tree {i} references feature {max} but schema has {n_features}"
                    ));
                }
            }
        }
        Ok(())
    }

    fn forest(&self) -> &Forest {
        match self {
            Model::Regressor(f) | Model::Classifier(f) => f,
        }
    }
}

/// A single-leaf regressor that always predicts `value`. Handy for tests
/// and for wiring adapters without a trained artifact.
pub fn constant_regressor(value: f64) -> Model {
    Model::Regressor(Forest {
        trees: vec![Node::Leaf { value: vec![value] }],
    })
}

/// A single-leaf classifier that always predicts `category` with full
/// confidence.
pub fn constant_classifier(category: usize) -> Model {
    let mut votes = vec![0.0; CYCLONE_CLASSES];
    votes[category] = 1.0;
    Model::Classifier(Forest {
        trees: vec![Node::Leaf { value: votes }],
    })
}
