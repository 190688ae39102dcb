use serde::{Deserialize, Serialize};

use crate::artifact::ModelKind;
use crate::error::ModelError;
use crate::Model;

/// One node of a decision tree, addressed by index into the tree's node
/// list. Branch children must point strictly forward, which rules out
/// cycles without a traversal pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Branch {
        feature: usize,
        threshold: f64,
        /// Taken when `features[feature] <= threshold`.
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    /// Node 0 is the root.
    pub nodes: Vec<TreeNode>,
}

/// Gradient-boosted-style scorer: base score plus the sum of one leaf
/// value per tree, as the logit.
pub struct TreeEnsembleModel {
    base_score: f64,
    trees: Vec<TreeSpec>,
}

impl TreeEnsembleModel {
    pub fn new(
        base_score: f64,
        trees: Vec<TreeSpec>,
        input_width: usize,
    ) -> Result<Self, ModelError> {
        if !base_score.is_finite() {
            return Err(malformed("base_score must be finite".to_string()));
        }
        if trees.is_empty() {
            return Err(malformed("ensemble has no trees".to_string()));
        }
        for (t, tree) in trees.iter().enumerate() {
            let len = tree.nodes.len();
            if len == 0 {
                return Err(malformed(format!("tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Branch {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= input_width {
                            return Err(malformed(format!(
                                "tree {t} node {n} splits on feature {feature}, \
                                 schema has {input_width} columns"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(malformed(format!(
                                "tree {t} node {n} has a non-finite threshold"
                            )));
                        }
                        if *left <= n || *right <= n || *left >= len || *right >= len {
                            return Err(malformed(format!(
                                "tree {t} node {n} children must point forward within the tree"
                            )));
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(malformed(format!(
                                "tree {t} node {n} has a non-finite leaf value"
                            )));
                        }
                    }
                }
            }
        }
        Ok(Self { base_score, trees })
    }
}

fn malformed(detail: String) -> ModelError {
    ModelError::MalformedParams {
        kind: ModelKind::TreeEnsemble,
        detail,
    }
}

fn walk(tree: &TreeSpec, features: &[f64]) -> f64 {
    let mut index = 0;
    loop {
        match &tree.nodes[index] {
            TreeNode::Leaf { value } => return *value,
            TreeNode::Branch {
                feature,
                threshold,
                left,
                right,
            } => {
                index = if features[*feature] <= *threshold {
                    *left
                } else {
                    *right
                };
            }
        }
    }
}

impl Model for TreeEnsembleModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TreeEnsemble
    }

    fn raw_score(&self, features: &[f64]) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| walk(tree, features))
                .sum::<f64>()
    }
}
