use super::split::Split;
use crate::{
    data::dataset::{Number, TargetValue},
    error::TreeError,
};
use serde::{de::Error as _, Deserialize, Serialize};
use std::ops::Index;

/// Decision tree node
///
/// A `Leaf` holds the prediction for every example routed to it. An `Internal`
/// node owns both of its children; examples for which `split` holds go to
/// `left`, all others to `right`. `n_samples` is the number of training
/// examples that reached the node, so for every internal node
/// `left.n_samples() + right.n_samples() == n_samples`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode<XT, YT> {
    Leaf {
        value: YT,
        n_samples: usize,
    },
    Internal {
        split: Split<XT>,
        gain: f64,
        n_samples: usize,
        left: Box<TreeNode<XT, YT>>,
        right: Box<TreeNode<XT, YT>>,
    },
}

impl<XT: Number, YT: TargetValue> TreeNode<XT, YT> {
    pub fn leaf(value: YT, n_samples: usize) -> Self {
        Self::Leaf { value, n_samples }
    }

    pub fn internal(split: Split<XT>, gain: f64, left: Self, right: Self) -> Self {
        Self::Internal {
            split,
            gain,
            n_samples: left.n_samples() + right.n_samples(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    pub fn n_samples(&self) -> usize {
        match self {
            Self::Leaf { n_samples, .. } | Self::Internal { n_samples, .. } => *n_samples,
        }
    }

    /// Length of the longest path from this node to a leaf. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    /// Checks that every split reads a feature below `n_features`, so that
    /// `predict` stays in bounds for rows of that width. Used on trees
    /// restored from JSON.
    pub fn check_feature_indices(&self, n_features: usize) -> Result<(), TreeError> {
        match self {
            Self::Leaf { .. } => Ok(()),
            Self::Internal {
                split, left, right, ..
            } => {
                if split.feature_index >= n_features {
                    return Err(TreeError::Serialization(serde_json::Error::custom(format!(
                        "split on feature {} but the tree has {} features",
                        split.feature_index, n_features
                    ))));
                }
                left.check_feature_indices(n_features)?;
                right.check_feature_indices(n_features)
            }
        }
    }

    /// Routes one example down the tree and returns the value of its leaf.
    pub fn predict<R>(&self, features: &R) -> YT
    where
        R: Index<usize, Output = XT> + ?Sized,
    {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { value, .. } => return *value,
                Self::Internal {
                    split, left, right, ..
                } => {
                    node = if split.goes_left(features[split.feature_index]) {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    /// Renders the tree in Graphviz `dot` syntax.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph {\n");
        self.to_dot_info(0, &mut dot);
        dot.push_str("}\n");
        dot
    }

    /// Appends the statements for the subtree rooted at `self`, numbered from
    /// `id` in pre-order, and returns the next free id.
    fn to_dot_info(&self, id: usize, dot: &mut String) -> usize {
        match self {
            Self::Leaf { value, n_samples } => {
                dot.push_str(&format!(
                    "\tnode_{id} [ label = \"{value}\\nsamples = {n_samples}\", shape = box ];\n"
                ));
                id + 1
            }
            Self::Internal {
                split, left, right, ..
            } => {
                dot.push_str(&format!(
                    "\tnode_{id} [ label = \"x[{feat}] <= {thr}\" ];\n",
                    feat = split.feature_index,
                    thr = split.threshold,
                ));

                let left_id = id + 1;
                let right_id = left.to_dot_info(left_id, dot);
                let next_id = right.to_dot_info(right_id, dot);

                dot.push_str(&format!("\tnode_{id} -- node_{left_id} [ label = \"yes\" ];\n"));
                dot.push_str(&format!("\tnode_{id} -- node_{right_id} [ label = \"no\" ];\n"));
                next_id
            }
        }
    }
}
