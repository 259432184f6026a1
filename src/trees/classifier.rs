//! Decision Tree Classifier
use super::{
    builder::TreeBuilder,
    criterion::{Criterion, Label},
    node::TreeNode,
    params::TreeParams,
};
use crate::{
    data::dataset::{Dataset, Number},
    error::TreeError,
};
use nalgebra::{DMatrix, DVector};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Decision tree over integer class labels, split by Gini index or entropy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionTreeClassifier<XT, YT> {
    root: Option<TreeNode<XT, YT>>,
    n_features: usize,
    tree_params: TreeParams,
}

impl<XT: Number, YT: Label> Default for DecisionTreeClassifier<XT, YT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: Number, YT: Label> DecisionTreeClassifier<XT, YT> {
    /// Creates a new classifier using the Gini index, no depth limit and a
    /// minimum of two samples per split.
    pub fn new() -> Self {
        Self {
            root: None,
            n_features: 0,
            tree_params: TreeParams::new(),
        }
    }

    /// Creates a new classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `criterion` - `"gini"` (default) or `"entropy"`.
    /// * `min_samples_split` - The minimum number of samples required to split an internal node.
    /// * `max_depth` - The maximum depth of the tree.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the criterion is not a classification
    /// criterion, if the minimum number of samples to split is less than 2 or
    /// if the maximum depth is less than 1.
    pub fn with_params(
        criterion: Option<&str>,
        min_samples_split: Option<u16>,
        max_depth: Option<u16>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        tree.set_criterion(criterion.unwrap_or("gini"))?;
        tree.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree.set_max_depth(max_depth)?;
        Ok(tree)
    }

    pub fn set_criterion(&mut self, criterion: &str) -> Result<(), TreeError> {
        let parsed: Criterion = criterion.parse()?;
        if !parsed.is_classification() {
            return Err(TreeError::configuration(
                "The criterion must be either 'gini' or 'entropy'.",
            ));
        }
        self.tree_params = self.tree_params.clone().with_criterion(parsed);
        Ok(())
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn criterion(&self) -> Criterion {
        self.tree_params.criterion()
    }

    pub fn min_samples_split(&self) -> u16 {
        self.tree_params.min_samples_split()
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.tree_params.max_depth()
    }

    pub fn root(&self) -> Option<&TreeNode<XT, YT>> {
        self.root.as_ref()
    }

    /// Builds the decision tree from a dataset, replacing any previous tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDataset`] for an empty dataset and
    /// [`TreeError::Configuration`] if `YT` is not a class label type.
    pub fn fit(&mut self, dataset: &Dataset<XT, YT>) -> Result<String, TreeError> {
        let root = TreeBuilder::new(self.tree_params.clone()).build(dataset)?;
        self.n_features = dataset.ncols();
        self.root = Some(root);
        Ok("Finished building the tree.".into())
    }

    /// Predicts the class of every row of `features`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] if the tree wasn't built yet and
    /// [`TreeError::DimensionMismatch`] if `features` has a different number of
    /// columns than the training data.
    pub fn predict(&self, features: &DMatrix<XT>) -> Result<DVector<YT>, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        if features.ncols() != self.n_features {
            return Err(TreeError::DimensionMismatch {
                expected: self.n_features,
                got: features.ncols(),
            });
        }
        let predictions: Vec<_> = features
            .row_iter()
            .map(|row| root.predict(&row))
            .collect();

        Ok(DVector::from_vec(predictions))
    }
}

impl<XT, YT> DecisionTreeClassifier<XT, YT>
where
    XT: Number + Serialize + DeserializeOwned,
    YT: Label + Serialize + DeserializeOwned,
{
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a classifier saved with [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Serialization`] for malformed JSON or a tree that
    /// splits on a feature index outside the recorded number of features.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let classifier: Self = serde_json::from_str(json)?;
        if let Some(root) = &classifier.root {
            root.check_feature_indices(classifier.n_features)?;
        }
        Ok(classifier)
    }
}
