//! Decision Tree Regressor
use super::{
    builder::TreeBuilder,
    criterion::{Criterion, Label},
    node::TreeNode,
    params::TreeParams,
};
use crate::{
    data::dataset::{Dataset, Number, RealNumber},
    error::TreeError,
};
use nalgebra::{DMatrix, DVector};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Decision Tree Regressor
///
/// Splits by variance reduction; every leaf predicts the mean target of the
/// training examples that reached it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionTreeRegressor<XT, T> {
    root: Option<TreeNode<XT, T>>,
    n_features: usize,
    tree_params: TreeParams,
}

impl<XT: Number, T: RealNumber + Label> Default for DecisionTreeRegressor<XT, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: Number, T: RealNumber + Label> DecisionTreeRegressor<XT, T> {
    /// Creates a new instance of the decision tree regressor with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            n_features: 0,
            tree_params: TreeParams::new().with_criterion(Criterion::Variance),
        }
    }

    /// Creates a new instance of the decision tree regressor with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `min_samples_split` - The minimum number of samples required to split an internal node.
    /// * `max_depth` - The maximum depth of the tree.
    ///
    /// # Errors
    ///
    /// This method will return an error if the minimum number of samples to split is less than 2 or if the maximum depth is less than 1.
    pub fn with_params(
        min_samples_split: Option<u16>,
        max_depth: Option<u16>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new();

        tree.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree.set_max_depth(max_depth)?;
        Ok(tree)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.tree_params.max_depth()
    }

    pub fn min_samples_split(&self) -> u16 {
        self.tree_params.min_samples_split()
    }

    pub fn root(&self) -> Option<&TreeNode<XT, T>> {
        self.root.as_ref()
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDataset`] if the dataset has no examples.
    pub fn fit(&mut self, dataset: &Dataset<XT, T>) -> Result<String, TreeError> {
        let root = TreeBuilder::new(self.tree_params.clone()).build(dataset)?;
        self.n_features = dataset.ncols();
        self.root = Some(root);
        Ok("Finished building the tree.".into())
    }

    /// Predicts the target value of every row of `features`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] if the tree wasn't built yet and
    /// [`TreeError::DimensionMismatch`] if `features` has a different number of
    /// columns than the training data.
    pub fn predict(&self, features: &DMatrix<XT>) -> Result<DVector<T>, TreeError> {
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

    /// Mean squared error of the predictions for `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDataset`] if `dataset` has no examples, and
    /// the errors of [`Self::predict`].
    pub fn mse(&self, dataset: &Dataset<XT, T>) -> Result<f64, TreeError> {
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let predictions = self.predict(dataset.x())?;
        let sum_sq = predictions
            .iter()
            .zip(dataset.y().iter())
            .filter_map(|(&y_p, &y_t)| (y_p - y_t).to_f64())
            .map(|error| error * error)
            .sum::<f64>();
        Ok(sum_sq / dataset.nrows() as f64)
    }
}

impl<XT, T> DecisionTreeRegressor<XT, T>
where
    XT: Number + Serialize + DeserializeOwned,
    T: RealNumber + Label + Serialize + DeserializeOwned,
{
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a regressor saved with [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Serialization`] for malformed JSON or a tree that
    /// splits on a feature index outside the recorded number of features.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let regressor: Self = serde_json::from_str(json)?;
        if let Some(root) = &regressor.root {
            root.check_feature_indices(regressor.n_features)?;
        }
        Ok(regressor)
    }
}
