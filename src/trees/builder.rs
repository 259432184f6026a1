//! Recursive tree construction.
use super::{
    criterion::Label,
    node::TreeNode,
    params::TreeParams,
    split::best_split,
};
use crate::{
    data::dataset::{Dataset, Number},
    error::TreeError,
};
use log::{debug, trace};

/// Grows decision trees by greedy impurity-reduction splitting.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    params: TreeParams,
}

impl TreeBuilder {
    pub fn new(params: TreeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Builds a tree from `dataset` and returns its root.
    ///
    /// # Errors
    ///
    /// * [`TreeError::EmptyDataset`] if `dataset` has no examples.
    /// * [`TreeError::Configuration`] if the params are out of range or the
    ///   criterion does not apply to the label type `YT`.
    ///
    /// All checks happen before any node is created, so no partial tree is
    /// ever produced.
    pub fn build<XT: Number, YT: Label>(
        &self,
        dataset: &Dataset<XT, YT>,
    ) -> Result<TreeNode<XT, YT>, TreeError> {
        self.params.validate()?;
        let criterion = self.params.criterion();
        if !YT::supports(criterion) {
            return Err(TreeError::configuration(format!(
                "criterion '{criterion}' cannot be used with {} labels",
                std::any::type_name::<YT>()
            )));
        }
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        debug!(
            "building tree on {} examples with {} features, criterion {}, max depth {:?}",
            dataset.nrows(),
            dataset.ncols(),
            criterion,
            self.params.max_depth()
        );
        let root = self.grow(dataset, 0);
        debug!(
            "finished building tree: depth {}, {} leaves",
            root.depth(),
            root.n_leaves()
        );
        Ok(root)
    }

    fn grow<XT: Number, YT: Label>(&self, dataset: &Dataset<XT, YT>, depth: u16) -> TreeNode<XT, YT> {
        let y = dataset.y().as_slice();
        let num_samples = y.len();

        if self.should_stop(y, depth) {
            return self.leaf(y, depth);
        }

        let criterion = self.params.criterion();
        let impurity = YT::impurity(criterion, y);
        let candidate = match best_split(dataset, criterion, impurity) {
            Some(candidate) if candidate.gain > 0.0 => candidate,
            _ => return self.leaf(y, depth),
        };

        let split = candidate.split;
        debug!(
            "depth {}: splitting {} examples on x[{}] <= {} (gain {:.6})",
            depth, num_samples, split.feature_index, split.threshold, candidate.gain
        );
        let (left_child, right_child) = dataset.split_on_threshold(split.feature_index, split.threshold);
        if left_child.is_empty() || right_child.is_empty() {
            debug!("depth {}: split on x[{}] leaves one side empty", depth, split.feature_index);
            return self.leaf(y, depth);
        }
        let (left_node, right_node) = rayon::join(
            || self.grow(&left_child, depth + 1),
            || self.grow(&right_child, depth + 1),
        );
        TreeNode::internal(split, candidate.gain, left_node, right_node)
    }

    fn should_stop<YT: Label>(&self, y: &[YT], depth: u16) -> bool {
        let depth_reached = self.params.max_depth().is_some_and(|max_depth| depth >= max_depth);
        let too_small = y.len() < usize::from(self.params.min_samples_split());
        let is_pure = y.windows(2).all(|pair| pair[0] == pair[1]);
        depth_reached || too_small || is_pure
    }

    fn leaf<XT: Number, YT: Label>(&self, y: &[YT], depth: u16) -> TreeNode<XT, YT> {
        let value = YT::leaf_value(y);
        trace!("depth {}: leaf with {} examples predicting {}", depth, y.len(), value);
        TreeNode::leaf(value, y.len())
    }
}

/// Builds a tree from `dataset` using `params`. See [`TreeBuilder::build`].
pub fn build<XT: Number, YT: Label>(
    dataset: &Dataset<XT, YT>,
    params: &TreeParams,
) -> Result<TreeNode<XT, YT>, TreeError> {
    TreeBuilder::new(params.clone()).build(dataset)
}
