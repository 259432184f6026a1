use super::criterion::Criterion;
use crate::error::TreeError;
use serde::{Deserialize, Serialize};

/// Options controlling how a tree is grown.
///
/// Every setter validates its argument, so a `TreeParams` only ever holds a
/// usable configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    criterion: Criterion,
    min_samples_split: u16,
    max_depth: Option<u16>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            criterion: Criterion::Gini,
            min_samples_split: 2,
            max_depth: None,
        }
    }

    /// Creates params from the usual `{criterion, max_depth, min_samples_split}` triple.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Configuration`] if the criterion name is unrecognized
    /// or if any option is out of range.
    pub fn with_options(
        criterion: &str,
        max_depth: Option<u16>,
        min_samples_split: u16,
    ) -> Result<Self, TreeError> {
        let mut params = Self::new();
        params.set_criterion(criterion)?;
        params.set_max_depth(max_depth)?;
        params.set_min_samples_split(min_samples_split)?;
        Ok(params)
    }

    pub fn set_criterion(&mut self, criterion: &str) -> Result<(), TreeError> {
        self.criterion = criterion.parse()?;
        Ok(())
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        if min_samples_split < 2 {
            return Err(TreeError::configuration(
                "The minimum number of samples to split must be greater than 1.",
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::configuration(
                "The maximum depth must be greater than 0.",
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    /// Re-checks the ranges enforced by the setters. Params restored through
    /// serde never went through them.
    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        let mut checked = Self::new();
        checked.set_min_samples_split(self.min_samples_split)?;
        checked.set_max_depth(self.max_depth)
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn min_samples_split(&self) -> u16 {
        self.min_samples_split
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }
}
