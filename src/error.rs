//! Error type shared by every fallible operation in the crate.

/// Errors returned while configuring, building or using a decision tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("cannot build a tree from an empty dataset")]
    EmptyDataset,

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("the tree wasn't built yet")]
    NotFitted,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TreeError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
