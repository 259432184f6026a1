pub mod builder;
pub mod classifier;
pub mod criterion;
pub mod node;
pub mod params;
pub mod regressor;
pub mod split;

pub use builder::{build, TreeBuilder};
pub use criterion::{Criterion, Label};
pub use node::TreeNode;
pub use params::TreeParams;
pub use split::Split;
