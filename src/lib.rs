//! # Rusty-tree
//!
//! `rusty-tree` grows binary decision trees by greedy impurity-reduction
//! splitting. Classification trees split by Gini index or entropy and predict
//! the majority class; regression trees split by variance and predict the mean.
//!
//! ## Getting Started
//!
//! To use `rusty-tree`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-tree = "*"
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use nalgebra::{DMatrix, DVector};
//! use rusty_tree::data::dataset::Dataset;
//! use rusty_tree::trees::{build, TreeParams};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 2.0, 0.0, 1.0, 1.0, 2.0, 1.0]);
//! let y = DVector::from_vec(vec![0_u8, 0, 1, 1]);
//! let dataset = Dataset::new(x, y).unwrap();
//!
//! let params = TreeParams::with_options("entropy", Some(3), 2).unwrap();
//! let root = build(&dataset, &params).unwrap();
//!
//! assert_eq!(root.depth(), 1);
//! assert_eq!(root.predict(&[1.5, 0.9][..]), 1);
//! ```
//!
//! The library reports progress through the [`log`] facade and never installs
//! a logger itself.

/// Datasets and the numeric traits they are generic over
pub mod data;
/// Error type
pub mod error;
/// Decision trees
pub mod trees;

pub use error::TreeError;
