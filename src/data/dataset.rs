use crate::error::TreeError;
use nalgebra::{DMatrix, DVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::PartialOrd;
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

pub trait TargetValue: DataValue {}
impl<T> TargetValue for T where T: DataValue {}

/// Labeled examples: one row of `x` per example, with its label at the same index of `y`.
///
/// A dataset never changes after construction. Subsets are produced by
/// [`Dataset::split_on_threshold`] and [`Dataset::train_test_split`], which copy
/// the selected rows into new datasets.
#[derive(Clone)]
pub struct Dataset<XT: Number, YT: TargetValue> {
    x: DMatrix<XT>,
    y: DVector<YT>,
}

impl<XT: Number, YT: TargetValue> Debug for Dataset<XT, YT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl<XT: Number, YT: TargetValue> Dataset<XT, YT> {
    /// Creates a dataset from a feature matrix and a label vector.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DimensionMismatch`] if the number of rows in `x`
    /// differs from the number of labels in `y`.
    pub fn new(x: DMatrix<XT>, y: DVector<YT>) -> Result<Self, TreeError> {
        if x.nrows() != y.len() {
            return Err(TreeError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &DMatrix<XT> {
        &self.x
    }

    pub fn y(&self) -> &DVector<YT> {
        &self.y
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Copies the rows at `indices`, in that order, into a new dataset.
    fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(indices),
            y: self.y.select_rows(indices),
        }
    }

    /// Partitions the examples by `row[feature_index] <= threshold`.
    ///
    /// The first dataset holds every example for which the predicate is true,
    /// the second holds the rest. Both keep the original relative order, and
    /// together they contain every example exactly once.
    pub fn split_on_threshold(&self, feature_index: usize, threshold: XT) -> (Self, Self) {
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = (0..self.nrows())
            .partition(|&index| self.x[(index, feature_index)] <= threshold);

        (self.select(&left_indices), self.select(&right_indices))
    }

    /// Shuffles the examples and splits them into a training and a test dataset.
    ///
    /// # Arguments
    ///
    /// * `train_size` - Fraction of the examples that go to the training dataset.
    /// * `seed` - Seed for the shuffle. A random seed is used if `None`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `train_size` is outside `0.0..=1.0`.
    pub fn train_test_split(
        &self,
        train_size: f64,
        seed: Option<u64>,
    ) -> Result<(Self, Self), TreeError> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(TreeError::configuration(
                "Train size should be between 0.0 and 1.0",
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        Ok((self.select(train_indices), self.select(test_indices)))
    }
}
