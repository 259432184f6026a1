//! Candidate split enumeration and best-split selection.
use super::criterion::{gain_from_parts, Criterion, Label};
use crate::data::dataset::{Dataset, Number};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Routing rule of an internal node: examples with
/// `features[feature_index] <= threshold` go left, all others go right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Split<XT> {
    pub feature_index: usize,
    pub threshold: XT,
}

impl<XT: Number> Split<XT> {
    pub fn new(feature_index: usize, threshold: XT) -> Self {
        Self {
            feature_index,
            threshold,
        }
    }

    pub fn goes_left(&self, value: XT) -> bool {
        value <= self.threshold
    }
}

/// A split together with the impurity reduction it achieves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate<XT> {
    pub split: Split<XT>,
    pub gain: f64,
}

/// Threshold halfway between two adjacent distinct values `low < high`.
///
/// The halves are taken before adding so the result cannot overflow, even for
/// integer features spanning the whole range of their type. Integer midpoints
/// truncate. If rounding would push the midpoint outside `low..high`, `low` is
/// used instead so that the partition is unchanged.
pub fn midpoint<XT: Number>(low: XT, high: XT) -> XT {
    let two = XT::one() + XT::one();
    let mut mid = low / two + high / two;
    if XT::one() / two == XT::zero() {
        mid += (low % two + high % two) / two;
    }
    if low <= mid && mid < high {
        mid
    } else {
        low
    }
}

/// Best split on one feature, scanning thresholds in ascending order.
///
/// Only midpoints between adjacent distinct values are considered, so both
/// sides of every candidate are non-empty. Returns `None` if the feature takes
/// a single value.
pub fn best_split_for_feature<XT: Number, YT: Label>(
    dataset: &Dataset<XT, YT>,
    feature_index: usize,
    criterion: Criterion,
    parent_impurity: f64,
) -> Option<SplitCandidate<XT>> {
    let mut rows: Vec<(XT, YT)> = dataset
        .x()
        .column(feature_index)
        .iter()
        .copied()
        .zip(dataset.y().iter().copied())
        .collect();
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let (values, labels): (Vec<XT>, Vec<YT>) = rows.into_iter().unzip();

    let mut best_split: Option<SplitCandidate<XT>> = None;
    for boundary in 1..values.len() {
        let (low, high) = (values[boundary - 1], values[boundary]);
        if !(low < high) {
            continue;
        }
        let (left, right) = labels.split_at(boundary);
        let gain = gain_from_parts(criterion, parent_impurity, left, right);

        if best_split.map_or(true, |best| gain > best.gain) {
            best_split = Some(SplitCandidate {
                split: Split::new(feature_index, midpoint(low, high)),
                gain,
            });
        }
    }
    best_split
}

/// Best split over all features.
///
/// Features are searched in parallel, then reduced in feature order keeping
/// only strictly larger gains, so ties resolve to the lowest feature index and
/// then the lowest threshold.
pub fn best_split<XT: Number, YT: Label>(
    dataset: &Dataset<XT, YT>,
    criterion: Criterion,
    parent_impurity: f64,
) -> Option<SplitCandidate<XT>> {
    let splits = (0..dataset.ncols())
        .into_par_iter()
        .map(|feature_index| {
            best_split_for_feature(dataset, feature_index, criterion, parent_impurity)
        })
        .collect::<Vec<_>>();

    splits
        .into_iter()
        .flatten()
        .fold(None, |best: Option<SplitCandidate<XT>>, candidate| match best {
            Some(best) if candidate.gain <= best.gain => Some(best),
            _ => Some(candidate),
        })
}
