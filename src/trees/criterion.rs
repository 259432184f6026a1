//! Impurity criteria and the gain of a split.
use crate::{
    data::dataset::{Number, TargetValue},
    error::TreeError,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Measure of label heterogeneity used to score splits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// `1 - Σ p_k²` over the class proportions.
    #[default]
    Gini,
    /// `-Σ p_k log2 p_k` over the class proportions.
    Entropy,
    /// Mean squared deviation from the mean label.
    Variance,
}

impl Criterion {
    pub fn is_classification(&self) -> bool {
        matches!(self, Criterion::Gini | Criterion::Entropy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Gini => "gini",
            Criterion::Entropy => "entropy",
            Criterion::Variance => "variance",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Criterion {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gini" => Ok(Criterion::Gini),
            "entropy" => Ok(Criterion::Entropy),
            "variance" => Ok(Criterion::Variance),
            other => Err(TreeError::configuration(format!(
                "unrecognized criterion '{other}', expected 'gini', 'entropy' or 'variance'"
            ))),
        }
    }
}

/// Label types a tree can be grown on.
///
/// Integer labels are class identifiers and support [`Criterion::Gini`] and
/// [`Criterion::Entropy`]; their leaves predict the majority class. Floating
/// point labels are regression targets and support [`Criterion::Variance`];
/// their leaves predict the mean.
pub trait Label: TargetValue + Number {
    fn supports(criterion: Criterion) -> bool;

    fn leaf_value(y: &[Self]) -> Self;

    fn impurity(criterion: Criterion, y: &[Self]) -> f64 {
        match criterion {
            Criterion::Gini => gini_index(y),
            Criterion::Entropy => entropy(y),
            Criterion::Variance => variance(y),
        }
    }
}

macro_rules! impl_class_label {
    ($($t:ty),*) => {$(
        impl Label for $t {
            fn supports(criterion: Criterion) -> bool {
                criterion.is_classification()
            }

            fn leaf_value(y: &[Self]) -> Self {
                majority(y).unwrap_or_default()
            }
        }
    )*};
}

macro_rules! impl_real_label {
    ($($t:ty),*) => {$(
        impl Label for $t {
            fn supports(criterion: Criterion) -> bool {
                criterion == Criterion::Variance
            }

            fn leaf_value(y: &[Self]) -> Self {
                y.iter().sum::<$t>() / y.len() as $t
            }
        }
    )*};
}

impl_class_label!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_real_label!(f32, f64);

/// Distinct values of `y` in ascending order, with how often each occurs.
pub(crate) fn class_counts<T: Number>(y: &[T]) -> Vec<(T, usize)> {
    let mut sorted = y.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in sorted {
        if let Some((last, count)) = counts.last_mut() {
            if *last == value {
                *count += 1;
                continue;
            }
        }
        counts.push((value, 1));
    }
    counts
}

/// Most frequent value, the smallest one on ties.
pub(crate) fn majority<T: Number>(y: &[T]) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (value, count) in class_counts(y) {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

pub fn gini_index<T: Number>(y: &[T]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let n = y.len() as f64;
    1.0 - class_counts(y)
        .into_iter()
        .map(|(_, count)| {
            let p_class = count as f64 / n;
            p_class * p_class
        })
        .sum::<f64>()
}

pub fn entropy<T: Number>(y: &[T]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let n = y.len() as f64;
    class_counts(y)
        .into_iter()
        .map(|(_, count)| {
            let p_class = count as f64 / n;
            -p_class * p_class.log2()
        })
        .sum()
}

pub fn variance<T: Number>(y: &[T]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let n = y.len() as f64;
    let values = y.iter().filter_map(|value| value.to_f64());
    let mean = values.clone().sum::<f64>() / n;
    values.map(|value| (value - mean) * (value - mean)).sum::<f64>() / n
}

/// Impurity reduction achieved by splitting `parent` into `left` and `right`.
///
/// `parent_impurity` must be the impurity of the concatenation of `left` and
/// `right` under `criterion`. Reductions within rounding error of zero
/// relative to `parent_impurity`, including negative ones, are reported as
/// exactly `0.0`.
pub fn gain_from_parts<YT: Label>(
    criterion: Criterion,
    parent_impurity: f64,
    left: &[YT],
    right: &[YT],
) -> f64 {
    let num_samples = (left.len() + right.len()) as f64;
    if num_samples == 0.0 {
        return 0.0;
    }
    let weight_left = left.len() as f64 / num_samples;
    let weight_right = right.len() as f64 / num_samples;

    let gain = parent_impurity
        - weight_left * YT::impurity(criterion, left)
        - weight_right * YT::impurity(criterion, right);

    let tolerance = 8.0 * f64::EPSILON * parent_impurity;
    if gain <= tolerance {
        0.0
    } else {
        gain
    }
}

/// `impurity(S) - |S1|/|S| * impurity(S1) - |S2|/|S| * impurity(S2)`.
pub fn information_gain<YT: Label>(
    criterion: Criterion,
    parent: &[YT],
    left: &[YT],
    right: &[YT],
) -> f64 {
    gain_from_parts(criterion, YT::impurity(criterion, parent), left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_criterion_from_str() {
        assert_eq!("gini".parse::<Criterion>().unwrap(), Criterion::Gini);
        assert_eq!("Entropy".parse::<Criterion>().unwrap(), Criterion::Entropy);
        assert_eq!("VARIANCE".parse::<Criterion>().unwrap(), Criterion::Variance);
    }

    #[test]
    fn test_criterion_from_str_unrecognized() {
        let err = "log_loss".parse::<Criterion>().unwrap_err();
        assert!(matches!(err, TreeError::Configuration(ref message) if message.contains("log_loss")));
    }

    #[test]
    fn test_criterion_display_round_trips() {
        for criterion in [Criterion::Gini, Criterion::Entropy, Criterion::Variance] {
            assert_eq!(criterion.to_string().parse::<Criterion>().unwrap(), criterion);
        }
    }

    #[test]
    fn test_label_supports() {
        assert!(u8::supports(Criterion::Gini));
        assert!(i64::supports(Criterion::Entropy));
        assert!(!usize::supports(Criterion::Variance));
        assert!(f64::supports(Criterion::Variance));
        assert!(!f32::supports(Criterion::Gini));
    }

    #[test]
    fn test_class_counts() {
        assert_eq!(class_counts(&[2, 0, 2, 1, 2]), vec![(0, 1), (1, 1), (2, 3)]);
        assert!(class_counts::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_majority_breaks_ties_towards_smallest_label() {
        assert_eq!(majority(&[3, 1, 3, 1, 2]), Some(1));
        assert_eq!(majority(&[5, 5, 4]), Some(5));
        assert_eq!(majority::<u8>(&[]), None);
    }

    #[test]
    fn test_leaf_values() {
        assert_eq!(u8::leaf_value(&[1, 0, 1]), 1);
        assert_eq!(f64::leaf_value(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 3.5);
    }

    #[test]
    fn test_gini_index() {
        assert_relative_eq!(gini_index(&[0, 0, 0, 0]), 0.0);
        assert_relative_eq!(gini_index(&[0, 0, 1, 1]), 0.5);
        assert_relative_eq!(gini_index(&[0, 1, 2]), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_entropy() {
        assert_relative_eq!(entropy(&[1, 1, 1]), 0.0);
        assert_relative_eq!(entropy(&[0, 1]), 1.0);
        // -0.75*log2(0.75) - 0.25*log2(0.25)
        assert_relative_eq!(entropy(&[0, 0, 0, 1]), 0.811_278_124_459_132_8, epsilon = 1e-12);
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.0);
        assert_eq!(variance::<f64>(&[]), 0.0);
    }

    #[test]
    fn test_information_gain_perfect_split() {
        let gain = information_gain(Criterion::Gini, &[0, 0, 1, 1], &[0, 0], &[1, 1]);
        assert_relative_eq!(gain, 0.5);

        let gain = information_gain(Criterion::Entropy, &[0, 0, 1, 1], &[0, 0], &[1, 1]);
        assert_relative_eq!(gain, 1.0);
    }

    #[test]
    fn test_information_gain_is_zero_for_uninformative_split() {
        let parent = [0, 1, 2, 0, 1, 2];
        let gain = information_gain(Criterion::Gini, &parent, &[0, 1, 2], &[0, 1, 2]);
        assert_eq!(gain, 0.0);

        let gain = information_gain(Criterion::Entropy, &parent, &[0, 1, 2], &[0, 1, 2]);
        assert_eq!(gain, 0.0);
    }

    #[test]
    fn test_variance_reduction() {
        let parent = [1.0, 2.0, 3.0, 4.0, 5.0];
        let gain = information_gain(Criterion::Variance, &parent, &[1.0, 2.0], &[3.0, 4.0, 5.0]);
        // 2.0 - 0.4 * 0.25 - 0.6 * (2.0 / 3.0)
        assert_relative_eq!(gain, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_variance_reduction_on_small_targets() {
        let parent = [0.0, 0.0, 1e-8, 1e-8];
        let gain = information_gain(Criterion::Variance, &parent, &[0.0, 0.0], &[1e-8, 1e-8]);
        assert!(gain > 0.0);
        assert_relative_eq!(gain, 2.5e-17, epsilon = 0.0, max_relative = 1e-9);

        let gain = information_gain(Criterion::Variance, &parent, &[0.0, 1e-8], &[0.0, 1e-8]);
        assert_eq!(gain, 0.0);
    }

    #[test]
    fn test_information_gain_is_never_negative() {
        let parent = [0, 1, 1, 0, 1, 0, 0, 1, 1];
        for k in 0..=parent.len() {
            let (left, right) = parent.split_at(k);
            for criterion in [Criterion::Gini, Criterion::Entropy] {
                assert!(information_gain(criterion, &parent, left, right) >= 0.0);
            }
        }
    }
}
