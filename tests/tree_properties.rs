use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rusty_tree::data::dataset::{Dataset, Number};
use rusty_tree::trees::criterion::information_gain;
use rusty_tree::trees::{build, Criterion, Split, TreeBuilder, TreeNode, TreeParams};
use rusty_tree::TreeError;

fn random_classification(seed: u64, nrows: usize, ncols: usize, classes: u8) -> Dataset<f64, u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = DMatrix::from_fn(nrows, ncols, |_, _| f64::from(rng.gen_range(0..10_u8)));
    let y = DVector::from_fn(nrows, |_, _| rng.gen_range(0..classes));
    Dataset::new(x, y).unwrap()
}

/// Checks that every internal node partitions exactly the examples that reach it.
fn assert_partitions<XT, YT>(node: &TreeNode<XT, YT>, dataset: &Dataset<XT, YT>)
where
    XT: Number,
    YT: rusty_tree::trees::Label,
{
    assert_eq!(node.n_samples(), dataset.nrows());
    if let TreeNode::Internal {
        split, left, right, ..
    } = node
    {
        let (left_data, right_data) = dataset.split_on_threshold(split.feature_index, split.threshold);
        assert!(left_data.nrows() > 0 && right_data.nrows() > 0);
        assert_eq!(left_data.nrows() + right_data.nrows(), dataset.nrows());
        assert!(left_data
            .x()
            .column(split.feature_index)
            .iter()
            .all(|&value| split.goes_left(value)));
        assert!(right_data
            .x()
            .column(split.feature_index)
            .iter()
            .all(|&value| !split.goes_left(value)));
        assert_partitions(left, &left_data);
        assert_partitions(right, &right_data);
    }
}

#[test]
fn four_point_example_splits_on_second_feature() {
    let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 2.0, 0.0, 1.0, 1.0, 2.0, 1.0]);
    let y = DVector::from_vec(vec![0_u8, 0, 1, 1]);
    let dataset = Dataset::new(x, y).unwrap();

    for criterion in ["gini", "entropy"] {
        let params = TreeParams::with_options(criterion, None, 2).unwrap();
        let root = build(&dataset, &params).unwrap();
        let expected = TreeNode::internal(
            Split::new(1, 0.5),
            if criterion == "gini" { 0.5 } else { 1.0 },
            TreeNode::leaf(0, 2),
            TreeNode::leaf(1, 2),
        );
        assert_eq!(root, expected);
    }
}

#[test]
fn uniform_labels_give_a_single_leaf() {
    let x = DMatrix::from_row_slice(5, 2, &[1.0, 9.0, 2.0, 8.0, 3.0, 7.0, 4.0, 6.0, 5.0, 5.0]);
    let y = DVector::from_vec(vec![3_u8; 5]);
    let dataset = Dataset::new(x, y).unwrap();

    let root = build(&dataset, &TreeParams::new()).unwrap();
    assert_eq!(root, TreeNode::leaf(3, 5));
}

#[test]
fn random_trees_respect_max_depth_and_partition_their_data() {
    for seed in 0..20 {
        let dataset = random_classification(seed, 60, 3, 3);
        for max_depth in [1, 2, 4] {
            for criterion in [Criterion::Gini, Criterion::Entropy] {
                let mut params = TreeParams::new().with_criterion(criterion);
                params.set_max_depth(Some(max_depth)).unwrap();

                let root = build(&dataset, &params).unwrap();
                assert!(root.depth() <= usize::from(max_depth));
                assert_partitions(&root, &dataset);
            }
        }
    }
}

#[test]
fn unbounded_trees_terminate_and_partition_their_data() {
    for seed in 0..10 {
        let dataset = random_classification(seed, 80, 2, 4);
        let root = build(&dataset, &TreeParams::new()).unwrap();
        assert!(root.depth() < dataset.nrows());
        assert_partitions(&root, &dataset);
    }
}

#[test]
fn regression_trees_partition_their_data() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = DMatrix::from_fn(50, 2, |_, _| rng.gen_range(-5.0..5.0));
    let y = DVector::from_fn(50, |i, _| x[(i, 0)] * 2.0 + x[(i, 1)]);
    let dataset = Dataset::new(x, y).unwrap();

    let params = TreeParams::with_options("variance", Some(5), 4).unwrap();
    let root = build(&dataset, &params).unwrap();
    assert!(root.depth() <= 5);
    assert_partitions(&root, &dataset);
}

#[test]
fn gains_are_never_negative() {
    let dataset = random_classification(3, 40, 1, 3);
    let mut rows: Vec<(f64, u8)> = dataset
        .x()
        .column(0)
        .iter()
        .copied()
        .zip(dataset.y().iter().copied())
        .collect();
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    let labels: Vec<u8> = rows.into_iter().map(|(_, label)| label).collect();

    for boundary in 0..=labels.len() {
        let (left, right) = labels.split_at(boundary);
        for criterion in [Criterion::Gini, Criterion::Entropy] {
            assert!(information_gain(criterion, &labels, left, right) >= 0.0);
        }
    }
}

#[test]
fn small_scale_regression_targets_still_split() {
    let x = DMatrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]);
    for scale in [1.0, 1e-8, 1e-150] {
        let y = DVector::from_vec(vec![0.0, 0.0, scale, scale]);
        let dataset = Dataset::new(x.clone(), y).unwrap();
        let params = TreeParams::with_options("variance", None, 2).unwrap();

        let root = build(&dataset, &params).unwrap();
        match &root {
            TreeNode::Internal { split, gain, .. } => {
                assert_eq!(*split, Split::new(0, 2.5));
                assert!(*gain > 0.0);
            }
            TreeNode::Leaf { .. } => panic!("targets of scale {scale} were not split"),
        }
        assert_partitions(&root, &dataset);
    }
}

#[test]
fn integer_features_spanning_their_type_partition_their_data() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut values: Vec<i8> = (0..40).map(|_| rng.gen()).collect();
    values.extend([i8::MIN, i8::MAX]);
    let x = DMatrix::from_vec(values.len(), 1, values);
    let y = DVector::from_fn(x.nrows(), |i, _| u8::from(x[(i, 0)] > 0));
    let dataset = Dataset::new(x, y).unwrap();

    let root = build(&dataset, &TreeParams::new()).unwrap();
    assert_eq!(root.depth(), 1);
    assert_partitions(&root, &dataset);
}

#[test]
fn gain_is_zero_when_split_keeps_label_distribution() {
    let parent = [0_u8, 1, 0, 1, 0, 1, 0, 1];
    let gain = information_gain(Criterion::Gini, &parent, &parent[..4], &parent[4..]);
    assert_eq!(gain, 0.0);

    let gain = information_gain(Criterion::Gini, &parent, &[0, 0, 0, 1], &[1, 1, 1, 0]);
    assert!(gain > 0.0);
}

#[test]
fn empty_dataset_is_an_error() {
    let dataset = Dataset::new(DMatrix::<f64>::zeros(0, 3), DVector::<u8>::zeros(0)).unwrap();
    let result = TreeBuilder::new(TreeParams::new()).build(&dataset);
    assert!(matches!(result, Err(TreeError::EmptyDataset)));
}

#[test]
fn unrecognized_criterion_is_a_configuration_error() {
    let result = TreeParams::with_options("chi-squared", Some(3), 2);
    match result {
        Err(TreeError::Configuration(message)) => assert!(message.contains("chi-squared")),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn rebuilding_gives_identical_trees() {
    let dataset = random_classification(5, 100, 4, 3);
    let params = TreeParams::with_options("entropy", Some(6), 2).unwrap();
    let first = build(&dataset, &params).unwrap();
    let second = build(&dataset, &params).unwrap();
    assert_eq!(first, second);
}
