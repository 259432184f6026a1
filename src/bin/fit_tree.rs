use csv::ReaderBuilder;
use nalgebra::{DMatrix, DVector};
use rusty_tree::data::dataset::Dataset;
use rusty_tree::trees::classifier::DecisionTreeClassifier;
use rusty_tree::trees::regressor::DecisionTreeRegressor;
use rusty_tree::trees::Criterion;
use std::collections::HashMap;
use std::env;
use std::error::Error;

const USAGE: &str = "usage: fit-tree <file.csv> <n_features> <gini|entropy|variance> [max_depth]";

fn read_rows(file_path: &str, dimension: usize) -> Result<(Vec<f64>, Vec<String>), Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(file_path)?;
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.len() <= dimension {
            return Err(format!(
                "Record {} has {} fields, expected {} features and a label",
                labels.len() + 1,
                record.len(),
                dimension
            )
            .into());
        }
        for feature in record.iter().take(dimension) {
            features.push(feature.trim().parse::<f64>()?);
        }
        labels.push(record[dimension].trim().to_string());
    }
    Ok((features, labels))
}

fn read_file_classification(
    file_path: &str,
    dimension: usize,
) -> Result<Dataset<f64, u32>, Box<dyn Error>> {
    let (features, labels) = read_rows(file_path, dimension)?;

    let mut label_map = HashMap::new();
    let label_ids = labels
        .into_iter()
        .map(|label| {
            let next_id = label_map.len() as u32;
            *label_map.entry(label).or_insert(next_id)
        })
        .collect::<Vec<_>>();

    let feature_matrix = DMatrix::from_row_slice(label_ids.len(), dimension, &features);
    Ok(Dataset::new(feature_matrix, DVector::from_vec(label_ids))?)
}

fn read_file_regression(file_path: &str, dimension: usize) -> Result<Dataset<f64, f64>, Box<dyn Error>> {
    let (features, labels) = read_rows(file_path, dimension)?;
    let targets = labels
        .iter()
        .map(|label| label.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;

    let feature_matrix = DMatrix::from_row_slice(targets.len(), dimension, &features);
    Ok(Dataset::new(feature_matrix, DVector::from_vec(targets))?)
}

fn test_tree_classifier(
    file_path: &str,
    dimension: usize,
    criterion: Criterion,
    max_depth: Option<u16>,
) -> Result<String, Box<dyn Error>> {
    let dataset = read_file_classification(file_path, dimension)?;
    let (train_dataset, test_dataset) = dataset.train_test_split(0.75, Some(42))?;

    let mut classifier =
        DecisionTreeClassifier::with_params(Some(criterion.name()), None, max_depth)?;
    classifier.fit(&train_dataset)?;
    let predictions = classifier.predict(test_dataset.x())?;
    let correct = predictions
        .iter()
        .zip(test_dataset.y().iter())
        .filter(|(prediction, actual)| prediction == actual)
        .count();
    let depth = classifier.root().map_or(0, |root| root.depth());

    Ok(format!(
        "Accuracy: {}% (tree depth {})",
        (correct as f64 / test_dataset.nrows() as f64) * 100.0,
        depth
    ))
}

fn test_tree_regressor(
    file_path: &str,
    dimension: usize,
    max_depth: Option<u16>,
) -> Result<String, Box<dyn Error>> {
    let dataset = read_file_regression(file_path, dimension)?;
    let (train_dataset, test_dataset) = dataset.train_test_split(0.75, Some(42))?;

    let mut regressor = DecisionTreeRegressor::with_params(None, max_depth)?;
    regressor.fit(&train_dataset)?;
    let mse = regressor.mse(&test_dataset)?;
    let depth = regressor.root().map_or(0, |root| root.depth());

    Ok(format!("Predictions MSE: {} (tree depth {})", mse, depth))
}

fn run(args: &[String]) -> Result<String, Box<dyn Error>> {
    let [file_path, dimension, criterion, rest @ ..] = args else {
        return Err(USAGE.into());
    };
    let dimension = dimension.parse::<usize>()?;
    let criterion = criterion.parse::<Criterion>()?;
    let max_depth = rest.first().map(|depth| depth.parse::<u16>()).transpose()?;

    if criterion.is_classification() {
        test_tree_classifier(file_path, dimension, criterion, max_depth)
    } else {
        test_tree_regressor(file_path, dimension, max_depth)
    }
}

fn main() {
    let args = env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(report) => println!("{}", report),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
