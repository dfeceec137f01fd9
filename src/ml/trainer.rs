use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::ml::features::{BookingEncoder, CategoryVocabulary};
use crate::ml::forest::{ConfirmationForest, ForestParameters};
use crate::models::LabeledBooking;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Minimum number of rows required before a split is attempted.
pub const MIN_TRAINING_ROWS: usize = 10;

/// Fitted ensemble plus everything inference needs to reproduce the
/// training-time encoding. Immutable once trained; shared via `Arc`.
#[derive(Debug)]
pub struct TrainedModel {
    pub forest: ConfirmationForest,
    pub vocabulary: CategoryVocabulary,
    pub feature_names: Vec<String>,
}

/// Read-only summary of one training run, consumed by the info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub n_samples: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub feature_importance: HashMap<String, f64>,
    pub n_trees: usize,
    pub trained_at: chrono::DateTime<chrono::Utc>,
}

/// Fit the confirmation model on labeled rows.
///
/// Encodes every row (any failure aborts with `Encoding` naming the row),
/// splits train/test with a seeded shuffle, fits the forest, and computes
/// both accuracies plus permutation feature importance on the held-out
/// partition.
pub fn train(rows: &[LabeledBooking], config: &ModelConfig) -> Result<(TrainedModel, TrainingReport)> {
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(AppError::InsufficientData(format!(
            "need at least {} rows to train, got {}",
            MIN_TRAINING_ROWS,
            rows.len()
        )));
    }

    let vocabulary = BookingEncoder::fit_vocabulary(rows);
    let n_features = BookingEncoder::n_features();

    let mut encoded: Vec<Vec<f64>> = Vec::with_capacity(rows.len());
    let mut labels: Vec<i32> = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let vector = BookingEncoder::encode(&row.record, &vocabulary)
            .map_err(|e| AppError::Encoding(format!("training row {}: {}", i, e)))?;
        encoded.push(vector);
        labels.push(i32::from(row.confirmed));
    }

    // Seeded shuffle keeps the split reproducible across restarts.
    let n = rows.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(config.seed));

    let n_test = ((n as f64) * config.test_split).round() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_train == 0 || n_test == 0 {
        return Err(AppError::InsufficientData(format!(
            "split of {} rows at ratio {} leaves an empty partition",
            n, config.test_split
        )));
    }

    let (x_train, y_train) = materialize(&encoded, &labels, &indices[..n_train], n_features)?;
    let (x_test, y_test) = materialize(&encoded, &labels, &indices[n_train..], n_features)?;

    let forest_params = ForestParameters {
        n_trees: config.n_trees,
        max_depth: config.max_depth,
        seed: config.seed,
    };
    let forest = ConfirmationForest::fit(&x_train, &y_train, &forest_params)?;

    let train_accuracy = accuracy(&forest.predict(&x_train)?, &y_train);
    let test_accuracy = accuracy(&forest.predict(&x_test)?, &y_test);

    info!(n_train, n_test, train_accuracy, test_accuracy, "Forest fitted");

    let importance =
        permutation_importance(&forest, &x_test, &y_test, test_accuracy, config.seed)?;
    let feature_names = BookingEncoder::feature_names();
    let feature_importance: HashMap<String, f64> = feature_names
        .iter()
        .cloned()
        .zip(importance)
        .collect();

    let report = TrainingReport {
        n_samples: n,
        n_train,
        n_test,
        train_accuracy,
        test_accuracy,
        feature_importance,
        n_trees: forest.n_trees(),
        trained_at: chrono::Utc::now(),
    };

    let model = TrainedModel {
        forest,
        vocabulary,
        feature_names,
    };

    Ok((model, report))
}

fn materialize(
    encoded: &[Vec<f64>],
    labels: &[i32],
    indices: &[usize],
    n_features: usize,
) -> Result<(Array2<f64>, Vec<i32>)> {
    let mut data = Vec::with_capacity(indices.len() * n_features);
    let mut y = Vec::with_capacity(indices.len());
    for &i in indices {
        data.extend(encoded[i].iter().copied());
        y.push(labels[i]);
    }
    let x = Array2::from_shape_vec((indices.len(), n_features), data)
        .map_err(|e| AppError::Internal(format!("failed to build feature matrix: {}", e)))?;
    Ok((x, y))
}

fn accuracy(predictions: &[i32], truth: &[i32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / truth.len() as f64
}

/// Aggregate sensitivity per feature: shuffle one column of the held-out
/// partition at a time and measure the accuracy drop. Drops are clamped
/// non-negative and normalized to sum 1; when no feature moves the
/// accuracy the weight falls back to uniform.
fn permutation_importance(
    forest: &ConfirmationForest,
    x_test: &Array2<f64>,
    y_test: &[i32],
    baseline_accuracy: f64,
    seed: u64,
) -> Result<Vec<f64>> {
    let n_features = x_test.ncols();
    let mut drops = Vec::with_capacity(n_features);

    for j in 0..n_features {
        let mut permuted = x_test.clone();
        let mut column: Vec<f64> = permuted.column(j).to_vec();
        column.shuffle(&mut StdRng::seed_from_u64(seed ^ (j as u64 + 1)));
        for (i, value) in column.into_iter().enumerate() {
            permuted[[i, j]] = value;
        }

        let permuted_accuracy = accuracy(&forest.predict(&permuted)?, y_test);
        drops.push((baseline_accuracy - permuted_accuracy).max(0.0));
    }

    let total: f64 = drops.iter().sum();
    if total > 0.0 {
        Ok(drops.into_iter().map(|d| d / total).collect())
    } else {
        Ok(vec![1.0 / n_features as f64; n_features])
    }
}
