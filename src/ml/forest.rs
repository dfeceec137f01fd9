use crate::error::{AppError, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};

/// Ensemble hyperparameters.
#[derive(Debug, Clone)]
pub struct ForestParameters {
    /// Number of trees
    pub n_trees: usize,

    /// Maximum depth per tree
    pub max_depth: u16,

    /// Seed for bootstrap resampling
    pub seed: u64,
}

impl Default for ForestParameters {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            seed: 42,
        }
    }
}

/// Bagged ensemble of decision trees for binary confirmation labels.
///
/// Each tree is fit on a seeded bootstrap resample of the training rows;
/// the positive-class probability of a row is the fraction of trees
/// voting "confirmed". Inference carries no per-call state, so a trained
/// forest can be shared read-only across concurrent callers.
#[derive(Debug)]
pub struct ConfirmationForest {
    trees: Vec<DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>>,
    n_features: usize,
}

impl ConfirmationForest {
    /// Fit the ensemble on an encoded feature matrix and binary labels.
    pub fn fit(features: &Array2<f64>, labels: &[i32], params: &ForestParameters) -> Result<Self> {
        let n_samples = features.nrows();
        let n_features = features.ncols();

        if params.n_trees == 0 {
            return Err(AppError::Validation(
                "n_trees must be positive".to_string(),
            ));
        }
        if n_samples == 0 {
            return Err(AppError::InsufficientData(
                "cannot fit forest on an empty dataset".to_string(),
            ));
        }
        if labels.len() != n_samples {
            return Err(AppError::Internal(format!(
                "label count {} does not match row count {}",
                labels.len(),
                n_samples
            )));
        }

        let mut trees = Vec::with_capacity(params.n_trees);

        for t in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));

            let mut data = Vec::with_capacity(n_samples * n_features);
            let mut y = Vec::with_capacity(n_samples);
            for _ in 0..n_samples {
                let i = rng.gen_range(0..n_samples);
                data.extend(features.row(i).iter().copied());
                y.push(labels[i]);
            }

            let x = DenseMatrix::new(n_samples, n_features, data, false);
            let tree_params = DecisionTreeClassifierParameters::default()
                .with_max_depth(params.max_depth)
                .with_criterion(SplitCriterion::Gini);

            let tree = DecisionTreeClassifier::fit(&x, &y, tree_params)
                .map_err(|e| AppError::Internal(format!("failed to fit tree {}: {}", t, e)))?;
            trees.push(tree);
        }

        Ok(Self { trees, n_features })
    }

    /// Positive-class vote fraction for every row, in [0,1].
    pub fn positive_fractions(&self, features: &Array2<f64>) -> Result<Vec<f64>> {
        if features.ncols() != self.n_features {
            return Err(AppError::Encoding(format!(
                "feature width {} does not match trained width {}",
                features.ncols(),
                self.n_features
            )));
        }

        let x = Self::ndarray_to_densematrix(features);
        let mut votes = vec![0usize; features.nrows()];

        for tree in &self.trees {
            let predictions = tree
                .predict(&x)
                .map_err(|e| AppError::Internal(format!("tree prediction failed: {}", e)))?;
            for (i, &label) in predictions.iter().enumerate() {
                if label == 1 {
                    votes[i] += 1;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v as f64 / n_trees).collect())
    }

    /// Positive-class vote fraction for one encoded row.
    pub fn positive_fraction_row(&self, row: &[f64]) -> Result<f64> {
        let features = Array2::from_shape_vec((1, row.len()), row.to_vec())
            .map_err(|e| AppError::Internal(format!("failed to shape feature row: {}", e)))?;
        Ok(self.positive_fractions(&features)?[0])
    }

    /// Majority-vote class labels (1 = confirmed).
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<i32>> {
        Ok(self
            .positive_fractions(features)?
            .into_iter()
            .map(|p| if p >= 0.5 { 1 } else { 0 })
            .collect())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
        let shape = arr.shape();
        let data: Vec<f64> = arr.iter().copied().collect();
        DenseMatrix::new(shape[0], shape[1], data, false)
    }
}
