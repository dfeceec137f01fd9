/// Confirmation prediction pipeline
///
/// This module contains the algorithmic core of the service:
/// - Synthetic training-data generation with a hand-specified label rule
/// - Categorical feature encoding against a fitted vocabulary
/// - A bagged decision-tree ensemble with train/held-out metrics and
///   permutation feature importance
/// - Single and batch inference over a trained model
pub mod dataset;
pub mod features;
pub mod forest;
pub mod predictor;
pub mod trainer;

pub use dataset::SyntheticDataGenerator;
pub use features::{BookingEncoder, CategoryVocabulary, FEATURE_NAMES};
pub use forest::{ConfirmationForest, ForestParameters};
pub use predictor::{BatchOutcome, BookingPredictor};
pub use trainer::{train, TrainedModel, TrainingReport};
