use crate::error::Result;
use crate::ml::features::BookingEncoder;
use crate::ml::trainer::TrainedModel;
use crate::models::BookingRecord;
use std::sync::Arc;

/// Outcome of one slot in a batch prediction: the input position plus
/// either a probability or the error that record produced.
#[derive(Debug)]
pub struct BatchOutcome {
    pub index: usize,
    pub result: Result<f64>,
}

/// Stateless inference front-end over a trained model.
///
/// The model is injected at construction and never mutated, so one
/// predictor can serve any number of concurrent callers.
pub struct BookingPredictor {
    model: Arc<TrainedModel>,
}

impl BookingPredictor {
    pub fn new(model: Arc<TrainedModel>) -> Self {
        Self { model }
    }

    /// Confirmation probability for one booking, on a 0-100 scale rounded
    /// to two decimals. Encoding errors propagate unchanged.
    pub fn predict(&self, record: &BookingRecord) -> Result<f64> {
        let features = BookingEncoder::encode(record, &self.model.vocabulary)?;
        let fraction = self.model.forest.positive_fraction_row(&features)?;
        Ok(round2(fraction * 100.0))
    }

    /// Best-effort per-item batch prediction: every input position gets a
    /// slot, and one record's failure never aborts the rest.
    pub fn predict_batch(&self, records: &[BookingRecord]) -> Vec<BatchOutcome> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| BatchOutcome {
                index,
                result: self.predict(record),
            })
            .collect()
    }

    /// Feature names in encoding order.
    pub fn feature_names(&self) -> &[String] {
        &self.model.feature_names
    }

    /// Ensemble size of the underlying model.
    pub fn n_trees(&self) -> usize {
        self.model.forest.n_trees()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::error::AppError;
    use crate::ml::dataset::SyntheticDataGenerator;
    use crate::ml::trainer::train;

    fn trained_predictor() -> BookingPredictor {
        let rows = SyntheticDataGenerator::new(42).generate(400).unwrap();
        let config = ModelConfig {
            n_samples: 400,
            n_trees: 25,
            max_depth: 8,
            test_split: 0.2,
            seed: 42,
            dataset_export_path: None,
        };
        let (model, _) = train(&rows, &config).unwrap();
        BookingPredictor::new(Arc::new(model))
    }

    fn sample_record() -> BookingRecord {
        BookingRecord {
            day_of_week: "Friday".to_string(),
            booking_hour: 14,
            route_segment: "Ahmedabad-Mumbai".to_string(),
            seat_type: "lower".to_string(),
            num_seats: 2,
            has_meal: 1,
            advance_days: 10,
            month: 3,
        }
    }

    #[test]
    fn test_predict_is_in_percentage_range() {
        let predictor = trained_predictor();
        let probability = predictor.predict(&sample_record()).unwrap();
        assert!((0.0..=100.0).contains(&probability));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let predictor = trained_predictor();
        let record = sample_record();
        assert_eq!(
            predictor.predict(&record).unwrap(),
            predictor.predict(&record).unwrap()
        );
    }

    #[test]
    fn test_predict_rounds_to_two_decimals() {
        let predictor = trained_predictor();
        let probability = predictor.predict(&sample_record()).unwrap();
        assert_eq!(probability, round2(probability));
    }

    #[test]
    fn test_unknown_category_propagates() {
        let predictor = trained_predictor();
        let mut record = sample_record();
        record.route_segment = "Pune-Goa".to_string();

        let err = predictor.predict(&record).unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { .. }));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let predictor = trained_predictor();
        let mut bad = sample_record();
        bad.seat_type = "window".to_string();

        let records = vec![sample_record(), bad, sample_record()];
        let outcomes = predictor.predict_batch(&records);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1].index, 1);
        assert!(outcomes[1].result.is_err());

        let expected = predictor.predict(&records[0]).unwrap();
        assert_eq!(*outcomes[0].result.as_ref().unwrap(), expected);
        assert_eq!(*outcomes[2].result.as_ref().unwrap(), expected);
    }

    #[test]
    fn test_empty_batch_yields_empty_results() {
        let predictor = trained_predictor();
        assert!(predictor.predict_batch(&[]).is_empty());
    }
}
