use crate::error::{AppError, Result};
use crate::models::{BookingRecord, LabeledBooking};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Feature names in encoding order. This order is the contract between
/// training and inference; the encoder, the trainer and the report all
/// derive their layout from it.
pub const FEATURE_NAMES: [&str; 8] = [
    "day_of_week",
    "booking_hour",
    "route_segment",
    "seat_type",
    "num_seats",
    "has_meal",
    "advance_days",
    "month",
];

/// Fitted label <-> index mapping for one categorical field.
///
/// Labels are sorted at fit time so the encoding is independent of the
/// order rows were observed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMap {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryMap {
    fn fit<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let labels: Vec<String> = values
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self { labels, index }
    }

    /// Encoding slot for a label, if it was seen at fit time.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Inverse mapping: the label occupying an encoding slot.
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Vocabularies for the three categorical booking fields, fit once from
/// training data and held alongside the trained model so inference-time
/// encoding reproduces the training-time encoding exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub days: CategoryMap,
    pub routes: CategoryMap,
    pub seat_types: CategoryMap,
}

/// Maps raw booking records into fixed-order numeric feature vectors.
///
/// Categoricals are ordinally encoded against the fitted vocabulary,
/// numerics pass through after range validation.
pub struct BookingEncoder;

impl BookingEncoder {
    /// Build vocabularies from the training rows' observed categorical
    /// values.
    pub fn fit_vocabulary(rows: &[LabeledBooking]) -> CategoryVocabulary {
        CategoryVocabulary {
            days: CategoryMap::fit(rows.iter().map(|r| r.record.day_of_week.as_str())),
            routes: CategoryMap::fit(rows.iter().map(|r| r.record.route_segment.as_str())),
            seat_types: CategoryMap::fit(rows.iter().map(|r| r.record.seat_type.as_str())),
        }
    }

    /// Encode one record into a `FEATURE_NAMES`-ordered vector.
    ///
    /// Out-of-range numerics fail with `Validation`; categorical values
    /// outside the fitted vocabulary fail with `UnknownCategory`.
    pub fn encode(record: &BookingRecord, vocabulary: &CategoryVocabulary) -> Result<Vec<f64>> {
        Self::validate_ranges(record)?;

        let day = vocabulary
            .days
            .index_of(&record.day_of_week)
            .ok_or_else(|| AppError::UnknownCategory {
                field: "day_of_week".to_string(),
                value: record.day_of_week.clone(),
            })?;
        let route = vocabulary
            .routes
            .index_of(&record.route_segment)
            .ok_or_else(|| AppError::UnknownCategory {
                field: "route_segment".to_string(),
                value: record.route_segment.clone(),
            })?;
        let seat = vocabulary
            .seat_types
            .index_of(&record.seat_type)
            .ok_or_else(|| AppError::UnknownCategory {
                field: "seat_type".to_string(),
                value: record.seat_type.clone(),
            })?;

        Ok(vec![
            day as f64,
            record.booking_hour as f64,
            route as f64,
            seat as f64,
            record.num_seats as f64,
            record.has_meal as f64,
            record.advance_days as f64,
            record.month as f64,
        ])
    }

    /// Feature names as owned strings, in encoding order.
    pub fn feature_names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    /// Number of features per encoded vector.
    pub fn n_features() -> usize {
        FEATURE_NAMES.len()
    }

    fn validate_ranges(record: &BookingRecord) -> Result<()> {
        if record.booking_hour > 23 {
            return Err(AppError::Validation(format!(
                "booking_hour must be in 0-23, got {}",
                record.booking_hour
            )));
        }
        if record.month < 1 || record.month > 12 {
            return Err(AppError::Validation(format!(
                "month must be in 1-12, got {}",
                record.month
            )));
        }
        if record.num_seats == 0 {
            return Err(AppError::Validation(
                "num_seats must be positive".to_string(),
            ));
        }
        if record.has_meal > 1 {
            return Err(AppError::Validation(format!(
                "has_meal must be 0 or 1, got {}",
                record.has_meal
            )));
        }
        Ok(())
    }
}
