use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::ml::predictor::BatchOutcome;
use crate::models::{BookingRecord, RiskLevel};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: "BookingPredictionModel".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub version: String,
}

/// Success envelope shared by the prediction endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Predict confirmation probability for a single booking
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<BookingRecord>,
) -> Result<Json<ApiResponse<PredictionData>>> {
    record.validate()?;

    let probability = state.predictor.predict(&record)?;
    let risk_level = RiskLevel::from_probability(probability);

    Ok(Json(ApiResponse::ok(PredictionData {
        confirmation_probability: probability,
        risk_level,
        recommendation: risk_level.recommendation().to_string(),
        input: record,
    })))
}

#[derive(Debug, Serialize)]
pub struct PredictionData {
    pub confirmation_probability: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub input: BookingRecord,
}

/// Predict confirmation probability for a list of bookings.
///
/// Each booking is evaluated independently; a failing record is reported
/// in its slot while the other slots still carry predictions. Slots are
/// decoded individually so a structurally malformed booking also fails
/// only its own slot, not the whole batch.
pub async fn batch_predict(
    State(state): State<AppState>,
    Json(request): Json<BatchPredictRequest>,
) -> Json<ApiResponse<Vec<BatchSlot>>> {
    let results = request
        .bookings
        .into_iter()
        .enumerate()
        .map(|(index, value)| match serde_json::from_value::<BookingRecord>(value) {
            Ok(record) => BatchSlot::from(BatchOutcome {
                index,
                result: state.predictor.predict(&record),
            }),
            Err(e) => BatchSlot::Failed {
                index,
                error: AppError::Validation(e.to_string()).to_string(),
                success: false,
            },
        })
        .collect();
    Json(ApiResponse::ok(results))
}

#[derive(Debug, Deserialize)]
pub struct BatchPredictRequest {
    pub bookings: Vec<serde_json::Value>,
}

/// One index-aligned slot of a batch response
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchSlot {
    Predicted {
        index: usize,
        confirmation_probability: f64,
        success: bool,
    },
    Failed {
        index: usize,
        error: String,
        success: bool,
    },
}

impl From<BatchOutcome> for BatchSlot {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome.result {
            Ok(probability) => BatchSlot::Predicted {
                index: outcome.index,
                confirmation_probability: probability,
                success: true,
            },
            Err(err) => BatchSlot::Failed {
                index: outcome.index,
                error: err.to_string(),
                success: false,
            },
        }
    }
}

/// Model information and training metrics
pub async fn model_info(State(state): State<AppState>) -> Json<ApiResponse<ModelInfo>> {
    let report = &state.report;

    Json(ApiResponse::ok(ModelInfo {
        model_type: "Random Forest Classifier".to_string(),
        n_estimators: report.n_trees,
        training_samples: report.n_samples,
        features: state.predictor.feature_names().to_vec(),
        train_accuracy: format!("{:.2}%", report.train_accuracy * 100.0),
        test_accuracy: format!("{:.2}%", report.test_accuracy * 100.0),
        feature_importance: report.feature_importance.clone(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub n_estimators: usize,
    pub training_samples: usize,
    pub features: Vec<String>,
    pub train_accuracy: String,
    pub test_accuracy: String,
    pub feature_importance: HashMap<String, f64>,
}
