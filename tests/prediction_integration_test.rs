/// Integration tests for the booking confirmation pipeline
///
/// These tests verify the complete flow:
/// - Synthetic dataset generation
/// - Vocabulary fitting and encoding
/// - Model training with train/test metrics and feature importance
/// - Single and batch predictions
/// - The HTTP façade (status codes, envelopes, risk tiers)
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use booking_predictor::{
    api::{build_router, AppState},
    config::ModelConfig,
    error::AppError,
    ml::{trainer, BookingPredictor, SyntheticDataGenerator, FEATURE_NAMES},
    models::{BookingRecord, RiskLevel},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

fn test_model_config(n_samples: usize) -> ModelConfig {
    ModelConfig {
        n_samples,
        n_trees: 30,
        max_depth: 8,
        test_split: 0.2,
        seed: 42,
        dataset_export_path: None,
    }
}

fn example_record() -> BookingRecord {
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

fn trained_predictor(n_samples: usize) -> (Arc<BookingPredictor>, AppState) {
    let rows = SyntheticDataGenerator::new(42).generate(n_samples).unwrap();
    let (model, report) = trainer::train(&rows, &test_model_config(n_samples)).unwrap();
    let predictor = Arc::new(BookingPredictor::new(Arc::new(model)));
    let state = AppState::new(predictor.clone(), Arc::new(report));
    (predictor, state)
}

#[test]
fn test_full_pipeline_prediction_in_range() {
    let (predictor, _) = trained_predictor(1000);
    let probability = predictor.predict(&example_record()).unwrap();
    assert!((0.0..=100.0).contains(&probability));
}

#[test]
fn test_prediction_is_deterministic() {
    let (predictor, _) = trained_predictor(500);
    let record = example_record();
    let first = predictor.predict(&record).unwrap();
    let second = predictor.predict(&record).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generate_zero_samples_fails() {
    let err = SyntheticDataGenerator::new(42).generate(0).unwrap_err();
    assert!(matches!(err, AppError::InsufficientData(_)));
}

#[test]
fn test_training_on_tiny_dataset_fails() {
    let rows = SyntheticDataGenerator::new(42).generate(1).unwrap();
    let err = trainer::train(&rows, &test_model_config(1)).unwrap_err();
    assert!(matches!(err, AppError::InsufficientData(_)));
}

#[test]
fn test_report_metrics_and_importance() {
    let rows = SyntheticDataGenerator::new(42).generate(1000).unwrap();
    let (_, report) = trainer::train(&rows, &test_model_config(1000)).unwrap();

    assert!((0.0..=1.0).contains(&report.train_accuracy));
    assert!((0.0..=1.0).contains(&report.test_accuracy));

    assert_eq!(report.feature_importance.len(), FEATURE_NAMES.len());
    for name in FEATURE_NAMES {
        assert!(report.feature_importance.contains_key(name));
    }
    assert!(report.feature_importance.values().all(|&w| w >= 0.0));
    let total: f64 = report.feature_importance.values().sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_batch_isolation_matches_individual_predictions() {
    let (predictor, _) = trained_predictor(500);

    let mut poisoned = example_record();
    poisoned.seat_type = "window".to_string();

    let mut records = vec![example_record(); 5];
    records[2] = poisoned;

    let outcomes = predictor.predict_batch(&records);
    assert_eq!(outcomes.len(), 5);

    for outcome in &outcomes {
        if outcome.index == 2 {
            assert!(outcome.result.is_err());
        } else {
            let expected = predictor.predict(&records[outcome.index]).unwrap();
            assert_eq!(*outcome.result.as_ref().unwrap(), expected);
        }
    }
}

async fn send_json(
    state: AppState,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let app = build_router(state);
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_, state) = trained_predictor(300);
    let (status, body) = send_json(state, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "BookingPredictionModel");
}

#[tokio::test]
async fn test_predict_endpoint_reports_risk_tier() {
    let (_, state) = trained_predictor(1000);
    let body = serde_json::to_value(example_record()).unwrap();
    let (status, response) = send_json(state, "POST", "/predict", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let probability = response["data"]["confirmation_probability"]
        .as_f64()
        .unwrap();
    assert!((0.0..=100.0).contains(&probability));

    let expected_tier = RiskLevel::from_probability(probability).to_string();
    assert_eq!(response["data"]["risk_level"], expected_tier);
    assert!(response["data"]["recommendation"].is_string());
    assert_eq!(response["data"]["input"]["day_of_week"], "Friday");
}

#[tokio::test]
async fn test_predict_endpoint_rejects_unknown_category() {
    let (_, state) = trained_predictor(300);
    let mut record = example_record();
    record.seat_type = "window".to_string();
    let body = serde_json::to_value(record).unwrap();

    let (status, response) = send_json(state, "POST", "/predict", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "UNKNOWN_CATEGORY");
}

#[tokio::test]
async fn test_predict_endpoint_rejects_out_of_range_hour() {
    let (_, state) = trained_predictor(300);
    let mut body = serde_json::to_value(example_record()).unwrap();
    body["booking_hour"] = serde_json::json!(24);

    let (status, response) = send_json(state, "POST", "/predict", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_predict_endpoint_rejects_missing_fields() {
    let (_, state) = trained_predictor(300);
    let body = serde_json::json!({"day_of_week": "Friday", "booking_hour": 14});

    let (status, _) = send_json(state, "POST", "/predict", Some(body)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_batch_predict_endpoint_is_index_aligned() {
    let (_, state) = trained_predictor(500);

    let mut poisoned = example_record();
    poisoned.day_of_week = "Funday".to_string();

    let body = serde_json::json!({
        "bookings": [example_record(), poisoned, example_record()]
    });
    let (status, response) = send_json(state, "POST", "/batch-predict", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let results = response["data"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["index"], 0);
    assert_eq!(results[0]["success"], true);
    assert!(results[0]["confirmation_probability"].is_f64());

    assert_eq!(results[1]["index"], 1);
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].as_str().unwrap().contains("Funday"));

    assert_eq!(results[2]["index"], 2);
    assert_eq!(results[2]["success"], true);
}

#[tokio::test]
async fn test_batch_predict_isolates_malformed_slots() {
    let (_, state) = trained_predictor(300);

    let mut missing_month = serde_json::to_value(example_record()).unwrap();
    missing_month.as_object_mut().unwrap().remove("month");

    let body = serde_json::json!({
        "bookings": [example_record(), missing_month, example_record()]
    });
    let (status, response) = send_json(state, "POST", "/batch-predict", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let results = response["data"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["index"], 1);
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].as_str().unwrap().contains("month"));
    assert_eq!(results[2]["success"], true);
}

#[tokio::test]
async fn test_model_info_endpoint() {
    let (_, state) = trained_predictor(500);
    let (status, response) = send_json(state, "GET", "/model-info", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let data = &response["data"];
    assert_eq!(data["model_type"], "Random Forest Classifier");
    assert_eq!(data["n_estimators"], 30);
    assert_eq!(data["training_samples"], 500);
    assert_eq!(data["features"].as_array().unwrap().len(), 8);
    assert!(data["train_accuracy"].as_str().unwrap().ends_with('%'));
    assert!(data["test_accuracy"].as_str().unwrap().ends_with('%'));
    assert_eq!(
        data["feature_importance"].as_object().unwrap().len(),
        FEATURE_NAMES.len()
    );
}
