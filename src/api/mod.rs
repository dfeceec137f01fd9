pub mod handlers;
pub mod routes;

pub use routes::build_router;

use crate::ml::{BookingPredictor, TrainingReport};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<BookingPredictor>,
    pub report: Arc<TrainingReport>,
}

impl AppState {
    pub fn new(predictor: Arc<BookingPredictor>, report: Arc<TrainingReport>) -> Self {
        Self { predictor, report }
    }
}
