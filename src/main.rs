use booking_predictor::{
    api::{build_router, AppState},
    config::Config,
    ml::{trainer, BookingPredictor, SyntheticDataGenerator},
    models::LabeledBooking,
};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_predictor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!("Starting booking predictor v{}", env!("CARGO_PKG_VERSION"));

    // Generate the synthetic training table
    let generator = SyntheticDataGenerator::new(config.model.seed);
    let rows = generator.generate(config.model.n_samples)?;
    tracing::info!("Generated {} synthetic booking rows", rows.len());

    // Persist the table for inspection; failure here is not fatal
    if let Some(path) = &config.model.dataset_export_path {
        match export_dataset(path, &rows) {
            Ok(()) => tracing::info!(path = %path.display(), "Synthetic dataset exported"),
            Err(e) => tracing::warn!("Failed to export synthetic dataset: {}", e),
        }
    }

    // Train once, synchronously, before accepting traffic. A training
    // failure aborts startup: the service must not serve without a model.
    let (model, report) = trainer::train(&rows, &config.model)?;
    tracing::info!(
        train_accuracy = %format!("{:.2}%", report.train_accuracy * 100.0),
        test_accuracy = %format!("{:.2}%", report.test_accuracy * 100.0),
        n_trees = report.n_trees,
        "Model training complete"
    );

    let predictor = Arc::new(BookingPredictor::new(Arc::new(model)));
    let state = AppState::new(predictor, Arc::new(report));

    // Build HTTP router
    let app = build_router(state);

    // Start HTTP server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("HTTP API server listening on http://{}", addr);
    tracing::info!("   Health check: http://{}/health", addr);
    tracing::info!("   Prediction: http://{}/predict", addr);
    tracing::info!("   Batch prediction: http://{}/batch-predict", addr);
    tracing::info!("   Model info: http://{}/model-info", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

/// Write the generated table as CSV. Inspection artifact only, not a
/// wire contract.
fn export_dataset(path: &Path, rows: &[LabeledBooking]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = String::from(
        "day_of_week,booking_hour,route_segment,seat_type,num_seats,has_meal,advance_days,month,confirmed\n",
    );
    for row in rows {
        let r = &row.record;
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            r.day_of_week,
            r.booking_hour,
            r.route_segment,
            r.seat_type,
            r.num_seats,
            r.has_meal,
            r.advance_days,
            r.month,
            u8::from(row.confirmed)
        );
    }
    std::fs::write(path, out)
}
