mod report;

pub mod health;
pub mod metrics;

use axum::{Router, routing::post};

/// Build report generation routes
pub fn report_routes() -> Router {
    Router::new().route("/generate-report", post(report::generate))
}
