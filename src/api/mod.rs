pub mod error;
pub mod health;
pub mod page;
pub mod response;
pub mod v1;

use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::app::AppState;

/// No request timeout layer: a forecast run that has started always finishes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::forecast_page))
        .nest("/api/v1", v1::router())
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .with_state(state)
        .layer(CatchPanicLayer::custom(page::panic_page))
        .layer(TraceLayer::new_for_http())
}
