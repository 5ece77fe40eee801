//! HTTP routes and router assembly

pub mod health;
pub mod pages;
pub mod predict;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Build the application router around shared state
pub fn router(state: SharedState) -> Router {
    Router::new()
        // Static pages
        .route("/", get(pages::home))
        .route("/form", get(pages::form_page))
        // Prediction
        .route("/predict", post(predict::predict))
        // Health check
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
