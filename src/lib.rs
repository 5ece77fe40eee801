//! # Crop Recommender
//!
//! A small web front-end that takes seven soil and climate measurements from
//! an HTML form and asks a pre-trained classifier which crop suits them best.
//!
//! ## Modules
//!
//! - `model`: classifier trait, supported model families and the artifact loader
//! - `inference`: the request-to-prediction pipeline
//! - `pages`: HTML templates and rendering
//! - `routes`: axum handlers and router assembly
//! - `state`: server configuration and shared application state
//! - `utils`: error types and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crop_recommender::{load_model, routes, AppState, ServerConfig};
//!
//! let config = ServerConfig::default();
//! let model = load_model(&config.model_path)?;
//! let app = routes::router(Arc::new(AppState::new(config, Arc::new(model))));
//! ```

pub mod inference;
pub mod model;
pub mod pages;
pub mod routes;
pub mod state;
pub mod utils;

// Re-export commonly used items for convenience
pub use inference::{PredictError, PredictionOutcome, PredictionService};
pub use model::{load_model, Classifier, CropModel, FeatureVector, LoadedModel, FEATURE_NAMES};
pub use state::{AppState, ServerConfig, SharedState};
pub use utils::error::{CropError, Result};

/// Model artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "crop_app";

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
