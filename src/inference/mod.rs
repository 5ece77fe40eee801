//! Inference module: turns submitted form fields into a crop prediction
//!
//! - `service`: the request-to-prediction pipeline
//! - `outcome`: success/failure result and the request error taxonomy

pub mod outcome;
pub mod service;

pub use outcome::{ErrorKind, PredictError, PredictionOutcome};
pub use service::{parse_features, PredictionService};
