//! Error Handling Module
//!
//! Defines the error types for the crop recommender library.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for crop recommender operations
#[derive(Error, Debug)]
pub enum CropError {
    /// Model artifact does not exist at the configured path
    #[error("Model artifact not found: {0}")]
    ModelNotFound(PathBuf),

    /// Model artifact could not be decoded
    #[error("Failed to decode model artifact: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Model artifact decoded but is structurally invalid
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Error while running the classifier
    #[error("Inference error: {0}")]
    Inference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for crop recommender operations
pub type Result<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropError::InvalidArtifact("empty class list".to_string());
        assert_eq!(format!("{}", err), "Invalid model artifact: empty class list");
    }

    #[test]
    fn test_model_not_found() {
        let err = CropError::ModelNotFound(PathBuf::from("models/crop_app"));
        assert!(format!("{}", err).contains("crop_app"));
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: CropError = parse.unwrap_err().into();
        assert!(matches!(err, CropError::Serialization(_)));
    }
}
