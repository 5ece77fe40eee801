//! Application state and server configuration
//!
//! The state is built once at startup around an already-loaded model and is
//! shared read-only by every request handler.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inference::PredictionService;
use crate::model::Classifier;
use crate::utils::error::{CropError, Result};
use crate::{DEFAULT_HOST, DEFAULT_MODEL_PATH, DEFAULT_PORT};

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path to the exported model artifact
    pub model_path: PathBuf,
    /// Use 422/500 for failed predictions instead of always answering 200
    pub strict_status: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            strict_status: false,
        }
    }
}

impl ServerConfig {
    /// Resolve the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                CropError::Config(format!(
                    "Invalid bind address '{}:{}': {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(CropError::Config("model path must not be empty".to_string()));
        }
        self.socket_addr()?;
        Ok(())
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Prediction pipeline around the loaded model
    pub service: PredictionService,
    /// Server start time
    pub started_at: Instant,
    /// Wall-clock start time, reported by the health endpoint
    pub started_at_utc: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, model: Arc<dyn Classifier>) -> Self {
        Self {
            config,
            service: PredictionService::new(model),
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.model_path, PathBuf::from("crop_app"));
        assert!(!config.strict_status);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CropError::Config(_))));
    }

    #[test]
    fn test_invalid_host_message() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.starts_with("Configuration error: Invalid bind address 'not a host:5000'"));
        assert_eq!(msg.matches("error:").count(), 1);

        let msg = config.socket_addr().unwrap_err().to_string();
        assert!(msg.starts_with("Configuration error: Invalid bind address"));
    }

    #[test]
    fn test_empty_model_path() {
        let config = ServerConfig {
            model_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
