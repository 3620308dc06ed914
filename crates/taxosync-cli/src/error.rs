//! Error types for the taxosync CLI
//!
//! User-facing errors with actionable messages; row-level import errors
//! stay inside the engine's run report and never surface through this
//! type.

use taxosync_core::{GatewayError, ImportError};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Remote store communication failed outside row processing
    #[error("Server error: {0}. Check that the server URL is correct and the service is reachable.")]
    Api(String),

    /// Login or session establishment failed
    #[error("Authentication failed: {0}. Check the username, password and collection name.")]
    Auth(String),

    /// Input CSV is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// A CSV row does not match either accepted shape
    #[error("Invalid row {index}: {message}")]
    RowShape { index: usize, message: String },

    /// CSV parsing failed
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and server URL.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your command-line flags and environment variables.")]
    Config(String),

    /// Gateway failure outside row processing (bootstrap, finalize)
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Import failure outside row processing (record set finalize)
    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

impl CliError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a row shape error
    pub fn row_shape(index: usize, message: impl Into<String>) -> Self {
        Self::RowShape {
            index,
            message: message.into(),
        }
    }
}
