//! CLI error types

use farm_startup::StartupError;
use farm_types::ValidationError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Declared document failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Startup evaluation failed
    #[error("Startup evaluation failed: {0}")]
    Startup(#[from] StartupError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
