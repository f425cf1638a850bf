//! Error types for the router

use thiserror::Error;

/// Result type alias for the router
pub type Result<T> = std::result::Result<T, RouterError>;

/// Main error type for the router
#[derive(Error, Debug)]
pub enum RouterError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Performance store could not be written or read
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// On-disk schema is newer than this build understands
    #[error("Unsupported schema version {found} (supported up to {supported})")]
    UnsupportedSchemaVersion {
        /// Version found on disk
        found: u32,
        /// Highest version this build can read
        supported: u32,
    },

    /// Request could not be analysed
    #[error("Feature extraction error: {0}")]
    FeatureExtraction(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}
