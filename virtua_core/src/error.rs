//! Error types for the virtua_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for virtua_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),

    /// Workout session state machine error
    #[error("Session error: {0}")]
    Session(String),

    /// Invalid measurement input (BMI calculator)
    #[error("Invalid measurement: {0}")]
    Measurement(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
