//! Error types for the planner core.

use thiserror::Error;

/// Crate error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The durable meal-plan slot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A display filter ceiling was negative or not a number.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Configuration could not be assembled.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, Error>;
