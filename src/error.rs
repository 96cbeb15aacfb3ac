//! Error types for the demand_forecast crate

use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// An entity's history is too short or too flat to train on.
    /// Expected during batch runs; callers skip the entity and continue.
    #[error("Insufficient data for '{entity}': {reason}")]
    InsufficientData { entity: String, reason: String },

    /// No usable model bundle exists for the entity. Raised when inference
    /// runs before training, or when a bundle on disk is partial or corrupt.
    #[error("No trained model found for '{entity}'")]
    ModelNotFound { entity: String },

    /// Caller supplied a recent window shorter than the model's input width
    #[error("Recent window too short: need {expected} values, got {actual}")]
    InsufficientWindow { expected: usize, actual: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
