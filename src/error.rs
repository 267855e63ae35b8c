/// Centralized error types for the roulette tracker
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    // Feed Errors
    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Data Errors
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Deserialization failed: {0}")]
    DeserializationError(#[from] serde_json::Error),

    // Persistence Errors
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Request Errors
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // Generic Errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    /// Errors that only end the current ingestion cycle; the next tick retries.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            TrackerError::ConfigError(_) | TrackerError::InvalidParameter(_)
        )
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            TrackerError::FeedUnavailable(_) => "FEED_001",
            TrackerError::HttpError(_) => "FEED_002",
            TrackerError::InvalidRecord(_) => "DATA_001",
            TrackerError::DeserializationError(_) => "DATA_002",
            TrackerError::PersistenceFailure(_) => "FILE_001",
            TrackerError::CorruptSnapshot(_) => "FILE_002",
            TrackerError::FileError(_) => "FILE_003",
            TrackerError::ConfigError(_) => "CFG_001",
            TrackerError::InvalidParameter(_) => "REQ_001",
            TrackerError::InternalError(_) => "INT_001",
        }
    }
}
