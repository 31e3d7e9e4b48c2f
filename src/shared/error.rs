use thiserror::Error;

/// Operational failures of the validation engine.
///
/// Scan verdicts (already used, not cached, not found) are not errors; they
/// are rejected [`ScanOutcome`](crate::domain::entities::ScanOutcome) values.
/// This enum covers the cases where an operation could not run at all.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No network connectivity available")]
    Offline,

    #[error("Event {0} has no tickets to cache")]
    EmptyEvent(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Registry error: {0}")]
    Remote(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for ScanError {
    fn from(err: sqlx::Error) -> Self {
        ScanError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for ScanError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        ScanError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::Remote(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Remote(format!("Malformed registry payload: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
