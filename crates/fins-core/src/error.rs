//! Error types for FINS

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The ledger is empty or too sparse for the requested analysis
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The forecasting collaborator failed
    #[error("Forecast failed: {0}")]
    Forecast(String),

    /// Unexpected failure inside an analysis operation (details are logged)
    #[error("Internal error during {0}")]
    Internal(String),
}

impl Error {
    /// Errors the caller can act on, surfaced unchanged at the analysis boundary
    pub fn is_caller_visible(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData(_)
                | Error::InvalidData(_)
                | Error::NotFound(_)
                | Error::Forecast(_)
                | Error::Internal(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_visible_errors() {
        assert!(Error::InsufficientData("empty".into()).is_caller_visible());
        assert!(Error::Forecast("boom".into()).is_caller_visible());
        assert!(!Error::Import("bad row".into()).is_caller_visible());
        assert!(!Error::Io(std::io::Error::other("disk")).is_caller_visible());
    }

    #[test]
    fn test_display() {
        let err = Error::InsufficientData("no ledger records for user alice".into());
        assert_eq!(
            err.to_string(),
            "Insufficient data: no ledger records for user alice"
        );
    }
}
