//! Error types for jobdeck.

use thiserror::Error;

/// Result type alias using jobdeck's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jobdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Page Source failed to deliver a page (network, status, body).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Page Source answered with a shape that breaks its contract.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Record Store operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`], used to route failures to the
/// right observable channel (load error state vs. per-operation result).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Fetch,
    ContractViolation,
    Storage,
    Other,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Fetch(_) | Error::Request(_) => ErrorKind::Fetch,
            Error::ContractViolation(_) => ErrorKind::ContractViolation,
            Error::Storage(_) | Error::Database(_) => ErrorKind::Storage,
            _ => ErrorKind::Other,
        }
    }

    /// True for errors the user should see as "could not load listings".
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Fetch | ErrorKind::ContractViolation
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failure() {
        let cases = [
            (Error::Fetch("connection reset".into()), "Fetch error: connection reset"),
            (
                Error::ContractViolation("missing data array".into()),
                "Contract violation: missing data array",
            ),
            (Error::Storage("disk full".into()), "Storage error: disk full"),
            (Error::NotFound("record 42".into()), "Not found: record 42"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::Fetch("x".into()).kind(), ErrorKind::Fetch);
        assert_eq!(Error::Request("x".into()).kind(), ErrorKind::Fetch);
        assert_eq!(
            Error::ContractViolation("x".into()).kind(),
            ErrorKind::ContractViolation
        );
        assert_eq!(Error::Storage("x".into()).kind(), ErrorKind::Storage);
        assert_eq!(
            Error::Database(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Storage
        );
        assert_eq!(Error::InvalidInput("x".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn test_is_load_failure() {
        assert!(Error::Fetch("x".into()).is_load_failure());
        assert!(Error::ContractViolation("x".into()).is_load_failure());
        assert!(!Error::Storage("x".into()).is_load_failure());
        assert!(!Error::NotFound("x".into()).is_load_failure());
    }

    #[test]
    fn test_bad_page_json_is_serialization() {
        let err: Error = serde_json::from_str::<Vec<u32>>("{\"data\":").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_value(ErrorKind::ContractViolation).unwrap();
        assert_eq!(json, "contract_violation");
    }

    #[test]
    fn test_error_crosses_tasks() {
        fn shareable<T: Send + Sync + 'static>() {}
        shareable::<Error>();
    }
}
