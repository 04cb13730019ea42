//! Error types for the aggregator.

use thiserror::Error;

/// Common error type for the aggregator.
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// Database error.
    ///
    /// Wraps any sqlx error that is not a uniqueness violation.
    #[error("database error: {0}")]
    Database(String),

    /// A unique constraint rejected the write.
    ///
    /// The ingester treats this as "already stored" rather than a failure.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed retrieval or decoding error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AggregatorError {
    /// Returns true if this error is a uniqueness violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AggregatorError::Duplicate(_))
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for AggregatorError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return AggregatorError::Duplicate(db_err.message().to_string());
            }
        }
        AggregatorError::Database(e.to_string())
    }
}

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, AggregatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AggregatorError::Auth("malformed authorization header".to_string());
        assert_eq!(
            err.to_string(),
            "authentication error: malformed authorization header"
        );
    }

    #[test]
    fn test_not_found_error_display() {
        let err = AggregatorError::NotFound("feed".to_string());
        assert_eq!(err.to_string(), "feed not found");
    }

    #[test]
    fn test_fetch_error_display() {
        let err = AggregatorError::Fetch("HTTP error: 503 Service Unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "fetch error: HTTP error: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_is_duplicate() {
        assert!(AggregatorError::Duplicate("posts.url".into()).is_duplicate());
        assert!(!AggregatorError::Database("locked".into()).is_duplicate());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AggregatorError = io_err.into();
        assert!(matches!(err, AggregatorError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_non_database_sqlx_error_conversion() {
        let err: AggregatorError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AggregatorError::Database(_)));
    }
}
