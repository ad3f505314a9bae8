//! Error types for the datasweep cleaning pipeline

use thiserror::Error;

/// Result type alias for datasweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Main error type for the cleaning pipeline
#[derive(Error, Debug)]
pub enum SweepError {
    /// The input file or table is unusable; the pipeline never runs.
    #[error("Input error: {0}")]
    Input(String),

    /// An internal data operation failed.
    #[error("Data error: {0}")]
    Data(String),

    /// A requested operation cannot be meaningfully applied. The whole run
    /// fails rather than producing a degenerate result.
    #[error("Quality error: {operation} cannot be applied: {reason}")]
    Quality { operation: String, reason: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SweepError {
    /// Shorthand for a quality error on a named operation.
    pub fn quality(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        SweepError::Quality {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for SweepError {
    fn from(err: polars::error::PolarsError) -> Self {
        SweepError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SweepError::Input("missing header row".to_string());
        assert_eq!(err.to_string(), "Input error: missing header row");
    }

    #[test]
    fn test_quality_error_names_operation() {
        let err = SweepError::quality("fill-mean", "column 'age' has no non-missing values");
        let msg = err.to_string();
        assert!(msg.contains("fill-mean"));
        assert!(msg.contains("age"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SweepError = json_err.into();
        assert!(matches!(err, SweepError::Serialization(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SweepError = io_err.into();
        assert!(matches!(err, SweepError::Io(_)));
    }
}
