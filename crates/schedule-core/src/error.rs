//! Error types for SmartSchedule.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for schedule operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A request field could not be coerced to the expected type.
    #[error("Invalid value for field `{field}`: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// The request payload as a whole is unusable.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// No lesson carries the requested id.
    #[error("Lesson not found: {id}")]
    LessonNotFound {
        /// The requested lesson id.
        id: i64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the caller sent something we cannot accept.
    ///
    /// Client errors map to 4xx responses; everything else is a storage
    /// failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidField { .. } | Self::InvalidRequest { .. } | Self::LessonNotFound { .. }
        )
    }

    /// Returns `true` if this error is a missing lesson.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LessonNotFound { .. })
    }

    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::invalid_field("time_slot", "not a number").is_client_error());
        assert!(Error::invalid_request("body is not an object").is_client_error());
        assert!(Error::LessonNotFound { id: 7 }.is_client_error());

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!io.is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid_field("time_slot", "expected an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value for field `time_slot`: expected an integer"
        );
        assert!(Error::LessonNotFound { id: 999 }.is_not_found());
    }
}
