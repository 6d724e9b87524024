//! Error types for the decision engine.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all engine operations.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Slot not found for the given ID
    #[error("Slot with ID {id} not found")]
    SlotNotFound { id: u64 },
    /// The slot no longer accepts ballots
    #[error("Voting is closed for slot {slot_id}")]
    VotingClosed { slot_id: u64 },
    /// A ballot referenced an option that is not competing in the slot
    #[error("Unknown option {option_id} for slot {slot_id}")]
    UnknownOption { option_id: u64, slot_id: u64 },
    /// A ballot submission carried no rankings
    #[error("No rankings supplied")]
    NoRankings,
    /// A slot has no options to choose a winner from
    #[error("Slot {slot_id} has no options to resolve")]
    NoOptions { slot_id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Event publication errors
    #[error("Failed to publish event: {message}")]
    Publish { message: String },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TallyError {
        TallyError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TallyError {
        TallyError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TallyError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a blocking task join failure.
    pub(crate) fn join(e: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {e}"),
        }
    }

    /// Whether this error is a caller mistake that should be reported back
    /// rather than treated as a fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::VotingClosed { .. }
                | Self::UnknownOption { .. }
                | Self::NoRankings
                | Self::InvalidInput { .. }
        )
    }

    /// Whether the referenced record was missing. The record may appear
    /// later (e.g. a replica catching up), so callers may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PlanNotFound { .. } | Self::SlotNotFound { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TallyError::database(message).with_source(e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(TallyError::NoRankings.is_validation());
        assert!(TallyError::VotingClosed { slot_id: 1 }.is_validation());
        assert!(TallyError::UnknownOption {
            option_id: 9,
            slot_id: 1
        }
        .is_validation());
        assert!(TallyError::invalid_input("rank").with_reason("bad").is_validation());
        assert!(!TallyError::NoOptions { slot_id: 1 }.is_validation());
        assert!(!TallyError::Publish {
            message: "down".into()
        }
        .is_validation());
    }

    #[test]
    fn test_not_found_is_retryable() {
        assert!(TallyError::SlotNotFound { id: 3 }.is_retryable());
        assert!(TallyError::PlanNotFound { id: 3 }.is_retryable());
        assert!(!TallyError::NoRankings.is_retryable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TallyError::VotingClosed { slot_id: 4 }.to_string(),
            "Voting is closed for slot 4"
        );
        assert_eq!(
            TallyError::UnknownOption {
                option_id: 12,
                slot_id: 4
            }
            .to_string(),
            "Unknown option 12 for slot 4"
        );
        let err = TallyError::database("Failed to open")
            .with_source(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().starts_with("Database error: Failed to open"));
    }
}
