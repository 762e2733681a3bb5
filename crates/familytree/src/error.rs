//! Error types for family tree operations.
//!
//! Only edit operations on missing persons and malformed input documents are
//! errors. Field validation problems are reported as data through
//! [`ValidationErrors`](crate::person::ValidationErrors), and dangling references
//! are tolerated everywhere.

use thiserror::Error;

/// Result type alias for family tree operations.
pub type Result<T> = std::result::Result<T, FamilyTreeError>;

/// Error type for all fallible family tree operations.
#[derive(Error, Debug)]
pub enum FamilyTreeError {
    /// Person not found in the graph
    #[error("Person not found: {person_id}")]
    PersonNotFound {
        /// ID of the missing person
        person_id: String,
    },

    /// Invalid operation (e.g., making a person their own parent)
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong
        message: String,
    },

    /// Input document could not be parsed
    #[error("Parse error: {message}")]
    Parse {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization error while producing output
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A date string that is neither `YYYY` nor `YYYY-MM-DD`
    #[error("Invalid date '{value}': expected YYYY or YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },
}

impl FamilyTreeError {
    /// Create a parse error from a message and optional source.
    pub fn parse<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    pub(crate) fn not_found(person_id: &str) -> Self {
        Self::PersonNotFound {
            person_id: person_id.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
