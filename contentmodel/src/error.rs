//! Error types for format operations
//!
//! Building and serializing a content model never fails; malformed input
//! degrades to a best-effort model instead. These errors cover the fallible
//! edges around the core: format lookup, text encodings and position parsing.

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// A tree position could not be parsed
    #[error("Invalid position '{0}': expected PATH:OFFSET, e.g. 0/2:5")]
    InvalidPosition(String),
}
