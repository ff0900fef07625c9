//! # Error Types
//!
//! Errors raised by the core primitives. Validation verdicts are never
//! errors: they are reported through [`crate::ValidationResult`].

use thiserror::Error;

/// Error raised when parsing core primitives from strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The string does not name one of the five entity kinds.
    #[error("unknown entity kind: {0:?}")]
    UnknownEntityKind(String),
}
