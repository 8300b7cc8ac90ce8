//! Cross-cutting domain error types.

use thiserror::Error;

/// A malformed input supplied by the caller.
///
/// Always recoverable: the error is returned to the caller and never retried
/// automatically. Absence of a required reference argument is expressed
/// through the type system wherever possible, so `ValueIsRequired` only
/// appears where emptiness can be represented (strings, nil UUIDs).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value was empty or missing.
    #[error("value is required: {field}")]
    ValueIsRequired { field: &'static str },

    /// A value was present but outside its allowed range.
    #[error("value is invalid: {field}")]
    ValueIsInvalid { field: &'static str },

    /// A collection had fewer elements than the operation needs.
    #[error("collection is too small: need at least {min}, got {actual}")]
    CollectionIsTooSmall { min: usize, actual: usize },
}

/// A broken programming invariant, never expected under correct operation.
///
/// Orchestration treats this as fatal: it logs loudly, aborts the current
/// unit of work and makes no attempt at partial recovery. The public
/// aggregate API cannot produce one; only corrupted persisted state can.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("domain invariant violated: {message}")]
pub struct IntegrityViolation {
    pub message: String,
}

impl IntegrityViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
