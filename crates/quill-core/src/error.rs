// crates/quill-core/src/error.rs

use thiserror::Error;

use crate::validation::ValidationError;

/// Error type shared by every Quill crate.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Input failed its procedure's schema. Raised before any store access.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced identifier is absent from the store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A key already present in the store was inserted again.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No procedure is registered under the requested name.
    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),

    /// Storage layer error (lock poisoning).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QuillError {
    /// Stable machine-readable code used in the RPC error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            QuillError::Validation(_) => "VALIDATION_ERROR",
            QuillError::NotFound(_) => "NOT_FOUND",
            QuillError::Conflict(_) => "CONFLICT",
            QuillError::UnknownProcedure(_) => "UNKNOWN_PROCEDURE",
            QuillError::Storage(_) | QuillError::Serialization(_) => "INTERNAL",
        }
    }
}

impl From<serde_json::Error> for QuillError {
    fn from(e: serde_json::Error) -> Self {
        QuillError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Violation, ViolationKind};

    #[test]
    fn test_error_codes() {
        let validation = QuillError::from(ValidationError::new(vec![Violation::new(
            "title",
            ViolationKind::Missing,
        )]));
        assert_eq!(validation.code(), "VALIDATION_ERROR");
        assert_eq!(QuillError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(QuillError::Conflict("x".into()).code(), "CONFLICT");
        assert_eq!(
            QuillError::UnknownProcedure("x".into()).code(),
            "UNKNOWN_PROCEDURE"
        );
        assert_eq!(QuillError::Storage("x".into()).code(), "INTERNAL");
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let quill: QuillError = err.into();
        assert!(matches!(quill, QuillError::Serialization(_)));
    }
}
