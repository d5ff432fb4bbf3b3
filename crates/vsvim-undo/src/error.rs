#![forbid(unsafe_code)]

//! Error types for the undo history.

use thiserror::Error;

use crate::transaction::TransactionId;

/// Result of applying or reverting a single primitive.
pub type PrimitiveResult = Result<(), PrimitiveError>;

/// Failure reported by an [`UndoPrimitive`](crate::UndoPrimitive).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The edit could not be applied.
    #[error("{0}")]
    Failed(String),
    /// The target changed since the primitive was recorded.
    #[error("state drift: expected '{expected}', got '{actual}'")]
    StateDrift { expected: String, actual: String },
}

/// Errors surfaced by [`UndoHistory`](crate::UndoHistory).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    /// The operation is illegal in the history's current state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// The accessor is intentionally not implemented.
    #[error("not supported: {0}")]
    Unsupported(&'static str),
    /// The transaction is not on the open-transaction stack.
    #[error("transaction {0} is not open")]
    TransactionNotOpen(TransactionId),
    /// A primitive failed while undoing or redoing a transaction.
    #[error("primitive in transaction '{transaction}' failed: {source}")]
    Primitive {
        transaction: String,
        #[source]
        source: PrimitiveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = UndoError::InvalidState("open transaction");
        assert_eq!(err.to_string(), "invalid state: open transaction");

        let err = UndoError::TransactionNotOpen(TransactionId::new(7));
        assert!(err.to_string().contains('7'));

        let err = UndoError::Primitive {
            transaction: "Insert".into(),
            source: PrimitiveError::StateDrift {
                expected: "a".into(),
                actual: "b".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("Insert"));
        assert!(msg.contains("expected 'a'"));
    }

    #[test]
    fn primitive_error_is_source() {
        use std::error::Error as _;
        let err = UndoError::Primitive {
            transaction: "t".into(),
            source: PrimitiveError::Failed("boom".into()),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".into()));
    }
}
