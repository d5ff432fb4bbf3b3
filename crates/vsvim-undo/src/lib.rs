#![forbid(unsafe_code)]

//! Undo/redo transaction history.
//!
//! This crate records reversible edits for a modal editing layer:
//!
//! - **Primitives**: single reversible edits ([`UndoPrimitive`])
//! - **Transactions**: named batches of primitives undone as one unit; a
//!   transaction opened while another is open nests inside it and is
//!   merged into the parent on completion
//! - **History**: undo and redo stacks with batched `undo(count)` /
//!   `redo(count)` and a `Idle | Undoing | Redoing` state machine
//! - **Registry**: one history per editing context, keyed by [`ContextId`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UndoHistory                               │
//! │  open stack: [outer, inner]   (complete(inner) merges into outer)│
//! │  ┌──────────────────┐          ┌──────────────────┐             │
//! │  │   Undo Stack     │          │   Redo Stack     │             │
//! │  │  ┌────────────┐  │ undo(n)  │  ┌────────────┐  │             │
//! │  │  │ TxnN       │  │ ──────►  │  │ Txn1       │  │             │
//! │  │  ├────────────┤  │          │  ├────────────┤  │             │
//! │  │  │ Txn1       │  │  ◄────── │  │ TxnN       │  │             │
//! │  │  └────────────┘  │ redo(n)  │  └────────────┘  │             │
//! │  └──────────────────┘          └──────────────────┘             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use vsvim_undo::{CallbackPrimitive, UndoHistory};
//!
//! let mut history = UndoHistory::new();
//! let id = history.create_transaction("Insert text");
//! history
//!     .add_primitive(id, Box::new(CallbackPrimitive::new("insert").with_undo(|| Ok(())).with_redo(|| Ok(()))))
//!     .unwrap();
//! history.complete(id);
//!
//! history.undo(1).unwrap();
//! assert!(history.can_redo());
//! ```
//!
//! # Logging
//!
//! Events go through `tracing`: transaction lifecycle at `debug`, primitive
//! recording at `trace`, failed primitives at `warn`. Every batch runs in an
//! `undo.batch` span. Installing a subscriber is left to the application.

pub mod config;
pub mod error;
pub mod history;
pub mod notify;
pub mod primitive;
pub mod registry;
pub mod transaction;

pub use config::{ConfigError, HistoryConfig};
pub use error::{PrimitiveError, PrimitiveResult, UndoError};
pub use history::{UndoHistory, UndoHistoryState, UndoRedoKind};
pub use notify::Subscription;
pub use primitive::{CallbackPrimitive, PrimitiveFn, UndoPrimitive};
pub use registry::{ContextId, SharedHistory, UndoHistoryRegistry};
pub use transaction::{TransactionId, TransactionScope, TransactionState, UndoTransaction};

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn lifecycle_is_logged() {
        let mut history = UndoHistory::new();
        let id = history.create_transaction("logged");
        history.complete(id);
        history.undo(1).unwrap();

        assert!(logs_contain("transaction opened"));
        assert!(logs_contain("transaction completed"));
        assert!(logs_contain("batch finished"));
    }

    #[test]
    #[traced_test]
    fn primitive_failure_is_warned() {
        let mut history = UndoHistory::new();
        let id = history.create_transaction("fragile");
        history
            .add_primitive(
                id,
                Box::new(
                    CallbackPrimitive::new("p")
                        .with_undo(|| Err(PrimitiveError::Failed("disk gone".into()))),
                ),
            )
            .unwrap();
        history.complete(id);

        assert!(history.undo(1).is_err());
        assert!(logs_contain("primitive failed, batch aborted"));
        assert!(logs_contain("disk gone"));
    }
}
