#![forbid(unsafe_code)]

//! vsvim core: the editor-independent pieces of the Vim emulation layer.
//!
//! # Crates
//! - [`lines`]: [`LineRange`] and [`VisitedLineRanges`] for incremental
//!   region scanning
//! - [`undo`]: [`UndoHistory`] with nested transactions, batched undo/redo
//!   and a per-context [`UndoHistoryRegistry`]
//!
//! Everything commonly needed is re-exported from [`prelude`].
//!
//! # Threading
//! Both components are single-owner and perform no locking. Undo histories
//! are `!Send`; keep each one on the thread that owns its editor.

pub use vsvim_lines as lines;
pub use vsvim_undo as undo;

pub use vsvim_lines::{LineRange, VisitedLineRanges};
pub use vsvim_undo::{
    CallbackPrimitive, ContextId, HistoryConfig, PrimitiveError, PrimitiveResult, SharedHistory,
    Subscription, TransactionId, TransactionScope, UndoError, UndoHistory, UndoHistoryRegistry,
    UndoHistoryState, UndoPrimitive, UndoRedoKind,
};

pub mod prelude {
    //! Convenience re-exports.

    pub use crate::lines::{LineRange, VisitedLineRanges};
    pub use crate::undo::{
        CallbackPrimitive, ContextId, UndoError, UndoHistory, UndoHistoryRegistry,
        UndoHistoryState, UndoPrimitive, UndoRedoKind,
    };
}
