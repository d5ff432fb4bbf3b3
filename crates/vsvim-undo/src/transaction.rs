#![forbid(unsafe_code)]

//! Transactions: ordered, named batches of primitives.
//!
//! A transaction is created by [`UndoHistory::create_transaction`] and
//! stays *open* on the history's open-transaction stack until it is
//! completed or cancelled through the history. Opening a transaction while
//! another one is open nests it:
//!
//! ```text
//! create("outer")  add(P1)  create("inner")  add(P2)  complete(inner)  complete(outer)
//!
//! open stack:  [outer{P1}] -> [outer{P1}, inner{P2}] -> [outer{P1, P2}] -> []
//! undo stack:  []                                                         [outer{P1, P2}]
//! ```
//!
//! [`TransactionScope`] wraps the same calls in an RAII guard: a scope that
//! is dropped without [`TransactionScope::complete`] is cancelled.

use std::fmt;

use crate::error::{PrimitiveResult, UndoError};
use crate::history::UndoHistory;
use crate::primitive::UndoPrimitive;

/// Identifier handed out by [`UndoHistory::create_transaction`].
///
/// Ids are unique within one history and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(u64);

impl TransactionId {
    /// Create an id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle position of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// On the open-transaction stack, accepting primitives.
    #[default]
    Open,
    /// On the undo stack.
    Completed,
    /// On the redo stack.
    Undone,
}

/// A named sequence of primitives, undone and redone as one unit.
pub struct UndoTransaction {
    id: TransactionId,
    description: String,
    /// Primitives in application order.
    primitives: Vec<Box<dyn UndoPrimitive>>,
    pub(crate) state: TransactionState,
}

impl fmt::Debug for UndoTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoTransaction")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("primitives", &self.primitives.len())
            .field("state", &self.state)
            .finish()
    }
}

impl UndoTransaction {
    pub(crate) fn new(id: TransactionId, description: String) -> Self {
        Self {
            id,
            description,
            primitives: Vec::new(),
            state: TransactionState::Open,
        }
    }

    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Description exactly as passed to `create_transaction`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Number of recorded primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Descriptions of the recorded primitives, in application order.
    pub fn primitive_descriptions(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().map(|p| p.description())
    }

    pub(crate) fn push(&mut self, primitive: Box<dyn UndoPrimitive>) {
        self.primitives.push(primitive);
    }

    /// Append a closed child's primitives after ours, keeping their order.
    pub(crate) fn absorb(&mut self, child: UndoTransaction) {
        self.primitives.extend(child.primitives);
    }

    /// Revert every primitive, last recorded first.
    ///
    /// Stops at the first failure; primitives after it in reverse order
    /// are left untouched.
    pub(crate) fn undo_primitives(&mut self) -> PrimitiveResult {
        for primitive in self.primitives.iter_mut().rev() {
            primitive.undo()?;
        }
        Ok(())
    }

    /// Re-apply every primitive in recorded order.
    pub(crate) fn redo_primitives(&mut self) -> PrimitiveResult {
        for primitive in &mut self.primitives {
            primitive.redo()?;
        }
        Ok(())
    }
}

/// RAII scope around an open transaction.
///
/// Dropping the scope without calling [`complete`](Self::complete) cancels
/// the transaction. Closing is routed through the owning history, so a
/// scope whose transaction was already closed by id does nothing on drop.
pub struct TransactionScope<'a> {
    history: &'a mut UndoHistory,
    id: TransactionId,
    closed: bool,
}

impl fmt::Debug for TransactionScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionScope")
            .field("id", &self.id)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<'a> TransactionScope<'a> {
    pub(crate) fn open(history: &'a mut UndoHistory, description: impl Into<String>) -> Self {
        let id = history.create_transaction(description);
        Self {
            history,
            id,
            closed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Read access to the owning history.
    #[must_use]
    pub fn history(&self) -> &UndoHistory {
        &*self.history
    }

    /// Record a primitive in this transaction.
    pub fn add<P>(&mut self, primitive: P) -> Result<(), UndoError>
    where
        P: UndoPrimitive + 'static,
    {
        self.add_boxed(Box::new(primitive))
    }

    pub fn add_boxed(&mut self, primitive: Box<dyn UndoPrimitive>) -> Result<(), UndoError> {
        self.history.add_primitive(self.id, primitive)
    }

    /// Open a transaction nested inside this one.
    ///
    /// The parent scope is borrowed until the child is closed, which keeps
    /// the child on top of the open stack for its whole lifetime.
    pub fn nested(&mut self, description: impl Into<String>) -> TransactionScope<'_> {
        TransactionScope::open(self.history, description)
    }

    /// Complete the transaction: merge into the parent or push onto the undo stack.
    pub fn complete(mut self) {
        self.closed = true;
        self.history.complete(self.id);
    }

    /// Cancel the transaction, discarding its primitives.
    pub fn cancel(mut self) {
        self.closed = true;
        self.history.cancel(self.id);
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.history.cancel(self.id);
        }
    }
}
