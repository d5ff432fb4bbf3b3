#![forbid(unsafe_code)]

//! Undo history with nested transactions.
//!
//! [`UndoHistory`] owns three disjoint collections:
//!
//! - the **open stack** of transactions still accepting primitives
//! - the **undo stack** of completed top-level transactions (newest at back)
//! - the **redo stack** of undone transactions (newest at back)
//!
//! # Invariants
//!
//! 1. `state() != Idle` only while `undo`/`redo` is running; it is restored
//!    on every exit path, including a failing or panicking primitive.
//! 2. Only the top of the open stack can be completed or cancelled; closing
//!    any other id is a no-op.
//! 3. A nested transaction never reaches the undo stack on its own: its
//!    primitives are appended to the parent on completion.
//! 4. `undo_stack.len() <= config.max_depth` after every push.
//!
//! # Redo after a fresh edit
//!
//! Completing a new top-level transaction does **not** clear the redo
//! stack. Callers that want the usual "new edit drops redo" behavior clear
//! it themselves with [`UndoHistory::clear`] between edits.
//!
//! ```text
//! complete(T3)
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [T1, T2, T3]                      │
//! │ Redo Stack: []                                │
//! └───────────────────────────────────────────────┘
//!
//! undo(2)
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [T1]                              │
//! │ Redo Stack: [T3, T2]                          │
//! └───────────────────────────────────────────────┘
//!
//! complete(T4)  <-- redo stack kept
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [T1, T4]                          │
//! │ Redo Stack: [T3, T2]                          │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency
//!
//! Single owner, single thread. The history is `!Send` (primitives are
//! boxed without a `Send` bound) and performs no locking.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, debug_span, trace, warn};
use web_time::Instant;

use crate::config::HistoryConfig;
use crate::error::UndoError;
use crate::notify::{Subscribers, Subscription};
use crate::primitive::UndoPrimitive;
use crate::transaction::{TransactionId, TransactionScope, TransactionState, UndoTransaction};

/// What the history is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndoHistoryState {
    #[default]
    Idle,
    /// Inside [`UndoHistory::undo`].
    Undoing,
    /// Inside [`UndoHistory::redo`].
    Redoing,
}

/// Kind of batch reported to undo/redo subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoRedoKind {
    Undo,
    Redo,
}

impl UndoRedoKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    const fn active_state(self) -> UndoHistoryState {
        match self {
            Self::Undo => UndoHistoryState::Undoing,
            Self::Redo => UndoHistoryState::Redoing,
        }
    }

    /// State of a transaction after it moved to the other stack.
    const fn landed_state(self) -> TransactionState {
        match self {
            Self::Undo => TransactionState::Undone,
            Self::Redo => TransactionState::Completed,
        }
    }
}

/// Puts the history back to `Idle` when dropped.
struct StateGuard<'a> {
    state: &'a mut UndoHistoryState,
}

impl<'a> StateGuard<'a> {
    fn enter(state: &'a mut UndoHistoryState, active: UndoHistoryState) -> Self {
        *state = active;
        Self { state }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state = UndoHistoryState::Idle;
    }
}

/// Undo/redo history for one logical editing context.
pub struct UndoHistory {
    /// Transactions still accepting primitives (innermost at back).
    open: Vec<UndoTransaction>,
    /// Completed transactions (newest at back).
    undo_stack: VecDeque<UndoTransaction>,
    /// Undone transactions (newest at back).
    redo_stack: VecDeque<UndoTransaction>,
    state: UndoHistoryState,
    config: HistoryConfig,
    next_id: u64,
    undo_redo_subscribers: Subscribers<UndoRedoKind>,
    completed_subscribers: Subscribers<str>,
}

impl fmt::Debug for UndoHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHistory")
            .field("state", &self.state)
            .field("open_depth", &self.open.len())
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Create an empty history with an unbounded undo stack.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            open: Vec::new(),
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            state: UndoHistoryState::Idle,
            config,
            next_id: 1,
            undo_redo_subscribers: Subscribers::default(),
            completed_subscribers: Subscribers::default(),
        }
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Open a new transaction on top of the open stack.
    ///
    /// If another transaction is open, the new one is nested inside it.
    pub fn create_transaction(&mut self, description: impl Into<String>) -> TransactionId {
        let id = TransactionId::new(self.next_id);
        self.next_id += 1;
        let txn = UndoTransaction::new(id, description.into());
        debug!(
            %id,
            description = txn.description(),
            depth = self.open.len() + 1,
            "transaction opened"
        );
        self.open.push(txn);
        id
    }

    /// Open a transaction wrapped in an RAII [`TransactionScope`].
    pub fn scope(&mut self, description: impl Into<String>) -> TransactionScope<'_> {
        TransactionScope::open(self, description)
    }

    /// Append a primitive to the open transaction `id`.
    ///
    /// The primitive is assumed to have been applied already.
    pub fn add_primitive(
        &mut self,
        id: TransactionId,
        primitive: Box<dyn UndoPrimitive>,
    ) -> Result<(), UndoError> {
        let txn = self
            .open
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(UndoError::TransactionNotOpen(id))?;
        trace!(%id, primitive = primitive.description(), "primitive recorded");
        txn.push(primitive);
        Ok(())
    }

    /// Complete transaction `id`.
    ///
    /// A top-level transaction moves to the undo stack; a nested one is
    /// merged into its parent. Does nothing unless `id` is the top of the
    /// open stack.
    pub fn complete(&mut self, id: TransactionId) {
        let Some(mut txn) = self.pop_open(id) else {
            return;
        };

        if let Some(parent) = self.open.last_mut() {
            debug!(
                %id,
                parent = %parent.id(),
                primitives = txn.len(),
                "nested transaction merged into parent"
            );
            parent.absorb(txn);
            return;
        }

        txn.state = TransactionState::Completed;
        debug!(%id, primitives = txn.len(), "transaction completed");
        self.completed_subscribers.notify(txn.description());
        self.undo_stack.push_back(txn);
        self.enforce_depth();
    }

    /// Cancel transaction `id`, discarding its primitives.
    ///
    /// Does nothing unless `id` is the top of the open stack.
    pub fn cancel(&mut self, id: TransactionId) {
        if let Some(txn) = self.pop_open(id) {
            debug!(%id, discarded = txn.len(), "transaction cancelled");
        }
    }

    fn pop_open(&mut self, id: TransactionId) -> Option<UndoTransaction> {
        if self.current_transaction() != Some(id) {
            trace!(%id, "close ignored: not the innermost open transaction");
            return None;
        }
        self.open.pop()
    }

    // ========================================================================
    // Undo / Redo
    // ========================================================================

    /// Undo up to `count` transactions, newest first.
    ///
    /// Each transaction's primitives are reverted last-recorded first. A
    /// failing primitive aborts the batch and leaves its transaction on the
    /// undo stack; earlier transactions of the batch stay undone.
    pub fn undo(&mut self, count: usize) -> Result<(), UndoError> {
        self.run_batch(UndoRedoKind::Undo, count)
    }

    /// Redo up to `count` transactions, most recently undone first.
    pub fn redo(&mut self, count: usize) -> Result<(), UndoError> {
        self.run_batch(UndoRedoKind::Redo, count)
    }

    fn run_batch(&mut self, kind: UndoRedoKind, count: usize) -> Result<(), UndoError> {
        let start = Instant::now();
        let (source, target) = match kind {
            UndoRedoKind::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            UndoRedoKind::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };
        let requested = count;
        let count = count.min(source.len());
        let _span = debug_span!(
            "undo.batch",
            kind = kind.as_str(),
            requested,
            performed = count,
            duration_us = tracing::field::Empty
        )
        .entered();

        let outcome = {
            let _guard = StateGuard::enter(&mut self.state, kind.active_state());
            let mut outcome = Ok(());
            for _ in 0..count {
                let Some(top) = source.back_mut() else {
                    break;
                };
                let result = match kind {
                    UndoRedoKind::Undo => top.undo_primitives(),
                    UndoRedoKind::Redo => top.redo_primitives(),
                };
                if let Err(source_err) = result {
                    warn!(
                        kind = kind.as_str(),
                        transaction = top.description(),
                        error = %source_err,
                        "primitive failed, batch aborted"
                    );
                    outcome = Err(UndoError::Primitive {
                        transaction: top.description().to_string(),
                        source: source_err,
                    });
                    break;
                }
                if let Some(mut txn) = source.pop_back() {
                    txn.state = kind.landed_state();
                    target.push_back(txn);
                }
            }
            outcome
        };

        // A partial redo may already have grown the undo stack.
        self.enforce_depth();
        outcome?;

        let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        tracing::Span::current().record("duration_us", duration_us);
        debug!(kind = kind.as_str(), count, duration_us, "batch finished");

        self.undo_redo_subscribers.notify(&kind);
        Ok(())
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> UndoHistoryState {
        self.state
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Number of open (possibly nested) transactions.
    #[must_use]
    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    /// Innermost open transaction.
    #[must_use]
    pub fn current_transaction(&self) -> Option<TransactionId> {
        self.open.last().map(UndoTransaction::id)
    }

    /// Description of an open transaction.
    #[must_use]
    pub fn transaction_description(&self, id: TransactionId) -> Option<&str> {
        self.open
            .iter()
            .find(|t| t.id() == id)
            .map(UndoTransaction::description)
    }

    /// Description of the transaction the next `undo(1)` reverts.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(UndoTransaction::description)
    }

    /// Description of the transaction the next `redo(1)` re-applies.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(UndoTransaction::description)
    }

    /// Descriptions on the undo stack, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(UndoTransaction::description)
            .collect()
    }

    /// Most recently completed transaction.
    #[must_use]
    pub fn last_undo_transaction(&self) -> Option<&UndoTransaction> {
        self.undo_stack.back()
    }

    /// Not supported: redo entries are not exposed.
    pub fn last_redo_transaction(&self) -> Result<&UndoTransaction, UndoError> {
        Err(UndoError::Unsupported("last redo transaction"))
    }

    /// Not supported: the raw undo stack is not exposed.
    pub fn undo_stack(&self) -> Result<Vec<&UndoTransaction>, UndoError> {
        Err(UndoError::Unsupported("enumerating the undo stack"))
    }

    /// Not supported: the raw redo stack is not exposed.
    pub fn redo_stack(&self) -> Result<Vec<&UndoTransaction>, UndoError> {
        Err(UndoError::Unsupported("enumerating the redo stack"))
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Call `callback` once after every successful `undo`/`redo` batch.
    pub fn on_undo_redo(&mut self, callback: impl Fn(&UndoRedoKind) + 'static) -> Subscription {
        self.undo_redo_subscribers.subscribe(callback)
    }

    /// Call `callback` with the description of each top-level transaction
    /// that lands on the undo stack.
    pub fn on_transaction_completed(&mut self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.completed_subscribers.subscribe(callback)
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Drop both stacks.
    ///
    /// Fails with [`UndoError::InvalidState`] while a transaction is open or
    /// a batch is running.
    pub fn clear(&mut self) -> Result<(), UndoError> {
        if self.state != UndoHistoryState::Idle {
            return Err(UndoError::InvalidState("cannot clear during undo or redo"));
        }
        if !self.open.is_empty() {
            return Err(UndoError::InvalidState(
                "cannot clear while a transaction is open",
            ));
        }
        debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history cleared"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    /// Evict the oldest undo entries beyond `max_depth`.
    fn enforce_depth(&mut self) {
        while self.undo_stack.len() > self.config.max_depth {
            if let Some(evicted) = self.undo_stack.pop_front() {
                debug!(id = %evicted.id(), "oldest transaction evicted");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
