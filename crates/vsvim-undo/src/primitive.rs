#![forbid(unsafe_code)]

//! Reversible units of edit work.
//!
//! An [`UndoPrimitive`] is the smallest thing a transaction records: one
//! edit that knows how to apply itself again and how to revert itself.
//! The history never inspects what a primitive does.
//!
//! # Invariants
//!
//! - `undo()` after the edit was applied restores the prior state exactly
//! - `redo()` after `undo()` restores the edited state exactly
//!
//! Primitives are recorded *after* the edit happened, so the first call the
//! history makes on a fresh primitive is always `undo()`.

use std::fmt;

use crate::error::{PrimitiveError, PrimitiveResult};

/// A reversible edit recorded inside a transaction.
pub trait UndoPrimitive {
    /// Apply the edit (again).
    fn redo(&mut self) -> PrimitiveResult;

    /// Revert the edit.
    fn undo(&mut self) -> PrimitiveResult;

    /// Human-readable description, used in logs.
    fn description(&self) -> &str {
        "primitive"
    }

    fn debug_name(&self) -> &'static str {
        "UndoPrimitive"
    }
}

impl fmt::Debug for dyn UndoPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.debug_name())
            .field("description", &self.description())
            .finish()
    }
}

/// Callback type for one direction of a [`CallbackPrimitive`].
pub type PrimitiveFn = Box<dyn FnMut() -> PrimitiveResult>;

/// Primitive whose two directions are supplied as closures.
///
/// Editor code that cannot hand out references to its buffer captures a
/// shared handle in the closures instead.
pub struct CallbackPrimitive {
    description: String,
    redo: Option<PrimitiveFn>,
    undo: Option<PrimitiveFn>,
}

impl fmt::Debug for CallbackPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackPrimitive")
            .field("description", &self.description)
            .field("has_redo", &self.redo.is_some())
            .field("has_undo", &self.undo.is_some())
            .finish()
    }
}

impl CallbackPrimitive {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            redo: None,
            undo: None,
        }
    }

    /// Set the forward callback.
    #[must_use]
    pub fn with_redo<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> PrimitiveResult + 'static,
    {
        self.redo = Some(Box::new(f));
        self
    }

    /// Set the reverting callback.
    #[must_use]
    pub fn with_undo<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> PrimitiveResult + 'static,
    {
        self.undo = Some(Box::new(f));
        self
    }
}

impl UndoPrimitive for CallbackPrimitive {
    fn redo(&mut self) -> PrimitiveResult {
        match self.redo.as_mut() {
            Some(redo) => redo(),
            None => Err(PrimitiveError::Failed("no redo callback set".to_string())),
        }
    }

    fn undo(&mut self) -> PrimitiveResult {
        match self.undo.as_mut() {
            Some(undo) => undo(),
            None => Err(PrimitiveError::Failed("no undo callback set".to_string())),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn debug_name(&self) -> &'static str {
        "CallbackPrimitive"
    }
}
