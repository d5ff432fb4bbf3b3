#![forbid(unsafe_code)]

//! Observer registration for history events.
//!
//! Callbacks are stored as `Weak` references; the strong `Rc` lives inside
//! the [`Subscription`] guard returned to the caller. Dropping the guard
//! unsubscribes. Dead entries are pruned lazily on the next notification.
//!
//! # Failure Modes
//!
//! - **Re-entrant access**: a callback that borrows a
//!   [`SharedHistory`](crate::SharedHistory) while the history is being
//!   mutated panics on the `RefCell` borrow. Callbacks receive everything
//!   they are meant to know as the argument.

use std::fmt;
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Registration-ordered list of weakly held callbacks.
pub(crate) struct Subscribers<T: ?Sized> {
    callbacks: Vec<CallbackWeak<T>>,
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

impl<T: ?Sized + 'static> Subscribers<T> {
    pub(crate) fn subscribe(&mut self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.callbacks.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Call every live subscriber in registration order.
    pub(crate) fn notify(&mut self, value: &T) {
        self.callbacks.retain(|w| w.strong_count() > 0);
        let live: Vec<CallbackRc<T>> = self.callbacks.iter().filter_map(Weak::upgrade).collect();
        for callback in &live {
            callback(value);
        }
    }

    /// Registered callbacks, including dead ones not yet pruned.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

/// RAII guard for a registered callback.
///
/// The callback stays registered for as long as the guard is alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    /// Type-erased strong reference keeping the callback `Rc` alive.
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
