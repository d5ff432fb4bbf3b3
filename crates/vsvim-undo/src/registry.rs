#![forbid(unsafe_code)]

//! Registry mapping editing contexts to their undo histories.
//!
//! Each context (a text buffer, typically) is identified by a
//! [`ContextId`] issued at registration. The registry keeps one strong
//! reference to every registered history; components that work with a
//! history hold their own clone of the [`SharedHistory`]. Removing a
//! context drops only the registry's reference.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::HistoryConfig;
use crate::history::UndoHistory;

/// Undo history shared between the registry and its users.
pub type SharedHistory = Rc<RefCell<UndoHistory>>;

/// Stable key for a registered context. Never reused by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx{}", self.0)
    }
}

/// Owner of all undo histories, keyed by context.
pub struct UndoHistoryRegistry {
    histories: HashMap<ContextId, SharedHistory>,
    config: HistoryConfig,
    next_id: u64,
}

impl fmt::Debug for UndoHistoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHistoryRegistry")
            .field("contexts", &self.histories.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for UndoHistoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Histories created by [`register_history`](Self::register_history) use `config`.
    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            histories: HashMap::new(),
            config,
            next_id: 1,
        }
    }

    /// Create a fresh history and register it under a new context.
    pub fn register_history(&mut self) -> ContextId {
        let history = self.new_history();
        self.attach_history(history)
    }

    fn new_history(&self) -> SharedHistory {
        Rc::new(RefCell::new(UndoHistory::with_config(self.config.clone())))
    }

    /// Register an existing history under a new context.
    ///
    /// The same history may be attached to several contexts.
    pub fn attach_history(&mut self, history: SharedHistory) -> ContextId {
        let id = ContextId(self.next_id);
        self.next_id += 1;
        self.histories.insert(id, history);
        debug!(context = %id, contexts = self.histories.len(), "undo history registered");
        id
    }

    /// History of `context`, if still registered.
    #[must_use]
    pub fn get(&self, context: ContextId) -> Option<SharedHistory> {
        self.histories.get(&context).cloned()
    }

    /// History of `context`, registering a new one if `context` is `None`
    /// or no longer registered.
    pub fn get_or_register(&mut self, context: Option<ContextId>) -> (ContextId, SharedHistory) {
        if let Some((id, history)) =
            context.and_then(|id| self.histories.get(&id).map(|h| (id, Rc::clone(h))))
        {
            return (id, history);
        }
        let history = self.new_history();
        let id = self.attach_history(Rc::clone(&history));
        (id, history)
    }

    #[must_use]
    pub fn contains(&self, context: ContextId) -> bool {
        self.histories.contains_key(&context)
    }

    /// Evict `context`, returning the registry's reference to its history.
    pub fn remove(&mut self, context: ContextId) -> Option<SharedHistory> {
        let removed = self.histories.remove(&context);
        if removed.is_some() {
            debug!(context = %context, "undo history removed");
        }
        removed
    }

    /// Evict every context registered for `history`.
    ///
    /// Returns the evicted contexts in ascending order.
    pub fn remove_history(&mut self, history: &SharedHistory) -> Vec<ContextId> {
        let mut evicted: Vec<ContextId> = self
            .histories
            .iter()
            .filter(|(_, h)| Rc::ptr_eq(h, history))
            .map(|(id, _)| *id)
            .collect();
        evicted.sort_unstable();
        for id in &evicted {
            self.histories.remove(id);
        }
        debug!(evicted = evicted.len(), "undo history detached");
        evicted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_issues_distinct_ids() {
        let mut registry = UndoHistoryRegistry::new();
        let a = registry.register_history();
        let b = registry.register_history();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(!Rc::ptr_eq(&registry.get(a).unwrap(), &registry.get(b).unwrap()));
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut registry = UndoHistoryRegistry::new();
        let a = registry.register_history();
        registry.remove(a).unwrap();
        let b = registry.register_history();
        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
    }

    #[test]
    fn removed_history_outlives_registry_entry() {
        let mut registry = UndoHistoryRegistry::new();
        let ctx = registry.register_history();
        let held = registry.get(ctx).unwrap();
        registry.remove(ctx);
        assert!(!registry.contains(ctx));

        let id = held.borrow_mut().create_transaction("still usable");
        held.borrow_mut().complete(id);
        assert_eq!(held.borrow().undo_depth(), 1);
    }

    #[test]
    fn registered_histories_use_registry_config() {
        let mut registry = UndoHistoryRegistry::with_config(HistoryConfig::new(4));
        let ctx = registry.register_history();
        assert_eq!(registry.get(ctx).unwrap().borrow().config().max_depth, 4);
    }

    #[test]
    fn get_or_register() {
        let mut registry = UndoHistoryRegistry::new();
        let (first, history) = registry.get_or_register(None);
        let (again, same) = registry.get_or_register(Some(first));
        assert_eq!(first, again);
        assert!(Rc::ptr_eq(&history, &same));

        registry.remove(first);
        let (fresh, _) = registry.get_or_register(Some(first));
        assert_ne!(fresh, first);
    }

    #[test]
    fn remove_history_evicts_all_its_contexts() {
        let mut registry = UndoHistoryRegistry::new();
        let shared: SharedHistory = Rc::new(RefCell::new(UndoHistory::new()));
        let a = registry.attach_history(Rc::clone(&shared));
        let other = registry.register_history();
        let b = registry.attach_history(Rc::clone(&shared));

        assert_eq!(registry.remove_history(&shared), vec![a, b]);
        assert!(registry.contains(other));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn context_display() {
        let mut registry = UndoHistoryRegistry::new();
        let ctx = registry.register_history();
        assert_eq!(ctx.to_string(), format!("ctx{}", ctx.raw()));
    }
}
