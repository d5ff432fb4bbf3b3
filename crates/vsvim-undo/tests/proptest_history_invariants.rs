#![forbid(unsafe_code)]

//! Property tests for [`UndoHistory`] invariants.
//!
//! The document is a `Vec<u32>`; every primitive appends one value when it
//! is applied and pops it (checking the value) when reverted.
//!
//! Validates:
//! - The document always equals the concatenation of the undo stack,
//!   bottom to top, for any interleaving of edits, undo and redo.
//! - Nested transactions never add undo entries of their own.
//! - Cancelled transactions never run a primitive.
//! - The history is `Idle` after every call.
//! - Undo everything then redo everything restores the document.

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use vsvim_undo::{
    CallbackPrimitive, PrimitiveError, TransactionId, UndoHistory, UndoHistoryState,
};

type Doc = Rc<RefCell<Vec<u32>>>;

// ============================================================================
// Primitive helpers
// ============================================================================

fn append(doc: &Doc, value: u32) -> CallbackPrimitive {
    let on_redo = Rc::clone(doc);
    let on_undo = Rc::clone(doc);
    CallbackPrimitive::new(format!("append {value}"))
        .with_redo(move || {
            on_redo.borrow_mut().push(value);
            Ok(())
        })
        .with_undo(move || match on_undo.borrow_mut().pop() {
            Some(last) if last == value => Ok(()),
            other => Err(PrimitiveError::StateDrift {
                expected: value.to_string(),
                actual: format!("{other:?}"),
            }),
        })
}

fn untouchable() -> CallbackPrimitive {
    CallbackPrimitive::new("cancelled")
        .with_redo(|| panic!("cancelled primitive re-applied"))
        .with_undo(|| panic!("cancelled primitive reverted"))
}

/// Apply `value` to the document and record it in `id`.
fn record(history: &mut UndoHistory, id: TransactionId, doc: &Doc, value: u32) {
    doc.borrow_mut().push(value);
    history.add_primitive(id, Box::new(append(doc, value))).unwrap();
}

// ============================================================================
// Strategy helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    /// Outer transaction gets `values[..split]`, a nested one the rest.
    Edit { values: Vec<u32>, split: usize },
    Cancelled(usize),
    Undo(usize),
    Redo(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (prop::collection::vec(any::<u32>(), 0..6), 0usize..6)
            .prop_map(|(values, split)| Op::Edit { split: split.min(values.len()), values }),
        1 => (1usize..4).prop_map(Op::Cancelled),
        2 => (0usize..4).prop_map(Op::Undo),
        2 => (0usize..4).prop_map(Op::Redo),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

// ============================================================================
// Invariant 1: document mirrors the undo stack
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn document_mirrors_undo_stack(ops in ops_strategy(40)) {
        let doc = Doc::default();
        let mut history = UndoHistory::new();
        let mut undo_model: Vec<Vec<u32>> = Vec::new();
        let mut redo_model: Vec<Vec<u32>> = Vec::new();

        for op in ops {
            match op {
                Op::Edit { values, split } => {
                    let outer = history.create_transaction("edit");
                    for v in &values[..split] {
                        record(&mut history, outer, &doc, *v);
                    }
                    let inner = history.create_transaction("nested");
                    for v in &values[split..] {
                        record(&mut history, inner, &doc, *v);
                    }
                    history.complete(inner);
                    prop_assert_eq!(history.open_depth(), 1);
                    history.complete(outer);
                    undo_model.push(values);
                }
                Op::Cancelled(n) => {
                    let id = history.create_transaction("cancelled");
                    for _ in 0..n {
                        history.add_primitive(id, Box::new(untouchable())).unwrap();
                    }
                    history.cancel(id);
                }
                Op::Undo(n) => {
                    history.undo(n).unwrap();
                    for _ in 0..n.min(undo_model.len()) {
                        if let Some(t) = undo_model.pop() {
                            redo_model.push(t);
                        }
                    }
                }
                Op::Redo(n) => {
                    history.redo(n).unwrap();
                    for _ in 0..n.min(redo_model.len()) {
                        if let Some(t) = redo_model.pop() {
                            undo_model.push(t);
                        }
                    }
                }
            }

            prop_assert_eq!(history.state(), UndoHistoryState::Idle);
            prop_assert_eq!(history.open_depth(), 0);
            prop_assert_eq!(history.undo_depth(), undo_model.len());
            prop_assert_eq!(history.redo_depth(), redo_model.len());
            let flattened: Vec<u32> = undo_model.iter().flatten().copied().collect();
            prop_assert_eq!(&*doc.borrow(), &flattened);
        }
    }
}

// ============================================================================
// Invariant 2: undo all then redo all is the identity
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_all_redo_all_round_trips(
        edits in prop::collection::vec(prop::collection::vec(any::<u32>(), 1..5), 1..12)
    ) {
        let doc = Doc::default();
        let mut history = UndoHistory::new();
        for values in &edits {
            let id = history.create_transaction("edit");
            for v in values {
                record(&mut history, id, &doc, *v);
            }
            history.complete(id);
        }
        let edited = doc.borrow().clone();

        history.undo(usize::MAX).unwrap();
        prop_assert!(doc.borrow().is_empty());
        prop_assert_eq!(history.redo_depth(), edits.len());

        history.redo(usize::MAX).unwrap();
        prop_assert_eq!(&*doc.borrow(), &edited);
        prop_assert_eq!(history.undo_depth(), edits.len());
    }
}

// ============================================================================
// Invariant 3: nesting depth never creates extra undo entries
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn deep_nesting_yields_single_entry(depth in 1usize..12) {
        let doc = Doc::default();
        let mut history = UndoHistory::new();
        let mut ids = Vec::new();
        for level in 0..depth {
            let id = history.create_transaction(format!("level {level}"));
            record(&mut history, id, &doc, level as u32);
            ids.push(id);
        }
        while let Some(id) = ids.pop() {
            history.complete(id);
        }

        prop_assert_eq!(history.undo_depth(), 1);
        prop_assert_eq!(history.undo_description(), Some("level 0"));
        prop_assert_eq!(history.last_undo_transaction().map(|t| t.len()), Some(depth));

        history.undo(1).unwrap();
        prop_assert!(doc.borrow().is_empty());
    }
}
