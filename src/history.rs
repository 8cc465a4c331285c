//! Undo/redo over the patch stream.
//!
//! History stores forward patches only. Undo derives the inverse from the
//! patch payload at the moment it is needed, so there is no second stack that
//! could drift out of step with the first.
//!
//! [`DocStore`] bundles the current [`Document`] with its [`History`]. Every
//! collection is behind an `Arc`: cloning a store is O(1), and a no-op action
//! hands back a clone that [`DocStore::ptr_eq`] recognises as unchanged.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;

use crate::doc::{Document, Patch, apply_patch};

/// An instruction for the history manager.
#[derive(Debug, Clone, PartialEq)]
pub enum DocAction {
    /// Apply the patch and record it; discards any redo branch.
    Commit(Patch),
    /// Revert the most recent commit.
    Undo,
    /// Re-apply the most recently undone patch.
    Redo,
}

/// Recorded patches on either side of the present.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Arc<Vec<Patch>>,
    /// Front is the most recently undone patch.
    future: Arc<VecDeque<Patch>>,
}

impl History {
    /// Applied patches, oldest first.
    #[must_use]
    pub fn past(&self) -> &[Patch] {
        &self.past
    }

    /// Undone patches, most recently undone first.
    #[must_use]
    pub fn future(&self) -> &VecDeque<Patch> {
        &self.future
    }

    #[must_use]
    pub fn info(&self) -> HistoryInfo {
        HistoryInfo { depth: self.past.len(), can_undo: !self.past.is_empty(), can_redo: !self.future.is_empty() }
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.past, &other.past) && Arc::ptr_eq(&self.future, &other.future)
    }
}

/// Read-only summary of the history stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HistoryInfo {
    pub depth: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// The document together with the history that produced it.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    doc: Document,
    history: History,
}

impl DocStore {
    /// Empty document, empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a hydrated document with no history.
    #[must_use]
    pub fn from_document(doc: Document) -> Self {
        Self { doc, history: History::default() }
    }

    #[must_use]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn info(&self) -> HistoryInfo {
        self.history.info()
    }

    /// `true` when both stores share every underlying collection.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.doc.ptr_eq(&other.doc) && self.history.ptr_eq(&other.history)
    }

    /// Apply one action and return the next store.
    ///
    /// `Undo` with nothing to undo and `Redo` with nothing to redo return a
    /// clone of `self` for which [`DocStore::ptr_eq`] holds.
    #[must_use]
    pub fn apply(&self, action: &DocAction) -> Self {
        match action {
            DocAction::Commit(patch) => self.commit(patch),
            DocAction::Undo => self.undo(),
            DocAction::Redo => self.redo(),
        }
    }

    fn commit(&self, patch: &Patch) -> Self {
        let mut past = (*self.history.past).clone();
        past.push(patch.clone());
        Self {
            doc: apply_patch(&self.doc, patch),
            history: History { past: Arc::new(past), future: Arc::new(VecDeque::new()) },
        }
    }

    fn undo(&self) -> Self {
        let Some((patch, rest)) = self.history.past.split_last() else {
            return self.clone();
        };
        let mut future = (*self.history.future).clone();
        future.push_front(patch.clone());
        Self {
            doc: apply_patch(&self.doc, &patch.inverse()),
            history: History { past: Arc::new(rest.to_vec()), future: Arc::new(future) },
        }
    }

    fn redo(&self) -> Self {
        let mut future = (*self.history.future).clone();
        let Some(patch) = future.pop_front() else {
            return self.clone();
        };
        let doc = apply_patch(&self.doc, &patch);
        let mut past = (*self.history.past).clone();
        past.push(patch);
        Self { doc, history: History { past: Arc::new(past), future: Arc::new(future) } }
    }
}
