//! Pass-scoped selection state.
//!
//! When a filter explicitly decides a node, every descendant inherits the
//! decision for the rest of that pass and is not matched again. The state
//! that carries this is kept here, in a side table keyed by [`NodeId`], rather
//! than on the nodes. [`traverse`](crate::traversal::traverse) creates one
//! [`Pass`] per run and drops it afterwards, so nothing leaks into the next
//! filter.
//!
//! # Invariants
//! - A node has an entry only between its `begin_any` and `end_any`.
//! - Entries are only ever flipped to `true` by [`Pass::select`].

use std::collections::HashMap;

use crate::error::{VisitError, VisitResult};
use crate::model::{NodeId, Tree};

/// Per-pass scratch state handed to every visitor hook.
#[derive(Debug, Default)]
pub struct Pass {
    selected: HashMap<NodeId, bool>,
}

impl Pass {
    /// Creates an empty pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the entry for `id` from its parent, or `false` for a top-level node.
    pub fn inherit(&mut self, tree: &Tree, id: NodeId) -> VisitResult<()> {
        let state = match tree.parent(id)? {
            None => false,
            Some(parent) => self.is_selected(parent)?,
        };
        self.selected.insert(id, state);
        Ok(())
    }

    /// Returns whether `id` (or an ancestor) was already decided in this pass.
    pub fn is_selected(&self, id: NodeId) -> VisitResult<bool> {
        self.selected
            .get(&id)
            .copied()
            .ok_or(VisitError::SelectionMissing(id))
    }

    /// Records that the outcome for `id` is final for the rest of the pass.
    pub fn select(&mut self, id: NodeId) {
        self.selected.insert(id, true);
    }

    /// Drops the entry for `id`.
    pub fn release(&mut self, id: NodeId) {
        self.selected.remove(&id);
    }

    /// Number of nodes that currently have an entry.
    pub fn active(&self) -> usize {
        self.selected.len()
    }
}
