//! Completion-order sorting.

use chrono::{Local, NaiveDateTime};

use crate::error::VisitResult;
use crate::model::{NodeId, Tree};
use crate::selection::Pass;
use crate::traversal::Visitor;

/// Orders each project's children by completion time.
///
/// Completed children come first, oldest completion first. Children without a
/// completion date are keyed by the current time, read once per child while
/// sorting, so they land after anything completed in the past. Their order
/// relative to each other is whatever those clock readings produce; the sort
/// is stable, so with equal readings they keep their existing order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompletionSortingVisitor;

impl CompletionSortingVisitor {
    pub fn new() -> Self {
        Self
    }
}

fn sort_key(tree: &Tree, id: NodeId) -> NaiveDateTime {
    tree.get(id)
        .and_then(|node| node.date_completed)
        .unwrap_or_else(|| Local::now().naive_local())
}

impl Visitor for CompletionSortingVisitor {
    fn name(&self) -> &'static str {
        "sort-completed"
    }

    fn end_project(&mut self, tree: &mut Tree, id: NodeId, _pass: &mut Pass) -> VisitResult<()> {
        let mut children = std::mem::take(&mut tree.node_mut(id)?.children);
        children.sort_by_cached_key(|&child| sort_key(tree, child));
        tree.node_mut(id)?.children = children;
        Ok(())
    }
}
