//! Pruning of containers left empty by filtering.

use log::debug;

use crate::error::VisitResult;
use crate::model::{NodeId, Tree};
use crate::selection::Pass;
use crate::traversal::Visitor;

/// Unmarks folders, projects and contexts with no marked children.
///
/// Runs post-order, so a folder whose projects were all pruned in this same
/// pass is pruned too. Tasks are never pruned, and nodes that are already
/// unmarked are left alone. Nothing is removed from the tree.
#[derive(Debug, Default, Clone)]
pub struct PruningVisitor {
    pruned: usize,
}

impl PruningVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Containers unmarked during the most recent pass.
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    fn prune_if_empty(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult<()> {
        let node = tree.node(id)?;
        if !node.marked {
            return Ok(());
        }
        let any_marked = node
            .children
            .iter()
            .any(|&child| tree.get(child).is_some_and(|c| c.marked));
        if !any_marked {
            tree.node_mut(id)?.marked = false;
            self.pruned += 1;
        }
        Ok(())
    }
}

impl Visitor for PruningVisitor {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn start_pass(&mut self, _tree: &Tree) {
        self.pruned = 0;
    }

    fn finish_pass(&mut self, _tree: &Tree) {
        debug!("prune unmarked {} empty containers", self.pruned);
    }

    fn end_folder(&mut self, tree: &mut Tree, id: NodeId, _pass: &mut Pass) -> VisitResult<()> {
        self.prune_if_empty(tree, id)
    }

    fn end_project(&mut self, tree: &mut Tree, id: NodeId, _pass: &mut Pass) -> VisitResult<()> {
        self.prune_if_empty(tree, id)
    }

    fn end_context(&mut self, tree: &mut Tree, id: NodeId, _pass: &mut Pass) -> VisitResult<()> {
        self.prune_if_empty(tree, id)
    }
}
