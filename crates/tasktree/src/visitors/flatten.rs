//! Task flattening.

use log::debug;

use crate::error::{TreeError, VisitResult};
use crate::model::{NodeId, Tree};
use crate::selection::Pass;
use crate::traversal::Visitor;

/// Promotes every sub-task to a direct child of its task's parent.
///
/// Runs on task exit, so a task's own sub-tasks are already flat when its
/// children get spliced upwards; one pass flattens chains of any depth.
/// Promoted children are inserted just before the task they came from, in
/// their original order, and the task is left in place as a leaf.
#[derive(Debug, Default, Clone)]
pub struct FlatteningVisitor {
    projects: Vec<NodeId>,
    promoted: usize,
}

impl FlatteningVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every project reached, in traversal order.
    pub fn projects(&self) -> &[NodeId] {
        &self.projects
    }

    /// How many nodes were moved up a level.
    pub fn promoted(&self) -> usize {
        self.promoted
    }
}

impl Visitor for FlatteningVisitor {
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn start_pass(&mut self, _tree: &Tree) {
        self.projects.clear();
        self.promoted = 0;
    }

    fn finish_pass(&mut self, _tree: &Tree) {
        debug!(
            "flatten promoted {} nodes across {} projects",
            self.promoted,
            self.projects.len()
        );
    }

    fn begin_project(&mut self, _tree: &mut Tree, id: NodeId, _pass: &mut Pass) -> VisitResult<()> {
        self.projects.push(id);
        Ok(())
    }

    fn end_task(&mut self, tree: &mut Tree, id: NodeId, _pass: &mut Pass) -> VisitResult<()> {
        let Some(parent) = tree.parent(id)? else {
            return Ok(());
        };
        let children = std::mem::take(&mut tree.node_mut(id)?.children);
        if children.is_empty() {
            return Ok(());
        }

        let pos = tree.position_in_parent(id)?.ok_or(TreeError::Detached(id))?;
        for &child in &children {
            tree.node_mut(child)?.parent = Some(parent);
        }
        self.promoted += children.len();
        tree.node_mut(parent)?.children.splice(pos..pos, children);
        Ok(())
    }
}
