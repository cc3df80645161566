//! Depth-first traversal driver and the visitor protocol.
//!
//! # Traversal Order
//!
//! [`Visitor::start_pass`] runs once, then for every top-level node in order,
//! and recursively for every node below it:
//!
//! 1. [`Visitor::begin_any`]
//! 2. the kind hook (`begin_folder`, `begin_project`, ...)
//! 3. each child, recursively, in the order the children had on entry
//! 4. the kind end hook (`end_folder`, ...)
//! 5. [`Visitor::end_any`]
//!
//! and finally [`Visitor::finish_pass`] once the whole forest succeeded.
//!
//! End hooks therefore run post-order: by the time `end_project` fires, the
//! whole subtree has been processed. The child list is snapshotted before
//! descending, so nodes a visitor moves into an ancestor's child list during
//! the pass are not visited a second time.

use log::{debug, trace};

use crate::error::VisitResult;
use crate::model::{NodeId, NodeKind, Tree};
use crate::selection::Pass;

/// Callbacks invoked by [`traverse`].
///
/// Every hook defaults to doing nothing, so a visitor only implements the
/// ones it reacts to.
#[allow(unused_variables)]
pub trait Visitor {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Runs before the first node of a pass.
    fn start_pass(&mut self, tree: &Tree) {}

    /// Runs after the last node of a successful pass.
    fn finish_pass(&mut self, tree: &Tree) {}

    /// Runs on entry to every node, before the kind hook.
    fn begin_any(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    /// Runs on exit from every node, after the kind hook.
    fn end_any(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn begin_folder(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn end_folder(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn begin_project(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn end_project(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn begin_context(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn end_context(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn begin_task(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }

    fn end_task(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        Ok(())
    }
}

/// Runs one full pass of `visitor` over `tree`.
///
/// The pass owns a fresh [`Pass`]; it is dropped when this returns, whether
/// or not the pass succeeded. The first error aborts the walk, and changes
/// already made to the tree are kept.
pub fn traverse<V: Visitor + ?Sized>(tree: &mut Tree, visitor: &mut V) -> VisitResult<()> {
    let mut pass = Pass::new();
    debug!("pass '{}' started over {} nodes", visitor.name(), tree.len());
    visitor.start_pass(tree);

    let roots = tree.roots().to_vec();
    for root in roots {
        if let Err(e) = visit(tree, visitor, &mut pass, root) {
            debug!("pass '{}' aborted: {}", visitor.name(), e);
            return Err(e);
        }
    }

    visitor.finish_pass(tree);
    debug!("pass '{}' finished", visitor.name());
    Ok(())
}

fn visit<V: Visitor + ?Sized>(
    tree: &mut Tree,
    visitor: &mut V,
    pass: &mut Pass,
    id: NodeId,
) -> VisitResult<()> {
    let result = walk(tree, visitor, pass, id);
    if result.is_err() {
        pass.release(id);
    }
    result
}

fn walk<V: Visitor + ?Sized>(
    tree: &mut Tree,
    visitor: &mut V,
    pass: &mut Pass,
    id: NodeId,
) -> VisitResult<()> {
    trace!("enter {}", id);
    visitor.begin_any(tree, id, pass)?;
    match tree.node(id)?.kind {
        NodeKind::Folder => visitor.begin_folder(tree, id, pass)?,
        NodeKind::Project => visitor.begin_project(tree, id, pass)?,
        NodeKind::Context => visitor.begin_context(tree, id, pass)?,
        NodeKind::Task => visitor.begin_task(tree, id, pass)?,
    }

    let children = tree.children(id)?.to_vec();
    for child in children {
        visit(tree, visitor, pass, child)?;
    }

    match tree.node(id)?.kind {
        NodeKind::Folder => visitor.end_folder(tree, id, pass)?,
        NodeKind::Project => visitor.end_project(tree, id, pass)?,
        NodeKind::Context => visitor.end_context(tree, id, pass)?,
        NodeKind::Task => visitor.end_task(tree, id, pass)?,
    }
    visitor.end_any(tree, id, pass)?;
    trace!("exit {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FilterError, VisitError};

    /// Records every hook invocation as "<hook>:<name>".
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Recorder {
        fn push(&mut self, hook: &str, tree: &Tree, id: NodeId) {
            let name = &tree.node(id).unwrap().name;
            self.events.push(format!("{hook}:{name}"));
        }
    }

    impl Visitor for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn begin_any(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("any+", tree, id);
            Ok(())
        }
        fn end_any(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("any-", tree, id);
            Ok(())
        }
        fn begin_folder(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("folder+", tree, id);
            Ok(())
        }
        fn end_folder(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("folder-", tree, id);
            Ok(())
        }
        fn begin_project(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("project+", tree, id);
            Ok(())
        }
        fn end_project(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("project-", tree, id);
            Ok(())
        }
        fn begin_task(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("task+", tree, id);
            Ok(())
        }
        fn end_task(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.push("task-", tree, id);
            Ok(())
        }
    }

    #[test]
    fn test_hooks_fire_in_pre_and_post_order() {
        let mut tree = Tree::new();
        let f = tree.add_root(NodeKind::Folder, "F");
        let p = tree.add_child(f, NodeKind::Project, "P").unwrap();
        tree.add_child(p, NodeKind::Task, "T").unwrap();

        let mut recorder = Recorder::default();
        traverse(&mut tree, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "any+:F", "folder+:F", "any+:P", "project+:P", "any+:T", "task+:T", "task-:T",
                "any-:T", "project-:P", "any-:P", "folder-:F", "any-:F",
            ]
        );
    }

    /// Seeds selection like a filter does and fails on a named task.
    struct FailOn(&'static str);

    impl Visitor for FailOn {
        fn name(&self) -> &'static str {
            "fail-on"
        }
        fn begin_any(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
            pass.inherit(tree, id)
        }
        fn end_any(&mut self, _: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
            pass.release(id);
            Ok(())
        }
        fn begin_task(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
            pass.is_selected(id)?;
            if tree.node(id)?.name == self.0 {
                return Err(FilterError::InvalidPattern {
                    pattern: "(".into(),
                    message: "boom".into(),
                }
                .into());
            }
            Ok(())
        }
    }

    #[test]
    fn test_error_aborts_pass() {
        let mut tree = Tree::new();
        let f = tree.add_root(NodeKind::Folder, "F");
        let p = tree.add_child(f, NodeKind::Project, "P").unwrap();
        tree.add_child(p, NodeKind::Task, "bad").unwrap();

        let result = traverse(&mut tree, &mut FailOn("bad"));
        assert!(matches!(result, Err(VisitError::Filter(_))));

        // A following pass over the same tree is unaffected.
        assert!(traverse(&mut tree, &mut FailOn("other")).is_ok());
    }

    /// Moves every task's children up to its parent; used to check that
    /// promoted nodes are not revisited.
    struct CountTasks(usize);

    impl Visitor for CountTasks {
        fn name(&self) -> &'static str {
            "count"
        }
        fn begin_task(&mut self, _: &mut Tree, _: NodeId, _: &mut Pass) -> VisitResult<()> {
            self.0 += 1;
            Ok(())
        }
        fn end_task(&mut self, tree: &mut Tree, id: NodeId, _: &mut Pass) -> VisitResult<()> {
            let parent = tree.parent(id)?.unwrap();
            let moved = std::mem::take(&mut tree.node_mut(id)?.children);
            for child in &moved {
                tree.node_mut(*child)?.parent = Some(parent);
            }
            let pos = tree.position_in_parent(id)?.unwrap();
            tree.node_mut(parent)?.children.splice(pos..pos, moved);
            Ok(())
        }
    }

    #[test]
    fn test_children_are_snapshotted() {
        let mut tree = Tree::new();
        let f = tree.add_root(NodeKind::Folder, "F");
        let p = tree.add_child(f, NodeKind::Project, "P").unwrap();
        let a = tree.add_child(p, NodeKind::Task, "a").unwrap();
        let b = tree.add_child(a, NodeKind::Task, "b").unwrap();
        tree.add_child(b, NodeKind::Task, "c").unwrap();

        let mut counter = CountTasks(0);
        traverse(&mut tree, &mut counter).unwrap();
        assert_eq!(counter.0, 3);
    }
}
