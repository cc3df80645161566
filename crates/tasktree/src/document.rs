//! Nested outline documents.
//!
//! An [`Outline`] is the serde shape used to move trees in and out of the
//! crate, e.g. as JSON:
//!
//! ```json
//! [
//!   {
//!     "kind": "folder",
//!     "name": "Work",
//!     "children": [
//!       {
//!         "kind": "project",
//!         "name": "Launch",
//!         "children": [
//!           { "kind": "task", "name": "Write docs", "completed": "2024-03-14T16:30:00" }
//!         ]
//!       }
//!     ]
//!   }
//! ]
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::TreeResult;
use crate::model::{NodeId, NodeKind, Tree};

/// A forest of outline nodes, in top-level order.
pub type Outline = Vec<OutlineNode>;

/// One node of an outline document and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub kind: NodeKind,

    pub name: String,

    /// Completion timestamp, projects and tasks only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<NaiveDateTime>,

    /// Whether the node starts out included.
    #[serde(default = "default_marked", skip_serializing_if = "is_true")]
    pub marked: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

fn default_marked() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

impl OutlineNode {
    /// Creates a childless, marked, incomplete node.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            completed: None,
            marked: true,
            children: Vec::new(),
        }
    }

    /// Adds a child, builder style.
    pub fn child(mut self, child: OutlineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the completion timestamp, builder style.
    pub fn completed_at(mut self, at: NaiveDateTime) -> Self {
        self.completed = Some(at);
        self
    }
}

impl Tree {
    /// Builds a tree from an outline, validating containment and completion dates.
    pub fn from_outline(outline: &[OutlineNode]) -> TreeResult<Tree> {
        let mut tree = Tree::new();
        for node in outline {
            let id = tree.add_root(node.kind, node.name.clone());
            tree.fill(id, node)?;
        }
        Ok(tree)
    }

    fn fill(&mut self, id: NodeId, source: &OutlineNode) -> TreeResult<()> {
        if source.completed.is_some() {
            self.set_completed(id, source.completed)?;
        }
        self.node_mut(id)?.marked = source.marked;
        for child in &source.children {
            let child_id = self.add_child(id, child.kind, child.name.clone())?;
            self.fill(child_id, child)?;
        }
        Ok(())
    }

    /// Converts the tree back to an outline.
    ///
    /// With `only_marked`, unmarked nodes are left out together with their
    /// whole subtree.
    pub fn to_outline(&self, only_marked: bool) -> Outline {
        self.roots()
            .iter()
            .filter_map(|&id| self.outline_node(id, only_marked))
            .collect()
    }

    fn outline_node(&self, id: NodeId, only_marked: bool) -> Option<OutlineNode> {
        let node = self.get(id)?;
        if only_marked && !node.marked {
            return None;
        }
        Some(OutlineNode {
            kind: node.kind,
            name: node.name.clone(),
            completed: node.date_completed,
            marked: node.marked,
            children: node
                .children
                .iter()
                .filter_map(|&child| self.outline_node(child, only_marked))
                .collect(),
        })
    }
}
