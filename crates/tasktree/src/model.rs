//! Arena-backed task tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. A node's
//! parent is an id lookup and its children are an ordered list of ids, so
//! moving a node between parents is an index update rather than a pointer
//! rewrite.
//!
//! A tree is really a forest: a document has several top-level nodes (the
//! project folders and the context hierarchy side by side), and each of them
//! is a root with no parent.
//!
//! Containment follows the outline shape of a task manager:
//! - folders hold folders, projects and contexts
//! - contexts hold contexts and tasks
//! - projects and tasks hold tasks

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{TreeError, TreeResult};

/// Stable index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four kinds of node in a task tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Project,
    Context,
    Task,
}

impl NodeKind {
    /// Returns true if nodes of this kind may carry a completion date.
    pub fn can_complete(self) -> bool {
        matches!(self, NodeKind::Project | NodeKind::Task)
    }

    /// Returns true if a node of this kind may hold a child of `child` kind.
    pub fn can_contain(self, child: NodeKind) -> bool {
        match (self, child) {
            (NodeKind::Folder, NodeKind::Folder | NodeKind::Project | NodeKind::Context) => true,
            (NodeKind::Context, NodeKind::Context | NodeKind::Task) => true,
            (NodeKind::Project | NodeKind::Task, NodeKind::Task) => true,
            _ => false,
        }
    }

    /// Lowercase name used in messages and documents.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Project => "project",
            NodeKind::Context => "context",
            NodeKind::Task => "task",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single folder, project, context or task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Display name, the subject of name filters.
    pub name: String,

    /// When the project or task was completed. Always `None` for folders and contexts.
    pub date_completed: Option<NaiveDateTime>,

    /// Whether the node is part of the visible result.
    ///
    /// Starts out true. Filters and pruning only ever clear it.
    pub marked: bool,

    /// Parent id, `None` for top-level nodes.
    pub parent: Option<NodeId>,

    /// Owned children in display order.
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, name: String, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name,
            date_completed: None,
            marked: true,
            parent,
            children: Vec::new(),
        }
    }

    /// Returns true if the node has a completion date.
    pub fn is_completed(&self) -> bool {
        self.date_completed.is_some()
    }
}

/// An ordered forest of task-tree nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level nodes in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every id in arena (creation) order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Returns the node for `id`, or `None` if it is not in this tree.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the node for `id`.
    pub fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Returns the node for `id` mutably.
    pub fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Returns the children of `id` in order.
    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Returns the parent of `id`, `None` for top-level nodes.
    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Returns the index of `id` within its parent's children.
    ///
    /// Returns `Ok(None)` for top-level nodes.
    pub fn position_in_parent(&self, id: NodeId) -> TreeResult<Option<usize>> {
        let Some(parent) = self.parent(id)? else {
            return Ok(None);
        };
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == id)
            .map(Some)
            .ok_or(TreeError::Detached(id))
    }

    /// Appends a new top-level node and returns its id.
    pub fn add_root(&mut self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, name.into(), None));
        self.roots.push(id);
        id
    }

    /// Appends a new node of `kind` under `parent` and returns its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: impl Into<String>,
    ) -> TreeResult<NodeId> {
        let parent_kind = self.node(parent)?.kind;
        if !parent_kind.can_contain(kind) {
            return Err(TreeError::InvalidParent {
                parent: parent_kind,
                child: kind,
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, name.into(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Sets or clears the completion date of a project or task.
    pub fn set_completed(
        &mut self,
        id: NodeId,
        completed: Option<NaiveDateTime>,
    ) -> TreeResult<()> {
        let node = self.node_mut(id)?;
        if !node.kind.can_complete() {
            return Err(TreeError::CompletionNotSupported { kind: node.kind });
        }
        node.date_completed = completed;
        Ok(())
    }

    /// Collects `id` and all of its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.node(next)?;
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Every node reachable from the roots, in pre-order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            if let Ok(ids) = self.descendants(root) {
                out.extend(ids);
            }
        }
        out
    }

    /// Collects the ids of every marked node, in arena order.
    pub fn marked_ids(&self) -> Vec<NodeId> {
        self.ids()
            .filter(|&id| self.nodes[id.0].marked)
            .collect()
    }

    /// Finds the first node (in pre-order) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|&id| self.nodes[id.0].name == name)
    }
}
