//! Filter, flatten, sort and prune passes over a task tree.
//!
//! A task tree is a forest of folders, projects, contexts and tasks. This
//! crate reshapes one by running single-pass [`Visitor`]s over it in
//! sequence:
//!
//! - name filters for folders, projects, contexts and tasks
//! - completion-date filters for projects and tasks
//! - flattening of nested tasks into their project or context
//! - sorting of project children by completion time
//! - pruning of containers left empty by filtering
//!
//! Filters never remove nodes; they clear the `marked` flag of nodes that
//! are excluded. Renderers downstream show only marked nodes.
//!
//! # Example
//!
//! ```
//! use tasktree_rs::{traverse, FilterVisitor, NodeKind, PruningVisitor, Tree};
//!
//! let mut tree = Tree::new();
//! let home = tree.add_root(NodeKind::Context, "Home");
//! tree.add_child(home, NodeKind::Task, "Water plants").unwrap();
//! let office = tree.add_root(NodeKind::Context, "Office");
//! tree.add_child(office, NodeKind::Task, "File expenses").unwrap();
//!
//! traverse(&mut tree, &mut FilterVisitor::task_name(Some("plants".into()), true)).unwrap();
//! traverse(&mut tree, &mut PruningVisitor::new()).unwrap();
//!
//! assert!(tree.node(home).unwrap().marked);
//! assert!(!tree.node(office).unwrap().marked);
//! ```

pub mod document;
pub mod error;
pub mod matching;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod traversal;
pub mod visitors;

pub use document::{Outline, OutlineNode};
pub use error::{FilterError, FilterResult, TreeError, TreeResult, VisitError, VisitResult};
pub use matching::{completion_descriptor, match_completed, match_name};
pub use model::{Node, NodeId, NodeKind, Tree};
pub use pipeline::{FilterSpec, Pipeline, PipelineOptions};
pub use selection::Pass;
pub use traversal::{traverse, Visitor};
pub use visitors::{
    CompletionSortingVisitor, Criterion, FilterTarget, FilterVisitor, FlatteningVisitor,
    PruningVisitor,
};
