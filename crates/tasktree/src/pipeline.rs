//! Sequential composition of visitor passes.
//!
//! A [`Pipeline`] runs each of its visitors over the whole tree, one full pass
//! after another. Passes never interleave, and the first failing pass stops
//! the run; whatever earlier passes changed stays changed.
//!
//! # Example
//!
//! ```
//! use tasktree_rs::{FilterSpec, FilterTarget, NodeKind, Pipeline, PipelineOptions, Tree};
//!
//! let mut tree = Tree::new();
//! let work = tree.add_root(NodeKind::Folder, "Work");
//! let launch = tree.add_child(work, NodeKind::Project, "Launch").unwrap();
//! tree.add_child(launch, NodeKind::Task, "Write docs").unwrap();
//! let garden = tree.add_child(work, NodeKind::Project, "Garden").unwrap();
//! tree.add_child(garden, NodeKind::Task, "Plant beans").unwrap();
//!
//! let options = PipelineOptions {
//!     filters: vec![FilterSpec::include(FilterTarget::ProjectName, "Launch")],
//!     prune: true,
//!     ..Default::default()
//! };
//! Pipeline::from_options(&options).run(&mut tree).unwrap();
//!
//! assert!(tree.node(launch).unwrap().marked);
//! assert!(!tree.node(garden).unwrap().marked);
//! ```

use chrono::NaiveDate;
use log::debug;

use crate::error::VisitResult;
use crate::model::Tree;
use crate::traversal::{traverse, Visitor};
use crate::visitors::{
    CompletionSortingVisitor, FilterTarget, FilterVisitor, FlatteningVisitor, PruningVisitor,
};

/// One filter in a pipeline description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Which kind and criterion the filter applies to.
    pub target: FilterTarget,
    /// Regex pattern; `None` makes the filter a pass-through.
    pub pattern: Option<String>,
    /// False inverts the match outcome.
    pub include: bool,
}

impl FilterSpec {
    /// Keeps nodes of the target kind that match `pattern`.
    pub fn include(target: FilterTarget, pattern: impl Into<String>) -> Self {
        Self {
            target,
            pattern: Some(pattern.into()),
            include: true,
        }
    }

    /// Drops nodes of the target kind that match `pattern`.
    pub fn exclude(target: FilterTarget, pattern: impl Into<String>) -> Self {
        Self {
            target,
            pattern: Some(pattern.into()),
            include: false,
        }
    }
}

/// Declarative description of a pipeline.
///
/// Filters run in the order given, then flattening, then sorting, then
/// pruning, each only if enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub filters: Vec<FilterSpec>,
    pub flatten: bool,
    pub sort: bool,
    pub prune: bool,
    /// Date completion filters measure from; local today when `None`.
    pub today: Option<NaiveDate>,
}

/// An ordered list of visitors run one full pass at a time.
#[derive(Default)]
pub struct Pipeline {
    visitors: Vec<Box<dyn Visitor>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the pipeline described by `options`.
    pub fn from_options(options: &PipelineOptions) -> Self {
        let mut pipeline = Self::new();
        for spec in &options.filters {
            let mut filter = FilterVisitor::new(spec.target, spec.pattern.clone(), spec.include);
            if let Some(today) = options.today {
                filter = filter.with_today(today);
            }
            pipeline.push(filter);
        }
        if options.flatten {
            pipeline.push(FlatteningVisitor::new());
        }
        if options.sort {
            pipeline.push(CompletionSortingVisitor::new());
        }
        if options.prune {
            pipeline.push(PruningVisitor::new());
        }
        pipeline
    }

    /// Appends a visitor.
    pub fn push<V: Visitor + 'static>(&mut self, visitor: V) {
        self.visitors.push(Box::new(visitor));
    }

    /// Appends a visitor, builder style.
    pub fn with<V: Visitor + 'static>(mut self, visitor: V) -> Self {
        self.push(visitor);
        self
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Names of the passes, in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.visitors.iter().map(|v| v.name()).collect()
    }

    /// Runs every pass over `tree` in order.
    pub fn run(&mut self, tree: &mut Tree) -> VisitResult<()> {
        debug!("running {} passes: {:?}", self.visitors.len(), self.names());
        for visitor in &mut self.visitors {
            traverse(tree, visitor.as_mut())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.names())
            .finish()
    }
}
