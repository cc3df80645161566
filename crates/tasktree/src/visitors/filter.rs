//! Name and completion-date filters.
//!
//! A filter looks at one kind of node and decides, for each node of that kind
//! it reaches, whether the node stays marked. Once a node has been decided,
//! its whole subtree counts as decided for the rest of the pass: a folder
//! that matches brings every descendant with it, whether or not their own
//! names would match. Descendants of a decided node keep whatever `marked`
//! value they had going into the pass.

use chrono::{Local, NaiveDate};
use log::{debug, trace};
use regex::Regex;

use crate::error::VisitResult;
use crate::matching::{compile, matches_completed, matches_name};
use crate::model::{NodeId, NodeKind, Tree};
use crate::selection::Pass;
use crate::traversal::Visitor;

/// What a filter compares its pattern with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// The node's name.
    Name,
    /// The node's completion descriptor (see [`crate::matching`]).
    Completion,
}

/// The six supported (kind, criterion) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    FolderName,
    ProjectName,
    ContextName,
    TaskName,
    ProjectCompletion,
    TaskCompletion,
}

impl FilterTarget {
    /// The node kind this filter reacts to.
    pub fn kind(self) -> NodeKind {
        match self {
            FilterTarget::FolderName => NodeKind::Folder,
            FilterTarget::ProjectName | FilterTarget::ProjectCompletion => NodeKind::Project,
            FilterTarget::ContextName => NodeKind::Context,
            FilterTarget::TaskName | FilterTarget::TaskCompletion => NodeKind::Task,
        }
    }

    /// What the pattern is matched against.
    pub fn criterion(self) -> Criterion {
        match self {
            FilterTarget::ProjectCompletion | FilterTarget::TaskCompletion => Criterion::Completion,
            _ => Criterion::Name,
        }
    }

    fn label(self) -> &'static str {
        match self {
            FilterTarget::FolderName => "folder-name",
            FilterTarget::ProjectName => "project-name",
            FilterTarget::ContextName => "context-name",
            FilterTarget::TaskName => "task-name",
            FilterTarget::ProjectCompletion => "project-completion",
            FilterTarget::TaskCompletion => "task-completion",
        }
    }
}

/// A selection-propagating filter over one node kind.
///
/// With no pattern the filter still keeps the selection table up to date but
/// never decides anything, so it leaves every `marked` value alone.
///
/// The pattern is compiled on first use; a malformed pattern fails the pass
/// the first time a node of the target kind needs matching.
#[derive(Debug, Clone)]
pub struct FilterVisitor {
    target: FilterTarget,
    pattern: Option<String>,
    include: bool,
    today: Option<NaiveDate>,
    compiled: Option<Regex>,
    unmarked: usize,
}

impl FilterVisitor {
    /// Creates a filter. With `include` false, the match outcome is inverted.
    pub fn new(target: FilterTarget, pattern: Option<String>, include: bool) -> Self {
        Self {
            target,
            pattern,
            include,
            today: None,
            compiled: None,
            unmarked: 0,
        }
    }

    pub fn folder_name(pattern: Option<String>, include: bool) -> Self {
        Self::new(FilterTarget::FolderName, pattern, include)
    }

    pub fn project_name(pattern: Option<String>, include: bool) -> Self {
        Self::new(FilterTarget::ProjectName, pattern, include)
    }

    pub fn context_name(pattern: Option<String>, include: bool) -> Self {
        Self::new(FilterTarget::ContextName, pattern, include)
    }

    pub fn task_name(pattern: Option<String>, include: bool) -> Self {
        Self::new(FilterTarget::TaskName, pattern, include)
    }

    pub fn project_completion(pattern: Option<String>, include: bool) -> Self {
        Self::new(FilterTarget::ProjectCompletion, pattern, include)
    }

    pub fn task_completion(pattern: Option<String>, include: bool) -> Self {
        Self::new(FilterTarget::TaskCompletion, pattern, include)
    }

    /// Pins the date completion patterns are measured from.
    ///
    /// Without this, today's local date is read each time a node is matched.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn target(&self) -> FilterTarget {
        self.target
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn include(&self) -> bool {
        self.include
    }

    /// Nodes this filter unmarked during its most recent pass.
    pub fn unmarked(&self) -> usize {
        self.unmarked
    }

    fn regex(&mut self) -> VisitResult<Option<&Regex>> {
        let Some(pattern) = self.pattern.as_deref() else {
            return Ok(None);
        };
        if self.compiled.is_none() {
            self.compiled = Some(compile(pattern)?);
        }
        Ok(self.compiled.as_ref())
    }

    /// Applies a match outcome to `id` and freezes it for the subtree.
    fn apply_match(
        &mut self,
        tree: &mut Tree,
        id: NodeId,
        pass: &mut Pass,
        matched: bool,
    ) -> VisitResult<()> {
        let matched = if self.include { matched } else { !matched };
        let node = tree.node_mut(id)?;
        // Filters compose conjunctively: a node an earlier pass excluded stays excluded.
        if node.marked && !matched {
            self.unmarked += 1;
            node.marked = false;
        }
        pass.select(id);
        trace!(
            "{} decided {} '{}': {}",
            self.target.label(),
            id,
            node.name,
            matched
        );
        Ok(())
    }

    fn check(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        if pass.is_selected(id)? {
            return Ok(());
        }
        let criterion = self.target.criterion();
        let today = self.today;
        let Some(regex) = self.regex()? else {
            return Ok(());
        };
        let node = tree.node(id)?;
        let matched = match criterion {
            Criterion::Name => matches_name(node, regex),
            Criterion::Completion => {
                let today = today.unwrap_or_else(|| Local::now().date_naive());
                matches_completed(node, regex, today)
            }
        };
        self.apply_match(tree, id, pass, matched)
    }
}

impl Visitor for FilterVisitor {
    fn name(&self) -> &'static str {
        self.target.label()
    }

    fn start_pass(&mut self, _tree: &Tree) {
        self.unmarked = 0;
    }

    fn finish_pass(&mut self, _tree: &Tree) {
        debug!("{} unmarked {} nodes", self.target.label(), self.unmarked);
    }

    fn begin_any(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        pass.inherit(tree, id)
    }

    fn end_any(&mut self, _tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        pass.release(id);
        Ok(())
    }

    fn begin_folder(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        if self.target.kind() == NodeKind::Folder {
            self.check(tree, id, pass)?;
        }
        Ok(())
    }

    fn begin_project(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        if self.target.kind() == NodeKind::Project {
            self.check(tree, id, pass)?;
        }
        Ok(())
    }

    fn begin_context(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        if self.target.kind() == NodeKind::Context {
            self.check(tree, id, pass)?;
        }
        Ok(())
    }

    fn begin_task(&mut self, tree: &mut Tree, id: NodeId, pass: &mut Pass) -> VisitResult<()> {
        if self.target.kind() == NodeKind::Task {
            self.check(tree, id, pass)?;
        }
        Ok(())
    }
}
