//! The visitor family.
//!
//! - [`FilterVisitor`] - name and completion-date filters, one per node kind
//! - [`FlatteningVisitor`] - lifts sub-tasks up to their project or context
//! - [`CompletionSortingVisitor`] - orders project children by completion time
//! - [`PruningVisitor`] - unmarks containers left without marked children
//!
//! Filters only change `marked`. Flattening and sorting change the shape and
//! order of the tree. Pruning only changes `marked`, and is meant to run after
//! the filters.

mod filter;
mod flatten;
mod prune;
mod sort;

pub use filter::{Criterion, FilterTarget, FilterVisitor};
pub use flatten::FlatteningVisitor;
pub use prune::PruningVisitor;
pub use sort::CompletionSortingVisitor;
