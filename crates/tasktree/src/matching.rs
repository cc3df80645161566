//! Match primitives shared by the filter visitors.
//!
//! Both primitives are regex *searches*: a pattern matches if it is found
//! anywhere in the subject, not only when it spans the whole of it.
//!
//! Completion matching runs against a descriptor built from the completion
//! date, for example:
//!
//! ```text
//! 2024-03-14 Thursday March -2d
//! ```
//!
//! The trailing `-<N>d` is the number of calendar days between the completion
//! date and today, so `-0d$` selects things finished today and `-1d$` things
//! finished yesterday, whatever the time of day they were completed.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{FilterError, FilterResult};
use crate::model::Node;

/// Compiles `pattern`, mapping syntax errors to [`FilterError::InvalidPattern`].
pub fn compile(pattern: &str) -> FilterResult<Regex> {
    Regex::new(pattern).map_err(|e| FilterError::invalid_pattern(pattern, &e))
}

/// Returns true if `pattern` occurs anywhere in the node's name.
pub fn match_name(node: &Node, pattern: &str) -> FilterResult<bool> {
    Ok(matches_name(node, &compile(pattern)?))
}

/// Returns true if `pattern` occurs anywhere in the completion descriptor.
///
/// Nodes without a completion date have an empty descriptor, so only patterns
/// that match the empty string select them.
pub fn match_completed(node: &Node, pattern: &str, today: NaiveDate) -> FilterResult<bool> {
    Ok(matches_completed(node, &compile(pattern)?, today))
}

pub(crate) fn matches_name(node: &Node, regex: &Regex) -> bool {
    regex.is_match(&node.name)
}

pub(crate) fn matches_completed(node: &Node, regex: &Regex, today: NaiveDate) -> bool {
    regex.is_match(&completion_descriptor(node.date_completed, today))
}

/// Builds the string completion patterns are matched against.
///
/// Elapsed days come from subtracting calendar dates, not timestamps: an item
/// finished at 23:00 yesterday is `-1d` at 08:00 today. Future dates yield a
/// negative count (`--2d`).
pub fn completion_descriptor(completed: Option<NaiveDateTime>, today: NaiveDate) -> String {
    let Some(completed) = completed else {
        return String::new();
    };
    let days = (today - completed.date()).num_days();
    format!("{} -{}d", completed.format("%Y-%m-%d %A %B"), days)
}
