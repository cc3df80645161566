//! Command implementations for the tt CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod filter;

use tasktree_rs::{TreeError, VisitError};

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A pass over the tree failed, usually on a bad pattern.
    #[error("filter error: {0}")]
    Visit(#[from] VisitError),

    /// The outline document does not describe a valid tree.
    #[error("document error: {0}")]
    Document(#[from] TreeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are off with `--no-color`, when `NO_COLOR` is set, or when the
    /// config file says so.
    pub fn from_cli(cli: &Cli, config: &config::Config) -> Self {
        let color_allowed = std::env::var_os("NO_COLOR").is_none();
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && color_allowed && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}
