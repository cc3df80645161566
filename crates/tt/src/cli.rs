//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tt CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// tt - Filter, flatten, sort and prune task outlines
#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print JSON instead of an indented outline
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and reshape an outline document
    #[command(alias = "f")]
    Filter(FilterArgs),

    /// View and create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Arguments for the filter command.
///
/// Every pattern is a regular expression searched anywhere in the name, or in
/// the completion descriptor (e.g. "2024-03-14 Thursday March -2d") for the
/// `*-done` flags.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Outline document to read (JSON), or "-" for stdin
    pub file: PathBuf,

    /// Keep folders whose name matches
    #[arg(short, long, value_name = "PATTERN")]
    pub folder: Option<String>,

    /// Keep projects whose name matches
    #[arg(short, long, value_name = "PATTERN")]
    pub project: Option<String>,

    /// Keep contexts whose name matches
    #[arg(short, long, value_name = "PATTERN")]
    pub context: Option<String>,

    /// Keep tasks whose name matches
    #[arg(short, long, value_name = "PATTERN")]
    pub task: Option<String>,

    /// Keep projects whose completion matches (or an alias such as "today")
    #[arg(long, value_name = "PATTERN")]
    pub project_done: Option<String>,

    /// Keep tasks whose completion matches (or an alias such as "yesterday")
    #[arg(long, value_name = "PATTERN")]
    pub task_done: Option<String>,

    /// Drop folders whose name matches
    #[arg(long, value_name = "PATTERN")]
    pub exclude_folder: Option<String>,

    /// Drop projects whose name matches
    #[arg(long, value_name = "PATTERN")]
    pub exclude_project: Option<String>,

    /// Drop contexts whose name matches
    #[arg(long, value_name = "PATTERN")]
    pub exclude_context: Option<String>,

    /// Drop tasks whose name matches
    #[arg(long, value_name = "PATTERN")]
    pub exclude_task: Option<String>,

    /// Drop projects whose completion matches
    #[arg(long, value_name = "PATTERN")]
    pub exclude_project_done: Option<String>,

    /// Drop tasks whose completion matches
    #[arg(long, value_name = "PATTERN")]
    pub exclude_task_done: Option<String>,

    /// Promote sub-tasks to direct children of their project or context
    #[arg(long)]
    pub flatten: bool,

    /// Order project children by completion time
    #[arg(long)]
    pub sort: bool,

    /// Hide containers left without visible children (default)
    #[arg(long, overrides_with = "no_prune")]
    pub prune: bool,

    /// Keep empty containers visible
    #[arg(long, overrides_with = "prune")]
    pub no_prune: bool,

    /// Include unmarked nodes in the output
    #[arg(long)]
    pub all: bool,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print config file path
    Path,
}
