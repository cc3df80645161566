use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::Dispatch;
use tasktree_rs::VisitError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    // config init and path still work when the file does not parse.
    let config = if is_config_command(cli) {
        load_config().unwrap_or_default()
    } else {
        load_config()?
    };
    let ctx = CommandContext::from_cli(cli, &config);
    Dispatch::from_cli(cli).execute(&ctx, &config)
}

fn is_config_command(cli: &Cli) -> bool {
    matches!(
        &cli.command,
        Some(Commands::Config {
            command: Some(ConfigCommands::Init { .. } | ConfigCommands::Path)
        })
    )
}

/// Returns the log level for the verbosity flags.
fn log_level(cli: &Cli) -> LevelFilter {
    if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    }
}

/// Installs the stderr logger; a logger that is already set is kept.
fn init_logging(cli: &Cli) {
    let _ = TermLogger::init(
        log_level(cli),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        if cli.no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        },
    );
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Visit(VisitError::Filter(_)) => "FILTER_ERROR",
        CommandError::Visit(_) => "PASS_ERROR",
        CommandError::Document(_) => "DOCUMENT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Visit(VisitError::Filter(_)) => ExitCode::from(1),
        CommandError::Visit(_) => ExitCode::from(4),
        CommandError::Document(_) => ExitCode::from(4),
        CommandError::Json(_) => ExitCode::from(4),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Config(_) => ExitCode::from(5),
    }
}
