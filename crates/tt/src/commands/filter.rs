//! Filter command implementation.
//!
//! Reads an outline document, runs the requested passes over it and prints
//! what is left.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use tasktree_rs::{FilterSpec, FilterTarget, Outline, Pipeline, PipelineOptions, Tree};

use super::config::Config;
use super::{CommandContext, Result};
use crate::cli::FilterArgs;
use crate::output::{format_outline, format_outline_json};

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if the document cannot be read or parsed, if it does not
/// describe a valid tree, or if a pattern is not a valid regular expression.
pub fn execute(ctx: &CommandContext, args: &FilterArgs, config: &Config) -> Result<()> {
    let mut tree = read_tree(&args.file)?;
    debug!("loaded {} nodes from {}", tree.len(), args.file.display());

    let options = pipeline_options(args, config);
    let mut pipeline = Pipeline::from_options(&options);
    pipeline.run(&mut tree)?;

    let only_marked = !args.all;
    if ctx.json_output {
        println!("{}", format_outline_json(&tree, only_marked)?);
    } else if !ctx.quiet {
        print!("{}", format_outline(&tree, only_marked, ctx.use_colors));
    }

    Ok(())
}

/// Reads and validates an outline document; "-" reads stdin.
pub fn read_tree(path: &Path) -> Result<Tree> {
    let content = if path == Path::new("-") {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(path)?
    };
    let outline: Outline = serde_json::from_str(&content)?;
    Ok(Tree::from_outline(&outline)?)
}

/// Builds pipeline options from command-line flags and config defaults.
///
/// Include filters run before exclude filters, each in folder, project,
/// context, task, project completion, task completion order. Completion
/// patterns go through alias resolution first.
pub fn pipeline_options(args: &FilterArgs, config: &Config) -> PipelineOptions {
    let completion = |pattern: &Option<String>| {
        pattern.as_deref().map(|p| config.resolve_alias(p))
    };

    let includes = [
        (FilterTarget::FolderName, args.folder.clone()),
        (FilterTarget::ProjectName, args.project.clone()),
        (FilterTarget::ContextName, args.context.clone()),
        (FilterTarget::TaskName, args.task.clone()),
        (FilterTarget::ProjectCompletion, completion(&args.project_done)),
        (FilterTarget::TaskCompletion, completion(&args.task_done)),
    ];
    let excludes = [
        (FilterTarget::FolderName, args.exclude_folder.clone()),
        (FilterTarget::ProjectName, args.exclude_project.clone()),
        (FilterTarget::ContextName, args.exclude_context.clone()),
        (FilterTarget::TaskName, args.exclude_task.clone()),
        (FilterTarget::ProjectCompletion, completion(&args.exclude_project_done)),
        (FilterTarget::TaskCompletion, completion(&args.exclude_task_done)),
    ];

    let mut filters = Vec::new();
    for (include, specs) in [(true, includes), (false, excludes)] {
        for (target, pattern) in specs {
            if let Some(pattern) = pattern {
                filters.push(FilterSpec {
                    target,
                    pattern: Some(pattern),
                    include,
                });
            }
        }
    }

    let prune = if args.no_prune {
        false
    } else {
        args.prune || config.pipeline.prune.unwrap_or(true)
    };

    PipelineOptions {
        filters,
        flatten: args.flatten || config.pipeline.flatten.unwrap_or(false),
        sort: args.sort || config.pipeline.sort.unwrap_or(false),
        prune,
        today: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args() -> FilterArgs {
        FilterArgs {
            file: PathBuf::from("tasks.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_flags_only_prunes() {
        let options = pipeline_options(&args(), &Config::default());
        assert!(options.filters.is_empty());
        assert!(options.prune);
        assert!(!options.flatten);
        assert!(!options.sort);
    }

    #[test]
    fn test_filter_order_and_direction() {
        let args = FilterArgs {
            task: Some("t".into()),
            folder: Some("f".into()),
            exclude_folder: Some("xf".into()),
            task_done: Some("d".into()),
            exclude_project: Some("xp".into()),
            ..args()
        };
        let options = pipeline_options(&args, &Config::default());
        let summary: Vec<_> = options
            .filters
            .iter()
            .map(|f| (f.target, f.pattern.as_deref().unwrap(), f.include))
            .collect();
        assert_eq!(
            summary,
            vec![
                (FilterTarget::FolderName, "f", true),
                (FilterTarget::TaskName, "t", true),
                (FilterTarget::TaskCompletion, "d", true),
                (FilterTarget::FolderName, "xf", false),
                (FilterTarget::ProjectName, "xp", false),
            ]
        );
    }

    #[test]
    fn test_aliases_apply_to_completion_patterns_only() {
        let args = FilterArgs {
            task: Some("today".into()),
            task_done: Some("today".into()),
            exclude_project_done: Some("yesterday".into()),
            ..args()
        };
        let options = pipeline_options(&args, &Config::default());
        let patterns: Vec<_> = options
            .filters
            .iter()
            .map(|f| f.pattern.clone().unwrap())
            .collect();
        assert_eq!(patterns, vec!["today", "-0d$", "-1d$"]);
    }

    #[test]
    fn test_config_pipeline_defaults() {
        let mut config = Config::default();
        config.pipeline.prune = Some(false);
        config.pipeline.flatten = Some(true);

        let options = pipeline_options(&args(), &config);
        assert!(!options.prune);
        assert!(options.flatten);

        // Flags win over config.
        let forced = FilterArgs {
            prune: true,
            ..args()
        };
        assert!(pipeline_options(&forced, &config).prune);

        let disabled = FilterArgs {
            no_prune: true,
            ..args()
        };
        assert!(!pipeline_options(&disabled, &Config::default()).prune);
    }

    #[test]
    fn test_read_tree_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"kind":"project","name":"P","children":[{"kind":"task","name":"t"}]}]"#,
        )
        .unwrap();

        let tree = read_tree(&path).unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_read_tree_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = read_tree(&temp_dir.path().join("missing.json"));
        assert!(matches!(missing, Err(CommandError::Io(_))));

        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(read_tree(&path), Err(CommandError::Json(_))));

        let nested = r#"[{"kind":"task","name":"t","children":[{"kind":"folder","name":"f"}]}]"#;
        fs::write(&path, nested).unwrap();
        assert!(matches!(
            read_tree(&path),
            Err(CommandError::Document(_))
        ));
    }
}
