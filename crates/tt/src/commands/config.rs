//! Config command implementation.
//!
//! View and create configuration settings.
//! Config file is located at ~/.config/tt/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Completion aliases available without any configuration.
const BUILTIN_ALIASES: &[(&str, &str)] = &[("today", "-0d$"), ("yesterday", "-1d$")];

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# tt - task outline filter configuration

# Config schema version (do not modify)
version = 1

# Passes run after the filters unless overridden on the command line
[pipeline]
# prune = true     # Hide folders, projects and contexts left empty
# flatten = false  # Promote sub-tasks into their project or context
# sort = false     # Order project children by completion time

# Names usable in place of a completion pattern (--task-done, --project-done).
# Completion patterns are searched in strings like
# "2024-03-14 Thursday March -2d".
[aliases]
# this-week = "-[0-6]d$"
# fridays = "Friday"

# Output preferences
[output]
# color = true     # Enable colors (respects NO_COLOR env)
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Pipeline defaults.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Completion pattern aliases.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            pipeline: PipelineConfig::default(),
            aliases: BTreeMap::new(),
            output: OutputConfig::default(),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Prune empty containers (default true).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,

    /// Flatten sub-tasks (default false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,

    /// Sort project children by completion (default false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<bool>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl Config {
    /// Resolves a completion pattern alias.
    ///
    /// Aliases from the config file win over the built-in ones. Anything that
    /// is not an alias is returned as a pattern unchanged.
    pub fn resolve_alias(&self, pattern: &str) -> String {
        if let Some(resolved) = self.aliases.get(pattern) {
            return resolved.clone();
        }
        BUILTIN_ALIASES
            .iter()
            .find(|(name, _)| *name == pattern)
            .map(|(_, resolved)| (*resolved).to_string())
            .unwrap_or_else(|| pattern.to_string())
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/tt/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    // Use XDG_CONFIG_HOME if set, otherwise ~/.config/tt
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("tt"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tt"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("TT_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    debug!("loaded config from {}", path.display());
    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    // Version 1 is the initial schema; later versions add their steps here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[pipeline]");
        println!("  prune: {}", config.pipeline.prune.unwrap_or(true));
        println!("  flatten: {}", config.pipeline.flatten.unwrap_or(false));
        println!("  sort: {}", config.pipeline.sort.unwrap_or(false));

        println!("\n[aliases]");
        for (name, pattern) in BUILTIN_ALIASES {
            if !config.aliases.contains_key(*name) {
                println!("  {} = {:?} (built-in)", name, pattern);
            }
        }
        for (name, pattern) in &config.aliases {
            println!("  {} = {:?}", name, pattern);
        }

        println!("\n[output]");
        println!("  color: {}", config.output.color.unwrap_or(true));

        if !path.exists() {
            println!("\n(No config file exists. Run 'tt config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    /// Runs `f` with TT_CONFIG pointing at `path`, restoring it afterwards.
    fn with_config_path<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var("TT_CONFIG").ok();
        env::set_var("TT_CONFIG", path);
        let result = f();
        match original {
            Some(val) => env::set_var("TT_CONFIG", val),
            None => env::remove_var("TT_CONFIG"),
        }
        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.pipeline.prune.is_none());
        assert!(config.aliases.is_empty());
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_default_config_text_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.aliases.is_empty());
        assert!(config.pipeline.flatten.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[pipeline]
prune = false
sort = true

[aliases]
week = "-[0-6]d$"

[output]
color = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pipeline.prune, Some(false));
        assert_eq!(config.pipeline.sort, Some(true));
        assert!(config.pipeline.flatten.is_none());
        assert_eq!(config.aliases.get("week").map(String::as_str), Some("-[0-6]d$"));
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        // Missing version defaults to current version
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.pipeline.flatten = Some(true);
        config.aliases.insert("fri".to_string(), "Friday".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[pipeline]"));
        assert!(toml_str.contains("flatten = true"));
        assert!(toml_str.contains("[aliases]"));
        assert!(toml_str.contains("fri = \"Friday\""));
    }

    #[test]
    fn test_resolve_builtin_aliases() {
        let config = Config::default();
        assert_eq!(config.resolve_alias("today"), "-0d$");
        assert_eq!(config.resolve_alias("yesterday"), "-1d$");
        assert_eq!(config.resolve_alias("Friday"), "Friday");
    }

    #[test]
    fn test_config_alias_overrides_builtin() {
        let mut config = Config::default();
        config
            .aliases
            .insert("today".to_string(), "-0d$|-1d$".to_string());
        assert_eq!(config.resolve_alias("today"), "-0d$|-1d$");
        assert_eq!(config.resolve_alias("yesterday"), "-1d$");
    }

    #[test]
    fn test_today_alias_matches_only_today() {
        use chrono::NaiveDate;
        use tasktree_rs::completion_descriptor;

        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let pattern = regex::Regex::new(&Config::default().resolve_alias("today")).unwrap();
        let descriptor = |days: u64| {
            let at = (today - chrono::Days::new(days)).and_hms_opt(9, 0, 0).unwrap();
            completion_descriptor(Some(at), today)
        };

        assert!(pattern.is_match(&descriptor(0)));
        assert!(!pattern.is_match(&descriptor(10)));
        assert!(!pattern.is_match(&descriptor(1)));
        assert!(!pattern.is_match(&completion_descriptor(None, today)));
    }

    #[test]
    fn test_migrate_config_preserves_data() {
        let mut config = Config::default();
        config.pipeline.sort = Some(true);
        config.aliases.insert("a".to_string(), "b".to_string());

        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
        assert_eq!(migrated.pipeline.sort, Some(true));
        assert_eq!(migrated.aliases.len(), 1);
    }

    #[test]
    fn test_migrate_config_rejects_future_version() {
        let config: Config = toml::from_str("version = 999").unwrap();
        assert!(matches!(migrate_config(config), Err(CommandError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let config = with_config_path(&path, load_config).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.aliases.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_config_from_env_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[aliases]\nfri = \"Friday\"\n").unwrap();

        let config = with_config_path(&path, load_config).unwrap();
        assert_eq!(config.resolve_alias("fri"), "Friday");
    }

    #[test]
    #[serial]
    fn test_load_config_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[pipeline\nprune = ").unwrap();

        let result = with_config_path(&path, load_config);
        assert!(matches!(result, Err(CommandError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_init_writes_default_and_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let ctx = quiet_ctx();

        with_config_path(&path, || execute_init(&ctx, false)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        let again = with_config_path(&path, || execute_init(&ctx, false));
        assert!(matches!(again, Err(CommandError::Config(_))));

        fs::write(&path, "version = 1\n").unwrap();
        with_config_path(&path, || execute_init(&ctx, true)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    #[serial]
    fn test_config_path_prefers_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        let resolved = with_config_path(&path, get_config_path).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    #[serial]
    fn test_config_path_uses_xdg_config_home() {
        let temp_dir = TempDir::new().unwrap();
        let original_tt = env::var("TT_CONFIG").ok();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::remove_var("TT_CONFIG");
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());

        let resolved = get_config_path();

        match original_xdg {
            Some(val) => env::set_var("XDG_CONFIG_HOME", val),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        if let Some(val) = original_tt {
            env::set_var("TT_CONFIG", val);
        }

        assert_eq!(
            resolved.unwrap(),
            temp_dir.path().join("tt").join("config.toml")
        );
    }
}
