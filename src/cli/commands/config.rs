//! `dronemass config` command - Configuration management
//!
//! Provides commands to view and modify calculator configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., database, report_dir)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of the local config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of the local config
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("database", "Path to the component catalog and history database"),
    ("report_dir", "Directory where report files are saved"),
    (
        "default_format",
        "Default output format (yaml, json, tsv, csv, md)",
    ),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    // If a specific key is requested, show just that value
    if let Some(key) = &args.key {
        ensure_valid_key(key)?;
        let value = get_config_value(&config, global, key);
        println!("{}", value);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();

    for (key, _) in VALID_KEYS {
        println!(
            "  {}: {}",
            style(key).cyan(),
            style(get_config_value(&config, global, key)).yellow()
        );
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command line (--db, --format)");
    println!("  2. Environment variables (DRONEMASS_DB, DRONEMASS_REPORT_DIR, DRONEMASS_FORMAT)");
    println!("  3. Local config (./{})", crate::core::config::LOCAL_CONFIG_FILE);
    println!("  4. Global config (~/.config/dronemass/config.yaml)");

    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    ensure_valid_key(&args.key)?;
    let config_path = config_path(args.global)?;

    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "local" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    let config_path = config_path(args.global)?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = config_map
        .remove(&serde_yml::Value::String(args.key.clone()))
        .is_some();

    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "local" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = config_path(true)?;
    let local_path = Config::local_config_path();

    println!("{}", style("Configuration file paths:").bold());
    println!();
    for (label, path) in [("Global:", global_path), ("Local: ", local_path)] {
        println!("  {} {}", style(label).cyan(), path.display());
        if path.exists() {
            println!("          {}", style("(exists)").green());
        } else {
            println!("          {}", style("(not created)").dim());
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'dronemass config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn ensure_valid_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            "Unknown config key '{}'. Run 'dronemass config keys' to list valid keys",
            key
        ))
    }
}

fn config_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_config_path()
            .ok_or_else(|| miette::miette!("Could not determine global config directory"))
    } else {
        Ok(Config::local_config_path())
    }
}

fn read_mapping(path: &std::path::Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content) {
        Ok(serde_yml::Value::Mapping(map)) => Ok(map),
        // Empty or null files start a fresh mapping
        Ok(_) => Ok(serde_yml::Mapping::new()),
        Err(e) => Err(miette::miette!(
            "Cannot parse {}: {}",
            path.display(),
            e
        )),
    }
}

fn get_config_value(config: &Config, global: &GlobalOpts, key: &str) -> String {
    match key {
        "database" => global
            .db
            .clone()
            .unwrap_or_else(|| config.database_path())
            .display()
            .to_string(),
        "report_dir" => config.report_dir().display().to_string(),
        "default_format" => config
            .default_format
            .clone()
            .unwrap_or_else(|| "auto".to_string()),
        _ => String::new(),
    }
}
