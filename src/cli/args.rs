//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    calc::CalcArgs, catalog::CatalogCommands, completions::CompletionsArgs,
    config::ConfigCommands, history::HistoryCommands, report::ReportArgs,
};

#[derive(Parser)]
#[command(name = "dronemass")]
#[command(author, version, about = "Drone Mass Calculator")]
#[command(long_about = "Compute the take-off mass of a UAV from its components, classify it into a weight category and generate text reports.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Component database (default: from config, then the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate the mass of a drone configuration
    Calc(CalcArgs),

    /// Component catalog management
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Calculation history
    #[command(subcommand)]
    History(HistoryCommands),

    /// Generate a text report for a saved calculation
    Report(ReportArgs),

    /// Show and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
