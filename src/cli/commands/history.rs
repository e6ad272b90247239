//! `dronemass history` command - Saved calculations

use clap::Subcommand;
use console::style;
use csv::WriterBuilder;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::helpers::{open_store, or_dash, render_table, resolve_format, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{compute, format_mass, ComponentSlot, Config, HistoryRecord};

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved calculations, newest first
    List(ListArgs),

    /// Show a saved calculation
    Show(IdArgs),

    /// Delete a saved calculation
    Delete(IdArgs),

    /// Export history as CSV
    Export(ExportArgs),

    /// Delete every saved calculation
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Maximum number of records
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Calculation ID
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Write CSV to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Maximum number of records
    #[arg(long, short = 'n', default_value = "1000")]
    pub limit: usize,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: HistoryCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        HistoryCommands::List(args) => run_list(args, global),
        HistoryCommands::Show(args) => run_show(args, global),
        HistoryCommands::Delete(args) => run_delete(args, global),
        HistoryCommands::Export(args) => run_export(args, global),
        HistoryCommands::Clear(args) => run_clear(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let store = open_store(global, &config)?;
    let records = store
        .calculation_history(args.limit)
        .map_err(|e| miette::miette!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&records).into_diagnostic()?);
        }
        _ => {
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        or_dash(r.id),
                        r.timestamp.clone(),
                        format!("{:.1}", r.total_mass),
                        r.slots.len().to_string(),
                        truncate_str(&component_names(r), 50),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_table(
                    &["ID", "Timestamp", "Total (g)", "Slots", "Components"],
                    &rows,
                    format
                )
            );
            if format == OutputFormat::Auto && !global.quiet {
                println!();
                println!("{} calculation(s) found", style(records.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_show(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let store = open_store(global, &config)?;
    let record = store
        .get_calculation(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&record).into_diagnostic()?);
        }
        _ => {
            let result = compute(&record.to_selection());
            println!(
                "{} #{}  {}",
                style("Calculation").bold(),
                args.id,
                style(&record.timestamp).dim()
            );
            println!();

            let rows: Vec<Vec<String>> = record
                .slots
                .iter()
                .map(|(slot, entry)| {
                    vec![
                        slot.to_string(),
                        or_dash(entry.id),
                        or_dash(entry.name.as_deref()),
                        or_dash(entry.mass.map(|m| format!("{:.1}", m))),
                        or_dash(entry.qty),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_table(&["Slot", "Catalog ID", "Model", "Unit (g)", "Qty"], &rows, format)
            );
            println!();
            println!("{} {}", style("Total mass:").bold(), format_mass(record.total_mass));
            println!("{} {}", style("Category:").bold(), result.category().label());
        }
    }

    Ok(())
}

fn run_delete(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config)?;
    store
        .delete_calculation(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!("{} Deleted calculation #{}", style("✓").green(), args.id);
    }
    Ok(())
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config)?;
    let records = store
        .calculation_history(args.limit)
        .map_err(|e| miette::miette!("{}", e))?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).into_diagnostic()?),
        None => Box::new(io::stdout()),
    };
    write_csv(&records, sink)?;

    if let Some(path) = &args.output {
        if !global.quiet {
            eprintln!(
                "{} Exported {} calculation(s) to {}",
                style("✓").green(),
                records.len(),
                path.display()
            );
        }
    }
    Ok(())
}

fn run_clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all saved calculations?")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config::load();
    let store = open_store(global, &config)?;
    let removed = store
        .clear_history()
        .map_err(|e| miette::miette!("{}", e))?;

    if global.quiet {
        println!("{}", removed);
    } else {
        println!(
            "{} Cleared history ({} calculation(s) removed)",
            style("✓").green(),
            style(removed).yellow()
        );
    }
    Ok(())
}

/// Write records as CSV with the flattened history columns
fn write_csv<W: Write>(records: &[HistoryRecord], sink: W) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(sink);
    writer.write_record(HistoryRecord::columns()).into_diagnostic()?;
    for record in records {
        writer.write_record(record.values()).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    Ok(())
}

/// Comma-separated model names in slot order
fn component_names(record: &HistoryRecord) -> String {
    ComponentSlot::ALL
        .iter()
        .filter_map(|slot| record.slots.get(slot))
        .filter_map(|entry| entry.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
}
