//! `dronemass calc` command - Calculate the mass of a configuration
//!
//! A selection is assembled from (in order, later sources override earlier
//! ones for the same slot):
//! - a YAML/JSON selection file (`--file`)
//! - catalog picks (`-c motor=2:4`)
//! - interactive prompts (`--interactive`)
//! - custom components (`--custom camera="My Cam:120"`)
//!
//! The selection is validated, computed and printed as a breakdown table,
//! a full text report, or JSON/YAML.

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::chart::render_distribution;
use crate::cli::helpers::{open_store, render_table, resolve_format, truncate_str, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    compute, distribution, format_mass, save_report, validate_mass, validate_quantity,
    validate_selection, CalculationResult, ComponentSelection, ComponentSlot, Config,
    HistoryRecord, MassDistribution, Reporter, Selection, Store, WeightCategory,
};

/// Width of the distribution chart bars
const CHART_WIDTH: usize = 30;

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    /// Pick a catalog component: SLOT=ID or SLOT=ID:QTY (repeatable)
    #[arg(long = "component", short = 'c', value_name = "SLOT=ID[:QTY]")]
    pub components: Vec<CatalogPick>,

    /// Use a component that is not in the catalog: SLOT=NAME:MASS[:QTY] (repeatable)
    #[arg(long, value_name = "SLOT=NAME:MASS[:QTY]")]
    pub custom: Vec<CustomPick>,

    /// Read the selection from a YAML or JSON file
    #[arg(long, short = 'F', value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Choose components interactively from the catalog
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Drop slots that fail validation instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Save the calculation to history
    #[arg(long)]
    pub save: bool,

    /// Print the full text report instead of the summary table
    #[arg(long)]
    pub report: bool,

    /// Save the text report to the configured report directory
    #[arg(long)]
    pub save_report: bool,

    /// Write output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Show the mass distribution chart
    #[arg(long)]
    pub chart: bool,
}

/// `SLOT=ID[:QTY]` - a component taken from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPick {
    pub slot: ComponentSlot,
    pub id: i64,
    pub quantity: Option<u32>,
}

impl FromStr for CatalogPick {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (slot, rest) = split_slot(s)?;
        let (id, quantity) = match rest.split_once(':') {
            Some((id, qty)) => (id, Some(parse_quantity(qty)?)),
            None => (rest, None),
        };
        let id = id
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid component ID '{}' in '{}'", id, s))?;
        Ok(Self { slot, id, quantity })
    }
}

/// `SLOT=NAME:MASS[:QTY]` - an ad-hoc component
#[derive(Debug, Clone, PartialEq)]
pub struct CustomPick {
    pub slot: ComponentSlot,
    pub component: ComponentSelection,
}

impl FromStr for CustomPick {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (slot, rest) = split_slot(s)?;
        let parts: Vec<&str> = rest.split(':').collect();

        // Names may contain ':' so numbers are taken from the right.
        let (name_parts, mass, quantity) = match parts.as_slice() {
            [name @ .., mass, qty]
                if !name.is_empty()
                    && mass.trim().parse::<f64>().is_ok()
                    && qty.trim().parse::<i64>().is_ok() =>
            {
                (name, *mass, Some(parse_quantity(qty)?))
            }
            [name @ .., mass] if !name.is_empty() => (name, *mass, None),
            _ => return Err(format!("Expected SLOT=NAME:MASS[:QTY], got '{}'", s)),
        };

        let name = name_parts.join(":");
        if name.trim().is_empty() {
            return Err(format!("Component name is empty in '{}'", s));
        }
        let mass = mass
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid mass '{}' in '{}'", mass, s))?;

        Ok(Self {
            slot,
            component: ComponentSelection {
                id: None,
                name: Some(name.trim().to_string()),
                unit_mass: Some(mass),
                quantity,
            },
        })
    }
}

fn split_slot(s: &str) -> std::result::Result<(ComponentSlot, &str), String> {
    let (slot, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected SLOT=..., got '{}'", s))?;
    Ok((slot.parse::<ComponentSlot>()?, rest))
}

fn parse_quantity(s: &str) -> std::result::Result<u32, String> {
    let qty = s
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid quantity '{}'", s))?;
    validate_quantity(qty).map_err(|e| e.to_string())?;
    u32::try_from(qty).map_err(|_| format!("Invalid quantity '{}'", s))
}

/// Machine-readable calculation output
#[derive(Serialize)]
struct CalcOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    history_id: Option<i64>,
    selection: &'a Selection,
    result: &'a CalculationResult,
    category: WeightCategory,
    formatted_mass: String,
    distribution: &'a MassDistribution,
    recommendations: Vec<String>,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);

    let needs_store = !args.components.is_empty() || args.interactive || args.save;
    let store = if needs_store {
        Some(open_store(global, &config)?)
    } else {
        None
    };

    let selection = build_selection(&args, store.as_ref())?;
    let selection = gate(selection, args.skip_invalid, global)?;

    let result = compute(&selection);
    let dist = distribution(&selection);
    tracing::debug!(
        total_mass = result.total_mass,
        components = result.component_count,
        "calculation complete"
    );

    if result.component_count == 0 && !global.quiet {
        eprintln!(
            "{} No components selected - the result is empty",
            style("!").yellow()
        );
    }

    let mut history_id = None;
    if args.save {
        result
            .ensure_reportable()
            .map_err(|e| miette::miette!("Not saved: {}", e))?;
        if let Some(store) = store.as_ref() {
            let record =
                HistoryRecord::from_calculation(&selection, &result, Local::now().naive_local());
            let id = store
                .save_calculation(&record)
                .map_err(|e| miette::miette!("{}", e))?;
            if !global.quiet {
                eprintln!("{} Saved calculation #{}", style("✓").green(), id);
            }
            history_id = Some(id);
        }
    }

    let mut reporter = Reporter::new();
    if let Some(id) = history_id {
        reporter = reporter.with_calculation_id(id);
    }

    if args.save_report {
        let text = reporter.render(&result);
        let path = save_report(&text, &config.report_dir(), None)
            .map_err(|e| miette::miette!("{}", e))?;
        if !global.quiet {
            eprintln!("{} Report saved to {}", style("✓").green(), path.display());
        }
    }

    let content = match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let out = CalcOutput {
                history_id,
                selection: &selection,
                result: &result,
                category: result.category(),
                formatted_mass: format_mass(result.total_mass),
                distribution: &dist,
                recommendations: Reporter::recommendations(&result),
            };
            if format == OutputFormat::Json {
                serde_json::to_string_pretty(&out).into_diagnostic()?
            } else {
                serde_yml::to_string(&out).into_diagnostic()?
            }
        }
        _ if args.report => reporter.render(&result),
        _ => {
            let mut text = summary(&result, format);
            if args.chart {
                text.push_str("\n\n");
                text.push_str(&render_distribution(&dist, CHART_WIDTH));
            }
            text
        }
    };

    write_output(&content, args.output.as_deref())
}

/// Assemble the selection from all requested sources
fn build_selection(args: &CalcArgs, store: Option<&Store>) -> Result<Selection> {
    let mut selection = match &args.file {
        Some(path) => load_selection_file(path)?,
        None => Selection::new(),
    };

    if let Some(store) = store {
        for pick in &args.components {
            let component = store
                .get_component(pick.slot, pick.id)
                .map_err(|e| miette::miette!("{}", e))?;
            selection.set(pick.slot, component.to_selection(pick.quantity.unwrap_or(1)));
        }

        if args.interactive {
            prompt_selection(store, &mut selection)?;
        }
    }

    for pick in &args.custom {
        selection.set(pick.slot, pick.component.clone());
    }

    Ok(selection)
}

fn load_selection_file(path: &std::path::Path) -> Result<Selection> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let parsed = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_yml::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| miette::miette!("Invalid selection file {}: {}", path.display(), e))
}

/// Run the validator over the selection, aborting or dropping bad slots
fn gate(selection: Selection, skip_invalid: bool, global: &GlobalOpts) -> Result<Selection> {
    let errors = validate_selection(&selection);
    if errors.is_empty() {
        return Ok(selection);
    }

    if !skip_invalid {
        let details: Vec<String> = errors.iter().map(|e| format!("  {}", e)).collect();
        return Err(miette::miette!(
            "Invalid component values:\n{}\n\nFix the values or pass --skip-invalid to drop these slots",
            details.join("\n")
        ));
    }

    let mut selection = selection;
    for error in &errors {
        tracing::warn!(slot = %error.slot, error = %error.error, "dropping invalid slot");
        if !global.quiet {
            eprintln!("{} Skipped {}", style("!").yellow(), error);
        }
        selection = selection.without(error.slot);
    }
    Ok(selection)
}

/// Ask for one component per slot from the catalog
fn prompt_selection(store: &Store, selection: &mut Selection) -> Result<()> {
    let theme = ColorfulTheme::default();

    for slot in ComponentSlot::ALL {
        let components = store
            .list_components(slot)
            .map_err(|e| miette::miette!("{}", e))?;

        let mut items = vec!["(не выбран)".to_string()];
        items.extend(
            components
                .iter()
                .map(|c| format!("{} - {:.1} г", c.name, c.mass)),
        );

        let choice = Select::with_theme(&theme)
            .with_prompt(slot.title())
            .items(&items)
            .default(0)
            .interact()
            .into_diagnostic()?;
        if choice == 0 {
            continue;
        }

        let default_qty: u32 = match slot {
            ComponentSlot::Motor | ComponentSlot::Propeller => 4,
            _ => 1,
        };
        let qty: u32 = Input::with_theme(&theme)
            .with_prompt("Количество")
            .default(default_qty)
            .validate_with(|q: &u32| validate_quantity(i64::from(*q)).map_err(|e| e.to_string()))
            .interact_text()
            .into_diagnostic()?;

        let component = &components[choice - 1];
        validate_mass(component.mass).map_err(|e| miette::miette!("{}: {}", slot, e))?;
        selection.set(slot, component.to_selection(qty));
    }

    Ok(())
}

/// Breakdown table plus total and category lines
fn summary(result: &CalculationResult, format: OutputFormat) -> String {
    let rows: Vec<Vec<String>> = result
        .per_component
        .iter()
        .map(|(slot, c)| {
            vec![
                slot.to_string(),
                truncate_str(&c.name, 30),
                format!("{:.1}", c.unit_mass),
                c.quantity.to_string(),
                format!("{:.1}", c.total_mass),
                format!("{:.1}%", result.share_of(*slot)),
            ]
        })
        .collect();

    let table = render_table(
        &["Slot", "Model", "Unit (g)", "Qty", "Total (g)", "Share"],
        &rows,
        format,
    );

    match format {
        OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Id => table,
        _ => format!(
            "{}\n\n{} {}\n{} {}",
            table,
            style("Total mass:").bold(),
            format_mass(result.total_mass),
            style("Category:").bold(),
            result.category().label()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_pick() {
        let pick: CatalogPick = "motor=2:4".parse().unwrap();
        assert_eq!(pick.slot, ComponentSlot::Motor);
        assert_eq!(pick.id, 2);
        assert_eq!(pick.quantity, Some(4));

        let pick: CatalogPick = "fc=5".parse().unwrap();
        assert_eq!(pick.slot, ComponentSlot::FlightController);
        assert_eq!(pick.quantity, None);
    }

    #[test]
    fn test_parse_catalog_pick_rejects_bad_input() {
        assert!("motor".parse::<CatalogPick>().is_err());
        assert!("rotor=1".parse::<CatalogPick>().is_err());
        assert!("motor=x".parse::<CatalogPick>().is_err());
        assert!("motor=1:-1".parse::<CatalogPick>().is_err());
        assert!("motor=1:101".parse::<CatalogPick>().is_err());
    }

    #[test]
    fn test_parse_custom_pick() {
        let pick: CustomPick = "camera=My Cam:120.5".parse().unwrap();
        assert_eq!(pick.slot, ComponentSlot::Camera);
        assert_eq!(pick.component.name.as_deref(), Some("My Cam"));
        assert_eq!(pick.component.unit_mass, Some(120.5));
        assert_eq!(pick.component.quantity, None);

        let pick: CustomPick = "motor=Test Motor:50:4".parse().unwrap();
        assert_eq!(pick.component.quantity, Some(4));

        let pick: CustomPick = "frame=Rig: v2:300".parse().unwrap();
        assert_eq!(pick.component.name.as_deref(), Some("Rig: v2"));
        assert_eq!(pick.component.unit_mass, Some(300.0));
    }

    #[test]
    fn test_parse_custom_pick_rejects_bad_input() {
        assert!("camera=120".parse::<CustomPick>().is_err());
        assert!("camera=Cam:heavy".parse::<CustomPick>().is_err());
        assert!("camera=:10".parse::<CustomPick>().is_err());
    }

    #[test]
    fn test_gate_aborts_or_drops() {
        let opts = GlobalOpts {
            format: OutputFormat::Auto,
            quiet: true,
            verbose: false,
            db: None,
        };
        let selection = Selection::new()
            .with(ComponentSlot::Frame, ComponentSelection::new("Ok", 100.0, 1))
            .with(ComponentSlot::Camera, ComponentSelection::new("Bad", -5.0, 1));

        assert!(gate(selection.clone(), false, &opts).is_err());

        let kept = gate(selection, true, &opts).unwrap();
        assert!(kept.frame.is_some());
        assert!(kept.camera.is_none());
    }

    #[test]
    fn test_summary_tsv() {
        let result = compute(
            &Selection::new()
                .with(ComponentSlot::Frame, ComponentSelection::new("Test Frame", 100.0, 1))
                .with(ComponentSlot::Motor, ComponentSelection::new("Test Motor", 50.0, 4)),
        );
        let tsv = summary(&result, OutputFormat::Tsv);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "frame\tTest Frame\t100.0\t1\t100.0\t33.3%");
        assert_eq!(lines[2], "motor\tTest Motor\t50.0\t4\t200.0\t66.7%");
    }
}
