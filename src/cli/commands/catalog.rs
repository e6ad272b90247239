//! `dronemass catalog` command - Component catalog management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, or_dash, render_table, resolve_format, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{validate_mass, CatalogComponent, ComponentSlot, Config, NewComponent};

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List catalog components (all slots, or one)
    List(ListArgs),

    /// Show a single component
    Show(ShowArgs),

    /// Add a component to the catalog
    Add(AddArgs),

    /// Update a component's fields
    Update(UpdateArgs),

    /// Delete a component from the catalog
    Delete(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list this slot (frame, motor, battery, flight_controller, propeller, camera)
    pub slot: Option<ComponentSlot>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Component slot
    pub slot: ComponentSlot,

    /// Component ID within the slot
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Component slot
    pub slot: ComponentSlot,

    /// Model name
    #[arg(long)]
    pub name: String,

    /// Unit mass in grams
    #[arg(long)]
    pub mass: f64,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,

    /// Slot-specific attribute (battery capacity in mAh, propeller size)
    #[arg(long)]
    pub extra: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Component slot
    pub slot: ComponentSlot,

    /// Component ID within the slot
    pub id: i64,

    /// New model name
    #[arg(long)]
    pub name: Option<String>,

    /// New unit mass in grams
    #[arg(long)]
    pub mass: Option<f64>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New slot-specific attribute
    #[arg(long)]
    pub extra: Option<String>,
}

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatalogCommands::List(args) => run_list(args, global),
        CatalogCommands::Show(args) => run_show(args, global),
        CatalogCommands::Add(args) => run_add(args, global),
        CatalogCommands::Update(args) => run_update(args, global),
        CatalogCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let store = open_store(global, &config)?;

    let slots: Vec<ComponentSlot> = match args.slot {
        Some(slot) => vec![slot],
        None => ComponentSlot::ALL.to_vec(),
    };

    let mut components: Vec<CatalogComponent> = Vec::new();
    for slot in slots {
        components.extend(
            store
                .list_components(slot)
                .map_err(|e| miette::miette!("{}", e))?,
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&components).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&components).into_diagnostic()?);
        }
        _ => {
            let rows: Vec<Vec<String>> = components
                .iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.slot.to_string(),
                        truncate_str(&c.name, 28),
                        format!("{:.1}", c.mass),
                        or_dash(c.extra.as_deref()),
                        truncate_str(c.description.as_deref().unwrap_or(""), 40),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_table(
                    &["ID", "Slot", "Name", "Mass (g)", "Extra", "Description"],
                    &rows,
                    format
                )
            );
            if format == OutputFormat::Auto && !global.quiet {
                println!();
                println!("{} component(s) found", style(components.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let store = open_store(global, &config)?;
    let component = store
        .get_component(args.slot, args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&component).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            println!("{}", style(&component.name).bold());
            println!("{}", style("─".repeat(40)).dim());
            println!("  Slot:        {}", component.slot);
            println!("  ID:          {}", component.id);
            println!("  Mass:        {:.1} г", component.mass);
            if let Some(column) = component.slot.extra_column() {
                println!("  {:<12} {}", format!("{}:", column), or_dash(component.extra.as_deref()));
            }
            println!("  Description: {}", or_dash(component.description.as_deref()));
        }
        _ => {
            print!("{}", serde_yml::to_string(&component).into_diagnostic()?);
        }
    }

    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    validate_mass(args.mass).map_err(|e| miette::miette!("{}", e))?;

    let config = Config::load();
    let store = open_store(global, &config)?;
    let id = store
        .add_component(
            args.slot,
            &NewComponent {
                name: args.name.clone(),
                mass: args.mass,
                description: args.description,
                extra: args.extra,
            },
        )
        .map_err(|e| miette::miette!("{}", e))?;

    if global.quiet {
        println!("{}", id);
    } else {
        println!(
            "{} Added {} {} with ID {}",
            style("✓").green(),
            args.slot,
            style(&args.name).cyan(),
            style(id).yellow()
        );
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    if let Some(mass) = args.mass {
        validate_mass(mass).map_err(|e| miette::miette!("{}", e))?;
    }

    let config = Config::load();
    let store = open_store(global, &config)?;
    let existing = store
        .get_component(args.slot, args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let updated = NewComponent {
        name: args.name.unwrap_or(existing.name),
        mass: args.mass.unwrap_or(existing.mass),
        description: args.description.or(existing.description),
        extra: args.extra.or(existing.extra),
    };
    store
        .update_component(args.slot, args.id, &updated)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Updated {} {}",
            style("✓").green(),
            args.slot,
            style(args.id).yellow()
        );
    }
    Ok(())
}

fn run_delete(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config)?;
    store
        .delete_component(args.slot, args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Deleted {} {}",
            style("✓").green(),
            args.slot,
            style(args.id).yellow()
        );
    }
    Ok(())
}
