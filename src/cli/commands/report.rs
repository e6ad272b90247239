//! `dronemass report` command - Re-render the text report of a saved calculation

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{open_store, write_output};
use crate::cli::GlobalOpts;
use crate::core::{compute, save_report, Config, Reporter};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Calculation ID from history
    pub id: i64,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Save the report to the configured report directory
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config)?;
    let record = store
        .get_calculation(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let result = compute(&record.to_selection());
    let text = Reporter::new().with_calculation_id(args.id).render(&result);

    if args.save {
        let path = save_report(&text, &config.report_dir(), None)
            .map_err(|e| miette::miette!("{}", e))?;
        if !global.quiet {
            eprintln!("{} Report saved to {}", style("✓").green(), path.display());
        }
        if args.output.is_none() {
            return Ok(());
        }
    }

    write_output(&text, args.output.as_deref())
}
