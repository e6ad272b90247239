use clap::Parser;
use dronemass::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Calc(args) => dronemass::cli::commands::calc::run(args, &global),
        Commands::Catalog(cmd) => dronemass::cli::commands::catalog::run(cmd, &global),
        Commands::History(cmd) => dronemass::cli::commands::history::run(cmd, &global),
        Commands::Report(args) => dronemass::cli::commands::report::run(args, &global),
        Commands::Config(cmd) => dronemass::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => dronemass::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from `--verbose`/`--quiet`
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
