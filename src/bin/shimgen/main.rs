//! shimgen CLI - generates the nolyfill shim packages

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use shimgen::util::diagnostic;
use shimgen::SynthError;

/// Options shared by every command.
pub struct GlobalOptions {
    pub verbose: bool,
    pub root: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<SynthError>() {
            Some(err) => {
                diagnostic::emit(&err.to_diagnostic(), std::io::stderr().is_terminal());
                std::process::exit(err.exit_code());
            }
            None => {
                eprintln!("error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("shimgen=debug")
    } else {
        EnvFilter::new("shimgen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let global = GlobalOptions {
        verbose: cli.verbose,
        root: cli.root,
        catalog: cli.catalog,
    };

    // Execute command
    match cli.command {
        Commands::Sync(args) => commands::sync::execute(args, &global),
        Commands::Generate(args) => commands::generate::execute(args, &global),
        Commands::List(args) => commands::list::execute(args, &global),
        Commands::Overrides(args) => commands::overrides::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
