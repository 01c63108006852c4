//! Pismo - dual-script (Cyrillic/Latin) toolkit.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use pismo::{ConfigHandle, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Convert { args } => cli::convert::run_convert(args),
        Commands::Slug { text } => cli::inspect::run_slug(text),
        Commands::Url { to, url } => {
            let handle = load_config(&cli)?;
            cli::inspect::run_url(&handle.get(), *to, url)
        }
        Commands::Resolve { args } => {
            let handle = load_config(&cli)?;
            cli::inspect::run_resolve(&handle.get(), args)
        }
        Commands::Serve { args } => {
            // Before binding, so Ctrl+C during startup still exits
            cli::serve::setup_shutdown_handler()?;
            let handle = load_config(&cli)?;
            cli::serve::run_serve(&handle, args)
        }
    }
}

/// Load the config file; a missing file gives the defaults.
fn load_config(cli: &Cli) -> Result<ConfigHandle> {
    Ok(ConfigHandle::load(cli.config.clone())?)
}
