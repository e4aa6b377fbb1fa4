//! Conductor - drives an external site renderer from a dev server and a
//! production build.

mod cli;
mod config;
mod image;
mod logger;
mod orchestrator;
mod reload;
mod runtime;
mod serve;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{ConductorConfig, load_dotenv};
use orchestrator::INTERRUPT;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ConductorConfig::load(&cli)?;
    load_dotenv(&config.dotenv_path());

    // One process handler; commands attach their cleanup later
    INTERRUPT.install()?;

    match &cli.command {
        Commands::Build => cli::build::build_site(&config),
        Commands::Serve { .. } => cli::serve::serve_site(&config),
        Commands::Clean => cli::clean::clean_site(&config),
    }
}
