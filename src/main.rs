//! Folio - Ingestion and indexing for a file-based essay collection.

mod build;
mod cli;
mod config;
mod data;
mod layouts;
mod logger;
mod source;

use anyhow::{Result, bail};
use build::{build_site, check_site, list_site, show_document};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { drafts } => {
            build_site(&config, drafts.unwrap_or(config.build.show_drafts)).map(|_| ())
        }
        Commands::Check => {
            let report = check_site(&config)?;
            match report.problems() {
                0 => Ok(()),
                n => bail!("{n} problem(s) found"),
            }
        }
        Commands::List { drafts } => {
            for line in list_site(&config, *drafts)? {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Show { id } => {
            println!("{}", show_document(&config, id)?);
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load(cli)?;
    if !config.config_path.exists() {
        log!("warn"; "`{}` not found, using defaults", config.config_path.display());
    }
    config.validate()?;
    Ok(config)
}
