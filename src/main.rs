//! Atrium - A static site generator for a landing page and people directory.

mod admin;
mod build;
mod cli;
mod config;
mod content;
mod generator;
mod init;
mod integrations;
mod render;
mod schema;
mod serve;
mod store;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::{build_site, load_content};
use clap::Parser;
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};
use init::new_site;
use schema::AuthoringConfig;
use serve::serve_site;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    init_config(load_config(cli)?);
    let config = cfg();

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { .. } => build_site(&config).map(|_| ()),
        Commands::Check => {
            let content = load_content(&config)?;
            log!("check"; "landing ok, {} people ok", content.people.len());
            Ok(())
        }
        Commands::Schema => {
            println!("{}", AuthoringConfig::new(&config).to_json());
            Ok(())
        }
        Commands::Serve { .. } => {
            build_site(&config)?;
            serve_site()
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load(cli)?;

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}
