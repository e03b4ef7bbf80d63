//! paydash main entry point

use anyhow::Context;
use clap::Parser;
use paydash_api::start_server;
use paydash_client::PaymentsClient;
use paydash_config::{Config, ConfigError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "paydash")]
#[command(version = "0.1.0")]
#[command(about = "Dashboard backend for school-payment transactions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = match Config::load(args.config.clone()) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            return Err(anyhow::anyhow!(e.to_details().to_string()))
                .with_context(|| format!("Failed to load {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let client = PaymentsClient::new(&config.upstream).context("Failed to create upstream client")?;

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, Arc::new(client)))
        .context("Server error")?;

    Ok(())
}
