use anyhow::{Context, Result};
use clap::Parser;
use prometheus_receiver_config::load;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Clone)]
pub struct Arguments {
    /// The receiver configuration to check. The format is taken from the
    /// extension: `.yaml`, `.yml`, `.json` or `.toml`.
    #[clap(env = "PROMRECV_CONFIG")]
    config: PathBuf,
}

pub fn handle_command(args: Arguments) -> Result<()> {
    let config = load::from_path(&args.config)
        .with_context(|| format!("Configuration {} is not valid", args.config.display()))?;

    info!(
        path = ?args.config,
        jobs = config.scrape_configs().len(),
        target_allocator = config.target_allocator().is_some(),
        "Configuration is valid"
    );

    Ok(())
}
