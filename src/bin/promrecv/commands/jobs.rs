use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use prometheus_receiver_config::load;
use std::path::PathBuf;

#[derive(Parser, Clone)]
pub struct Arguments {
    /// The receiver configuration to list the jobs of.
    #[clap(env = "PROMRECV_CONFIG")]
    config: PathBuf,
}

pub fn handle_command(args: Arguments) -> Result<()> {
    let config = load::from_path(&args.config)
        .with_context(|| format!("Configuration {} is not valid", args.config.display()))?;

    for scrape_config in config.scrape_configs() {
        let job = &scrape_config.job;
        let interval = job
            .scrape_interval
            .map(|interval| humantime::format_duration(interval).to_string())
            .unwrap_or_default();
        let discovery = scrape_config
            .service_discovery_configs()
            .iter()
            .map(|config| config.name())
            .dedup()
            .join(", ");

        println!(
            "{}\tevery {}\t{}\t[{}]",
            job.job_name, interval, job.metrics_path, discovery
        );
    }

    if let Some(target_allocator) = config.target_allocator() {
        println!(
            "target allocator {} as {:?} every {}",
            target_allocator.endpoint(),
            target_allocator.collector_id,
            humantime::format_duration(target_allocator.interval)
        );
    }

    Ok(())
}
