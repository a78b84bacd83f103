use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prometheus_receiver_config::load;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Clone)]
pub struct Arguments {
    /// The receiver configuration to print.
    #[clap(env = "PROMRECV_CONFIG")]
    config: PathBuf,

    /// The format to print the configuration in.
    #[clap(short, long, value_enum, default_value_t = Output::Yaml)]
    output: Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

pub fn handle_command(args: Arguments) -> Result<()> {
    let config = load::from_path(&args.config)
        .with_context(|| format!("Configuration {} is not valid", args.config.display()))?;

    let stdout = io::stdout().lock();
    match args.output {
        Output::Yaml => serde_yaml::to_writer(stdout, &config)?,
        Output::Json => serde_json::to_writer_pretty(stdout, &config)?,
    }

    Ok(())
}
