use anyhow::{Context, Result};
use clap::Parser;
use commands::{handle_command, Application};
use std::io;
use tracing::{debug, error};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

mod commands;

fn main() {
    let app = Application::parse();

    if let Err(err) = init_logging(app.log_json) {
        eprintln!("Unable to initialize logging: {:#}", err);
        std::process::exit(1);
    }

    match handle_command(app) {
        Ok(_) => debug!("Command completed successfully"),
        Err(err) => {
            error!("Command failed: {:?}", err);
            std::process::exit(1);
        }
    }
}

/// Initialize logging for the application.
///
/// Everything that is level info and higher is logged to stderr. Users are
/// able to influence this by exporting the `RUST_LOG` environment variable,
/// for example `RUST_LOG=prometheus_receiver_config=trace,info` shows every
/// decoding step while keeping other modules at info.
fn init_logging(json: bool) -> Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let log_layer = if json {
        log_layer.json().boxed()
    } else {
        log_layer.boxed()
    };

    Registry::default()
        .with(filter_layer)
        .with(log_layer)
        .try_init()
        .context("unable to initialize logger")?;

    Ok(())
}
