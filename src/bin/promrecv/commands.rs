use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod jobs;
pub mod print;
pub mod validate;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Application {
    #[command(subcommand)]
    pub command: SubCommands,

    /// Emit logs as JSON lines instead of human readable text.
    #[clap(long, env = "PROMRECV_LOG_JSON", global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum SubCommands {
    /// Check that a receiver configuration decodes and passes validation.
    Validate(validate::Arguments),

    /// Print a validated receiver configuration with all defaults filled in.
    Print(print::Arguments),

    /// List the scrape jobs and target allocator of a receiver configuration.
    Jobs(jobs::Arguments),
}

pub fn handle_command(app: Application) -> Result<()> {
    match app.command {
        SubCommands::Validate(args) => validate::handle_command(args),
        SubCommands::Print(args) => print::handle_command(args),
        SubCommands::Jobs(args) => jobs::handle_command(args),
    }
}
