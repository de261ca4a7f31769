//! `toolgate` command-line front end.

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use toolgate_config::ConfigLoader;
use toolgate_primitives::KnownToolsets;
use toolgate_telemetry::TracingConfig;
use tracing::info;

use crate::cli::{Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();
    toolgate_telemetry::init(&TracingConfig::default().with_default_directive(args.log_directive()))
        .context("failed to initialise logging")?;

    let known = KnownToolsets::catalog();
    let output = match args.command() {
        Command::Resolve { instructions } => {
            let config = ConfigLoader::from_env()
                .load_with(args.overrides())
                .context("failed to load configuration")?;
            let report = report::resolve(&config, &known, instructions);
            info!(enabled = report.enabled.len(), invalid = report.invalid.len(), "resolved");
            serde_json::to_string_pretty(&report)?
        }
        Command::Toolsets => serde_json::to_string_pretty(&report::toolsets(&known))?,
    };

    println!("{output}");
    Ok(())
}
