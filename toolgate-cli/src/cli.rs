use clap::{Parser, Subcommand};
use toolgate_config::Overrides;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve the configured toolsets and print the result as JSON
    Resolve {
        /// Include the composed instructions
        #[arg(long)]
        instructions: bool,
    },

    /// List the known toolsets
    Toolsets,
}

/// Inspect how toolset configuration resolves
#[derive(Parser, Debug)]
#[command(name = "toolgate", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Comma-separated toolsets; overrides TOOLGATE_TOOLSETS
    #[arg(long, global = true, value_delimiter = ',')]
    pub toolsets: Option<Vec<String>>,

    /// Hide write operations (`--read-only=false` to turn off); overrides TOOLGATE_READ_ONLY
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub read_only: Option<bool>,

    /// Enable toolsets on demand (`=false` to turn off); overrides TOOLGATE_DYNAMIC_TOOLSETS
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub dynamic_toolsets: Option<bool>,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Flags only override when given.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            toolsets: self.toolsets.clone(),
            read_only: self.read_only,
            dynamic_toolsets: self.dynamic_toolsets,
        }
    }

    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Resolve {
                instructions: false,
            })
    }
}
