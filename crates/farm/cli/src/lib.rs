//! Farm CLI - Command-line interface for domain startup control
//!
//! This CLI gives operators a terminal view of what the reconciler will do:
//! - Validate declared domain documents and show derived defaults
//! - Evaluate the startup control policy against a topology
//! - Compare a plan with the servers currently running

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
pub mod output;

use commands::{plan, validate};
use config::FarmConfig;
pub use error::{CliError, CliResult};

/// Farm CLI application
#[derive(Parser)]
#[command(name = "farm")]
#[command(about = "Farm - Domain startup control for application-server farms", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FARM_CONFIG")]
    config: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Validate a domain document and show the resolved specification
    Validate {
        /// Path to domain document (YAML or JSON)
        #[arg(short, long)]
        domain: String,
    },

    /// Compute the servers that should be running
    Plan {
        /// Path to domain document (YAML or JSON)
        #[arg(short, long)]
        domain: String,

        /// Path to topology document (YAML or JSON)
        #[arg(short, long)]
        topology: String,

        /// Path to startup overrides document (YAML or JSON)
        #[arg(short, long)]
        startup: Option<String>,

        /// Servers currently running, to show start/stop actions
        #[arg(short, long, value_delimiter = ',')]
        running: Vec<String>,
    },

    /// Show configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    // Load config
    let config = FarmConfig::load(cli.config.as_deref())?;
    let format = cli.output.or(config.default_output).unwrap_or_default();
    debug!(config = ?config, format = ?format, "Configuration loaded");

    // Execute command
    match cli.command {
        Commands::Validate { domain } => validate::execute(&domain, &config, format),
        Commands::Plan {
            domain,
            topology,
            startup,
            running,
        } => plan::execute(
            plan::PlanInputs {
                domain,
                topology,
                startup,
                running,
            },
            &config,
            format,
        ),
        Commands::Config => {
            println!("Config: {:?}", config);
            println!("Default image: {}", config.spec_defaults().image);
            println!("Output: {:?}", format);
            Ok(())
        }
    }
}
