//! RTC SCM load-configuration CLI.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rtc-scm")]
#[command(about = "Resolve RTC SCM load configurations offline", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, env = "RTC_SCM_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the load configuration of a build source
    Resolve {
        /// Path to the KDL source descriptor
        #[arg(default_value = "source.kdl")]
        source: String,
        /// Path to a JSON repository snapshot
        #[arg(long, env = "RTC_SCM_REPOSITORY")]
        repository: String,
        /// Print the resolved configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check load-rule path specs of the form <component>/<file>
    CheckPath {
        /// Path specs to check
        #[arg(required = true)]
        specs: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Resolve {
            source,
            repository,
            json,
        } => {
            commands::resolve::resolve(&source, &repository, json)?;
        }
        Commands::CheckPath { specs } => {
            commands::check_paths(&specs)?;
        }
    }

    Ok(())
}
