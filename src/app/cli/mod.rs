//! CLI adapter.

mod check;
mod exec;
mod handle;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::domain::AppError;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ELFC_LOG";
const DEFAULT_LOG_FILTER: &str = "elfc=warn";

#[derive(Parser)]
#[command(name = "elfc")]
#[command(version)]
#[command(about = "Run file manager connector requests against a sandboxed root", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one request and print headers and response as JSON
    #[clap(visible_alias = "x")]
    Exec {
        /// Connector configuration file
        #[arg(short, long)]
        config: PathBuf,
        /// JSON request file (stdin when omitted or "-")
        request: Option<PathBuf>,
    },
    /// Load and validate a configuration file
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the handle of a root-relative path
    Hash {
        path: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the root-relative path behind a handle
    Unhash {
        handle: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run() {
    init_logging();
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Exec { config, request } => exec::run_exec(&config, request.as_deref()),
        Commands::Check { config } => check::run_check(&config),
        Commands::Hash { path, config } => handle::run_hash(&config, &path),
        Commands::Unhash { handle, config } => handle::run_unhash(&config, &handle),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
