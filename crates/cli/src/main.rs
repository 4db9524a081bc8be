mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// sysenv - Declarative shell environment manager
#[derive(Parser)]
#[command(name = "sysenv")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Expand the config into a sourceable script, replacing the previous reload
  Reload {
    /// Path to the environment config file
    config: PathBuf,

    /// Path of the script to write (the meta file is written next to it)
    output: PathBuf,

    /// Print the script instead of writing the script and meta file
    #[arg(long)]
    dry_run: bool,
  },

  /// Select an MPI variant (reserved, currently does nothing)
  MpiSelect {
    /// Path to the environment config file
    config: PathBuf,

    /// Path of the script to write
    output: PathBuf,
  },

  /// Show what the last reload injected
  Status {
    /// Path of the script written by the last reload
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Logs go to stderr; stdout is reserved for scripts and reports.
  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Reload {
      config,
      output,
      dry_run,
    } => cmd::cmd_reload(&config, &output, dry_run),
    Commands::MpiSelect { config, output } => cmd::cmd_mpi_select(&config, &output),
    Commands::Status { output, format } => cmd::cmd_status(&output, format, cli.verbose),
  }
}
