mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// list-artifacts - Inventory the artifacts of a multi-module build
#[derive(Parser)]
#[command(name = "list-artifacts")]
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
  /// Inventory the outputs of a build that already succeeded
  Scan(InventoryArgs),

  /// Run a build command, then inventory its outputs if it succeeded
  Run {
    #[command(flatten)]
    args: InventoryArgs,

    /// Build command and its arguments
    #[arg(last = true, required = true, value_name = "BUILD COMMAND")]
    command: Vec<String>,
  },
}

/// Where to look for artifacts and where the report goes.
#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
  /// Build root; artifact paths are reported relative to it
  #[arg(long, default_value = ".")]
  pub root: PathBuf,

  /// Subproject directory relative to the root (repeatable; auto-detected if omitted)
  #[arg(long = "project", value_name = "DIR")]
  pub projects: Vec<PathBuf>,

  /// Output directory relative to each subproject (repeatable)
  #[arg(long = "outputs", value_name = "DIR")]
  pub outputs: Vec<PathBuf>,

  /// Write the report to this file instead of logging it
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Inspect artifacts concurrently
  #[arg(long)]
  pub parallel: bool,
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Scan(args) => Ok(cmd::cmd_scan(&args)),
    Commands::Run { args, command } => cmd::cmd_run(&args, &command),
  }
}
