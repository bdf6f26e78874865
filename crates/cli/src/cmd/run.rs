//! Implementation of the `list-artifacts run` command.
//!
//! Runs the build command in the build root and uses its exit status as the
//! build-completion signal. The command's own exit status is returned
//! unchanged, whatever happens to the inventory.

use std::process::{Command, ExitCode, ExitStatus};

use anyhow::{Context, Result};
use list_artifacts_lib::pass::BuildResult;
use tracing::debug;

use super::scan::inventory;
use crate::InventoryArgs;

pub fn cmd_run(args: &InventoryArgs, command: &[String]) -> Result<ExitCode> {
  let (program, program_args) = command.split_first().context("No build command given")?;

  debug!(program = %program, args = ?program_args, root = ?args.root, "running build");
  let status = Command::new(program)
    .args(program_args)
    .current_dir(&args.root)
    .status()
    .with_context(|| format!("Failed to run build command: {}", program))?;

  let result = if status.success() {
    BuildResult::Success
  } else {
    BuildResult::Failure(format!("build command exited with {}", status))
  };

  inventory(args, &result);
  Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> ExitCode {
  match status.code() {
    Some(0) => ExitCode::SUCCESS,
    Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
    None => ExitCode::FAILURE,
  }
}
