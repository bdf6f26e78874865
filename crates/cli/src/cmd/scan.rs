//! Implementation of the `list-artifacts scan` command.
//!
//! Treats the build as already successful and inventories whatever the
//! subprojects' output directories currently hold.

use std::process::ExitCode;

use list_artifacts_lib::discover::{ProjectLayout, detect_subprojects, discover};
use list_artifacts_lib::pass::{BuildResult, CollectMode, PassOutcome, on_build_completed};
use list_artifacts_lib::sink::ReportSink;

use crate::InventoryArgs;
use crate::output::{print_error, print_info, print_success};

pub fn cmd_scan(args: &InventoryArgs) -> ExitCode {
  match inventory(args, &BuildResult::Success) {
    PassOutcome::Failed => ExitCode::FAILURE,
    _ => ExitCode::SUCCESS,
  }
}

/// Run one inventory pass for `result` and print its outcome.
pub fn inventory(args: &InventoryArgs, result: &BuildResult) -> PassOutcome {
  let mut layout = ProjectLayout::default();
  if !args.outputs.is_empty() {
    layout.outputs = args.outputs.clone();
  }
  let sink = ReportSink::from_output(args.output.clone());
  let mode = if args.parallel {
    CollectMode::Parallel
  } else {
    CollectMode::Sequential
  };

  let outcome = on_build_completed(
    result,
    || {
      let subprojects = if args.projects.is_empty() {
        detect_subprojects(&args.root, &layout)?
      } else {
        args.projects.iter().map(|p| args.root.join(p)).collect()
      };
      Ok(discover(args.root.clone(), subprojects, layout.clone()))
    },
    &sink,
    mode,
  );

  match (&outcome, &sink) {
    (PassOutcome::Reported { .. }, ReportSink::File(path)) => {
      print_success(&format!("Inventory {}: {}", outcome, path.display()))
    }
    (PassOutcome::Reported { .. }, ReportSink::Log) => print_success(&format!("Inventory {}", outcome)),
    (PassOutcome::Empty, _) => print_info("No artifacts found"),
    (PassOutcome::Skipped, _) => print_info("Build failed, artifacts not inventoried"),
    (PassOutcome::Failed, _) => print_error("Artifact inventory failed, see log for details"),
  }

  outcome
}
