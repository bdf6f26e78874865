//! Build-completion pass.
//!
//! [`on_build_completed`] is the single entry point a host calls when its
//! build finishes. It never fails: a failed build is skipped, and every error
//! of the pass itself is logged and reported as [`PassOutcome::Failed`] so an
//! inventory problem can never fail the build that triggered it.

use std::fmt;

use tracing::{error, info, warn};

use crate::collect::{collect, collect_parallel};
use crate::discover::{Discovery, DiscoveryError};
use crate::sink::{ReportSink, SinkError};

/// Result of the build that triggered the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResult {
  Success,
  Failure(String),
}

impl BuildResult {
  pub fn is_success(&self) -> bool {
    matches!(self, BuildResult::Success)
  }
}

/// How discoveries are folded into the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectMode {
  /// One artifact at a time, in discovery order.
  #[default]
  Sequential,
  /// Artifacts inspected concurrently on the rayon pool.
  Parallel,
}

/// What a pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
  /// The build failed; nothing was discovered.
  Skipped,
  /// No artifacts were found; nothing was emitted.
  Empty,
  /// A report with this many deployments was emitted.
  Reported { deployments: usize },
  /// The pass itself failed; the error was logged.
  Failed,
}

impl fmt::Display for PassOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PassOutcome::Skipped => write!(f, "skipped"),
      PassOutcome::Empty => write!(f, "no artifacts"),
      PassOutcome::Reported { deployments } => write!(f, "{} artifact(s) reported", deployments),
      PassOutcome::Failed => write!(f, "failed"),
    }
  }
}

/// Failure of a whole pass, not attributable to one artifact.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
  #[error("artifact discovery failed: {0}")]
  Discovery(#[from] DiscoveryError),

  #[error("failed to emit report: {0}")]
  Sink(#[from] SinkError),
}

/// Inventory the build's artifacts after it completes.
///
/// `discover` is only invoked when `result` is a success. An empty report is
/// not emitted at all.
pub fn on_build_completed<F, I>(result: &BuildResult, discover: F, sink: &ReportSink, mode: CollectMode) -> PassOutcome
where
  F: FnOnce() -> Result<I, DiscoveryError>,
  I: IntoIterator<Item = Result<Discovery, DiscoveryError>>,
  I::IntoIter: Send,
{
  if let BuildResult::Failure(reason) = result {
    warn!(reason = %reason, "build failed, skipping artifacts dump");
    return PassOutcome::Skipped;
  }

  match run_pass(discover, sink, mode) {
    Ok(outcome) => outcome,
    Err(e) => {
      error!(error = %e, "artifact inventory failed");
      PassOutcome::Failed
    }
  }
}

fn run_pass<F, I>(discover: F, sink: &ReportSink, mode: CollectMode) -> Result<PassOutcome, PassError>
where
  F: FnOnce() -> Result<I, DiscoveryError>,
  I: IntoIterator<Item = Result<Discovery, DiscoveryError>>,
  I::IntoIter: Send,
{
  let discoveries = discover()?;
  let report = match mode {
    CollectMode::Sequential => collect(discoveries)?,
    CollectMode::Parallel => collect_parallel(discoveries)?,
  };

  if report.is_empty() {
    info!("no artifacts found, nothing to report");
    return Ok(PassOutcome::Empty);
  }

  sink.emit(&report)?;
  Ok(PassOutcome::Reported {
    deployments: report.len(),
  })
}
