//! Report sinks.
//!
//! A finished report is serialized to pretty JSON and either logged at info
//! level or written to a file, replacing whatever was there.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::report::Deployments;

/// Error emitting a report.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
  #[error("failed to serialize report: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write report to {path}: {source}")]
  Write {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Destination of a finished report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
  /// Log the report at info level.
  Log,
  /// Write the report to this file.
  File(PathBuf),
}

impl ReportSink {
  /// Pick the sink from the optional output destination.
  pub fn from_output(output: Option<PathBuf>) -> Self {
    match output {
      Some(path) => ReportSink::File(path),
      None => ReportSink::Log,
    }
  }

  /// Serialize and emit `report`.
  pub fn emit(&self, report: &Deployments) -> Result<(), SinkError> {
    let json = serde_json::to_string_pretty(report).map_err(SinkError::Serialize)?;

    match self {
      ReportSink::Log => {
        info!("Deployments:\n{}", json);
      }
      ReportSink::File(path) => {
        write_replacing(path, &json)?;
        debug!(path = ?path, deployments = report.len(), "wrote report");
      }
    }

    Ok(())
  }
}

/// Write `content` to `path` through a uniquely named sibling temp file and a
/// rename. The temp file is removed if any step fails.
fn write_replacing(path: &Path, content: &str) -> Result<(), SinkError> {
  let write_err = |source| SinkError::Write {
    path: path.display().to_string(),
    source,
  };

  let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
    Some(parent) => {
      fs::create_dir_all(parent).map_err(write_err)?;
      parent
    }
    None => Path::new("."),
  };

  let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
  temp.write_all(content.as_bytes()).map_err(write_err)?;
  temp.persist(path).map_err(|e| write_err(e.error))?;
  Ok(())
}
