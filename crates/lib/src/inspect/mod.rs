//! Per-artifact content inspection.
//!
//! Artifacts are classified by file-name extension and dispatched to the
//! matching inspector. Failures are scoped to the one artifact being read.

mod archive;
mod manifest;

use std::path::Path;

pub use archive::inspect_archive;
pub use manifest::read_manifest;

use crate::report::ContentSummary;

/// Extensions of zip-family archives.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "war", "ear", "aar", "zip"];

/// Extensions of single-file manifests whose text is recorded verbatim.
pub const MANIFEST_EXTENSIONS: &[&str] = &["pom", "module"];

/// Error reading the content of a single artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactReadError {
  #[error("failed to open {path}: {source}")]
  Open {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read archive {path}: {source}")]
  Archive {
    path: String,
    #[source]
    source: zip::result::ZipError,
  },

  #[error("archive {path} contains entry {name} more than once")]
  DuplicateEntry { path: String, name: String },

  #[error("failed to read {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{path} is not valid UTF-8: {source}")]
  Decode {
    path: String,
    #[source]
    source: std::string::FromUtf8Error,
  },
}

/// How an artifact's content is summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  Archive,
  Manifest,
  Unsupported,
}

impl ArtifactKind {
  /// Classify a file by the extension of its file name (case-sensitive).
  pub fn classify(file: &Path) -> Self {
    match file.extension().and_then(|ext| ext.to_str()) {
      Some(ext) if ARCHIVE_EXTENSIONS.contains(&ext) => ArtifactKind::Archive,
      Some(ext) if MANIFEST_EXTENSIONS.contains(&ext) => ArtifactKind::Manifest,
      _ => ArtifactKind::Unsupported,
    }
  }
}

/// Summarize the content of `file` according to its kind.
pub fn inspect(file: &Path) -> Result<ContentSummary, ArtifactReadError> {
  match ArtifactKind::classify(file) {
    ArtifactKind::Archive => inspect_archive(file).map(ContentSummary::Archive),
    ArtifactKind::Manifest => read_manifest(file).map(ContentSummary::Text),
    ArtifactKind::Unsupported => Ok(ContentSummary::Absent),
  }
}
