//! Report types for a single inventory pass.
//!
//! A report is a list of [`Deployment`]s, one per unique artifact, sorted by
//! the artifact's path relative to the build root. The serialized form is
//! meant to be committed or archived next to the build and diffed later:
//!
//! ```json
//! { "deployments": [
//!     { "artifact": "core/build/libs/core.jar", "content": { "META-INF/MANIFEST.MF": "25" } },
//!     { "artifact": "core/build/publications/pom-default.xml.pom", "content": { "content": "<project/>" } },
//!     { "artifact": "docs/build/readme.md", "content": null }
//! ] }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Entry name to declared uncompressed size (decimal), ordered by name.
pub type ArchiveSummary = BTreeMap<String, String>;

/// Full text of a single-file artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSummary {
  pub content: String,
}

/// Type-specific inspection result for an artifact.
///
/// New inspectable artifact types get their own variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentSummary {
  /// Entry listing of a zip-family archive.
  Archive(ArchiveSummary),
  /// Full text of a manifest-like file.
  Text(TextSummary),
  /// Not inspectable, or inspection failed. Serializes as `null`.
  Absent,
}

impl ContentSummary {
  pub fn is_absent(&self) -> bool {
    matches!(self, ContentSummary::Absent)
  }
}

/// One build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
  /// Path relative to the build root, `/`-separated.
  pub artifact: String,
  pub content: ContentSummary,
}

/// The finished, immutable report of one pass.
///
/// Artifacts are unique and sorted; the only way to build one is from a map
/// keyed by artifact path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deployments {
  deployments: Vec<Deployment>,
}

impl Deployments {
  pub fn len(&self) -> usize {
    self.deployments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.deployments.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Deployment> {
    self.deployments.iter()
  }

  /// Look up a deployment by its relative path.
  pub fn get(&self, artifact: &str) -> Option<&Deployment> {
    self
      .deployments
      .binary_search_by(|d| d.artifact.as_str().cmp(artifact))
      .ok()
      .map(|i| &self.deployments[i])
  }
}

impl From<BTreeMap<String, ContentSummary>> for Deployments {
  fn from(entries: BTreeMap<String, ContentSummary>) -> Self {
    Self {
      deployments: entries
        .into_iter()
        .map(|(artifact, content)| Deployment { artifact, content })
        .collect(),
    }
  }
}
