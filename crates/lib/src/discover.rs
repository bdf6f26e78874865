//! Filesystem discovery of build artifacts.
//!
//! A build root holds one or more subprojects, each recognised by a build
//! marker file. Every file under a subproject's output directories is an
//! artifact. Discovery is lazy: nothing is walked until the returned iterator
//! is pulled.
//!
//! ```text
//! {root}/
//! ├── build.gradle            # root subproject "."
//! ├── build/libs/app.jar      # artifact "build/libs/app.jar"
//! └── core/
//!     ├── build.gradle        # subproject "core"
//!     └── build/libs/core.jar # artifact "core/build/libs/core.jar"
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Build files that mark a directory as a subproject.
pub const DEFAULT_MARKERS: &[&str] = &["build.gradle", "build.gradle.kts", "pom.xml"];

/// Output directories, relative to a subproject, that hold artifacts.
pub const DEFAULT_OUTPUTS: &[&str] = &["build/libs", "build/publications", "target"];

/// One produced artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
  /// Subproject path relative to the build root (`.` for the root itself).
  pub subproject: String,
  /// Artifact path relative to the build root, `/`-separated.
  pub relative_path: String,
  pub file: PathBuf,
}

/// Error while enumerating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
  #[error("failed to traverse directory {path}: {source}")]
  Walk {
    path: String,
    #[source]
    source: walkdir::Error,
  },

  #[error("{path} is not inside build root {root}")]
  OutsideRoot { path: String, root: String },
}

/// Where subprojects and their outputs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
  /// File names that mark a directory as a subproject.
  pub markers: Vec<String>,
  /// Output directories relative to each subproject.
  pub outputs: Vec<PathBuf>,
}

impl Default for ProjectLayout {
  fn default() -> Self {
    Self {
      markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
      outputs: DEFAULT_OUTPUTS.iter().map(PathBuf::from).collect(),
    }
  }
}

impl ProjectLayout {
  /// Top-level names of the output directories; never searched for subprojects.
  fn output_roots(&self) -> Vec<String> {
    self
      .outputs
      .iter()
      .filter_map(|o| match o.components().next() {
        Some(Component::Normal(name)) => Some(name.to_string_lossy().into_owned()),
        _ => None,
      })
      .collect()
  }
}

/// Find the subprojects of the build at `root`.
///
/// The root is always a subproject. Below it, every directory containing one
/// of the layout's markers is one too. Hidden directories are skipped, and so
/// are output directories directly inside a subproject; a directory that only
/// shares an output's name elsewhere in the tree is still searched. Results
/// are sorted by path.
pub fn detect_subprojects(root: &Path, layout: &ProjectLayout) -> Result<Vec<PathBuf>, DiscoveryError> {
  let output_roots = layout.output_roots();
  let is_subproject = |dir: &Path| dir == root || layout.markers.iter().any(|m| dir.join(m).is_file());
  let is_searchable = |entry: &DirEntry| {
    if entry.depth() == 0 {
      return true;
    }
    let name = entry.file_name().to_string_lossy();
    if !entry.file_type().is_dir() || name.starts_with('.') {
      return false;
    }
    let is_output = output_roots.iter().any(|o| o.as_str() == name.as_ref());
    !(is_output && entry.path().parent().is_some_and(is_subproject))
  };

  let mut subprojects = vec![root.to_path_buf()];
  for entry in WalkDir::new(root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(is_searchable)
  {
    let entry = entry.map_err(|source| DiscoveryError::Walk {
      path: root.display().to_string(),
      source,
    })?;

    if is_subproject(entry.path()) {
      debug!(path = ?entry.path(), "found subproject");
      subprojects.push(entry.into_path());
    }
  }

  Ok(subprojects)
}

/// Lazily enumerate every file under each subproject's output directories.
///
/// Subprojects are visited in the given order; files within an output
/// directory in file-name order. Missing output directories are skipped. The
/// same file may be yielded more than once when output directories overlap.
pub fn discover(
  root: PathBuf,
  subprojects: Vec<PathBuf>,
  layout: ProjectLayout,
) -> impl Iterator<Item = Result<Discovery, DiscoveryError>> + Send + 'static {
  let outputs: Vec<(String, PathBuf)> = subprojects
    .iter()
    .flat_map(|subproject| {
      let id = subproject_id(&root, subproject);
      layout.outputs.iter().map(move |o| (id.clone(), subproject.join(o)))
    })
    .collect();

  outputs
    .into_iter()
    .filter(|(_, dir)| dir.is_dir())
    .flat_map(move |(subproject, dir)| {
      let root = root.clone();
      WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
          Err(source) => Some(Err(DiscoveryError::Walk {
            path: dir.display().to_string(),
            source,
          })),
          Ok(entry) if !entry.file_type().is_file() => None,
          Ok(entry) => Some(relative_path(&root, entry.path()).map(|relative_path| Discovery {
            subproject: subproject.clone(),
            relative_path,
            file: entry.into_path(),
          })),
        })
    })
}

fn subproject_id(root: &Path, subproject: &Path) -> String {
  relative_path(root, subproject).unwrap_or_else(|_| subproject.display().to_string())
}

/// `path` relative to `root`, joined with `/` on every platform.
fn relative_path(root: &Path, path: &Path) -> Result<String, DiscoveryError> {
  let relative = path.strip_prefix(root).map_err(|_| DiscoveryError::OutsideRoot {
    path: path.display().to_string(),
    root: root.display().to_string(),
  })?;

  let parts: Vec<_> = relative
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => Some(part.to_string_lossy()),
      _ => None,
    })
    .collect();

  if parts.is_empty() {
    Ok(".".to_string())
  } else {
    Ok(parts.join("/"))
  }
}
