//! Shared test helpers for CLI integration tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Get a Command for the list-artifacts binary.
pub fn list_artifacts_cmd() -> Command {
  cargo_bin_cmd!("list-artifacts")
}

/// Isolated build tree.
///
/// Each test gets its own temporary build root plus a separate location for
/// the report, so the report never shows up as an artifact.
pub struct TestBuild {
  pub temp: TempDir,
  pub root: PathBuf,
  pub report_path: PathBuf,
}

impl TestBuild {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    fs::create_dir_all(&root).unwrap();
    let report_path = temp.path().join("reports").join("artifacts.json");
    Self {
      temp,
      root,
      report_path,
    }
  }

  /// A typical two-module gradle layout with a jar, a pom and an extra file.
  pub fn gradle_multi_module() -> Self {
    let build = Self::new();
    build.write_file("settings.gradle", "include 'core'\n");
    build.write_file("build.gradle", "");
    build.write_file("core/build.gradle", "");
    build.write_zip(
      "core/build/libs/core-1.0.jar",
      &[("META-INF/", ""), ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"), ("Core.class", "cafebabe")],
    );
    build.write_file("core/build/publications/maven/pom-default.xml.pom", "<project>\n</project>\n");
    build.write_file("build/libs/notes.txt", "release notes");
    build
  }

  /// Write a file relative to the build root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  /// Write a zip archive relative to the build root.
  pub fn write_zip(&self, relative_path: &str, entries: &[(&str, &str)]) {
    write_zip(&self.root.join(relative_path), entries);
  }

  /// Command preconfigured with this build's root.
  pub fn cmd(&self, subcommand: &str) -> Command {
    let mut cmd = list_artifacts_cmd();
    cmd.arg(subcommand).arg("--root").arg(&self.root);
    cmd
  }

  /// Parse the written report.
  pub fn report(&self) -> serde_json::Value {
    let content = fs::read_to_string(&self.report_path)
      .unwrap_or_else(|e| panic!("Failed to read report {}: {}", self.report_path.display(), e));
    serde_json::from_str(&content).unwrap()
  }

  /// Artifact names of the written report, in report order.
  pub fn reported_artifacts(&self) -> Vec<String> {
    self.report()["deployments"]
      .as_array()
      .unwrap()
      .iter()
      .map(|d| d["artifact"].as_str().unwrap().to_string())
      .collect()
  }
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }

  let mut zip = ZipWriter::new(File::create(path).unwrap());
  for (name, content) in entries {
    if name.ends_with('/') {
      zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
    } else {
      zip.start_file(*name, SimpleFileOptions::default()).unwrap();
      zip.write_all(content.as_bytes()).unwrap();
    }
  }
  zip.finish().unwrap();
}
