//! Test utilities for list-artifacts-lib.
//!
//! Helpers for laying out fake build trees and writing small archives.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::discover::Discovery;

/// Write a zip archive at `path` with the given `(name, content)` entries.
///
/// Names ending in `/` are written as directory entries.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
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

/// Rewrite every occurrence of entry name `from` in the archive bytes.
///
/// Both names must have the same length so offsets stay valid. Used to build
/// archives whose central directory repeats a name, which `ZipWriter` refuses
/// to produce.
pub fn rename_zip_entry(path: &Path, from: &str, to: &str) {
  assert_eq!(from.len(), to.len());
  let mut bytes = fs::read(path).unwrap();
  let from = from.as_bytes();
  let mut i = 0;
  while i + from.len() <= bytes.len() {
    if &bytes[i..i + from.len()] == from {
      bytes[i..i + from.len()].copy_from_slice(to.as_bytes());
      i += from.len();
    } else {
      i += 1;
    }
  }
  fs::write(path, bytes).unwrap();
}

/// Write a text file relative to `root`, creating parent directories.
pub fn write_file(root: &Path, relative_path: &str, content: &str) -> PathBuf {
  let path = root.join(relative_path);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// A discovery of `relative_path` under `root` from the root project.
pub fn discovery(root: &Path, relative_path: &str) -> Discovery {
  Discovery {
    subproject: ".".to_string(),
    relative_path: relative_path.to_string(),
    file: root.join(relative_path),
  }
}
