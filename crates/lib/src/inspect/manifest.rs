//! Full-text capture for manifest-like artifacts.

use std::fs;
use std::path::Path;

use super::ArtifactReadError;
use crate::report::TextSummary;

/// Read the UTF-8 file at `path` and join its lines with `\n`.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, and a final terminator
/// does not add an empty line. Invalid UTF-8 is an error, never replaced.
pub fn read_manifest(path: &Path) -> Result<TextSummary, ArtifactReadError> {
  let bytes = fs::read(path).map_err(|source| ArtifactReadError::Read {
    path: path.display().to_string(),
    source,
  })?;

  let text = String::from_utf8(bytes).map_err(|source| ArtifactReadError::Decode {
    path: path.display().to_string(),
    source,
  })?;

  Ok(TextSummary {
    content: split_lines(&text).join("\n"),
  })
}

fn split_lines(text: &str) -> Vec<&str> {
  let bytes = text.as_bytes();
  let mut lines = Vec::new();
  let mut start = 0;
  let mut i = 0;

  while i < bytes.len() {
    match bytes[i] {
      b'\n' => {
        lines.push(&text[start..i]);
        i += 1;
        start = i;
      }
      b'\r' => {
        lines.push(&text[start..i]);
        i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
        start = i;
      }
      _ => i += 1,
    }
  }

  if start < bytes.len() {
    lines.push(&text[start..]);
  }
  lines
}
