//! Entry listing for zip-family archives.
//!
//! The `zip` crate indexes entries by name, so an archive whose central
//! directory names the same entry twice would silently list one of them.
//! Names are therefore checked against the raw central directory first.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use super::ArtifactReadError;
use crate::report::ArchiveSummary;

const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const EOCD_LEN: usize = 22;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const CENTRAL_HEADER_LEN: usize = 46;

/// List every entry of the archive at `path` with its uncompressed size.
///
/// Only the central directory is read; entries are not decompressed, so
/// encrypted entries are listed like any other. Directory entries are kept
/// under their stored name (with trailing `/`).
pub fn inspect_archive(path: &Path) -> Result<ArchiveSummary, ArtifactReadError> {
  let file = File::open(path).map_err(|source| ArtifactReadError::Open {
    path: path.display().to_string(),
    source,
  })?;
  let mut reader = BufReader::new(file);

  let duplicate = first_duplicate_name(&mut reader).map_err(|source| ArtifactReadError::Read {
    path: path.display().to_string(),
    source,
  })?;
  if let Some(name) = duplicate {
    return Err(ArtifactReadError::DuplicateEntry {
      path: path.display().to_string(),
      name,
    });
  }

  let mut archive = ZipArchive::new(reader).map_err(|source| ArtifactReadError::Archive {
    path: path.display().to_string(),
    source,
  })?;

  let mut entries = ArchiveSummary::new();
  for i in 0..archive.len() {
    let entry = archive.by_index_raw(i).map_err(|source| ArtifactReadError::Archive {
      path: path.display().to_string(),
      source,
    })?;
    entries.insert(entry.name().to_string(), entry.size().to_string());
  }

  debug!(path = ?path, entries = entries.len(), "listed archive");
  Ok(entries)
}

/// First entry name that appears twice in the central directory.
///
/// Returns `Ok(None)` when the names are unique and also when the central
/// directory cannot be located or uses zip64 fields; the `zip` crate reports
/// structural problems itself.
fn first_duplicate_name<R: Read + Seek>(reader: &mut R) -> io::Result<Option<String>> {
  let len = reader.seek(SeekFrom::End(0))?;
  let tail_len = len.min((EOCD_LEN + u16::MAX as usize) as u64);
  reader.seek(SeekFrom::Start(len - tail_len))?;
  let mut tail = vec![0; tail_len as usize];
  reader.read_exact(&mut tail)?;

  if tail.len() < EOCD_LEN {
    return Ok(None);
  }
  let Some(eocd) = (0..=tail.len() - EOCD_LEN)
    .rev()
    .find(|&i| read_u32(&tail, i) == EOCD_SIGNATURE)
  else {
    return Ok(None);
  };

  let cd_size = read_u32(&tail, eocd + 12);
  let cd_offset = read_u32(&tail, eocd + 16);
  if read_u16(&tail, eocd + 10) == u16::MAX || cd_offset == u32::MAX {
    return Ok(None);
  }
  if u64::from(cd_offset) + u64::from(cd_size) > len {
    return Ok(None);
  }

  reader.seek(SeekFrom::Start(u64::from(cd_offset)))?;
  let mut cd = vec![0; cd_size as usize];
  reader.read_exact(&mut cd)?;

  let mut seen = HashSet::new();
  let mut pos = 0;
  while pos + CENTRAL_HEADER_LEN <= cd.len() {
    if read_u32(&cd, pos) != CENTRAL_HEADER_SIGNATURE {
      return Ok(None);
    }
    let name_len = read_u16(&cd, pos + 28) as usize;
    let extra_len = read_u16(&cd, pos + 30) as usize;
    let comment_len = read_u16(&cd, pos + 32) as usize;
    let name_start = pos + CENTRAL_HEADER_LEN;
    let Some(name) = cd.get(name_start..name_start + name_len) else {
      return Ok(None);
    };
    if !seen.insert(name) {
      return Ok(Some(String::from_utf8_lossy(name).into_owned()));
    }
    pos = name_start + name_len + extra_len + comment_len;
  }

  Ok(None)
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
  u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
  u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
