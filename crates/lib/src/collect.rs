//! Deduplicating artifact collection.
//!
//! An [`ArtifactCollector`] is alive only while a pass is collecting. It
//! accepts discoveries through [`ArtifactCollector::record`], which may be
//! called from several threads at once, and is consumed by
//! [`ArtifactCollector::finish`] into an immutable [`Deployments`] report.
//!
//! The first discovery of a relative path wins. Later discoveries of the same
//! path are dropped without comparing their content.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rayon::iter::{ParallelBridge, ParallelIterator};
use tracing::{debug, warn};

use crate::discover::{Discovery, DiscoveryError};
use crate::inspect;
use crate::report::{ContentSummary, Deployments};

#[derive(Debug, Default)]
struct CollectorState {
  seen: HashSet<String>,
  deployments: BTreeMap<String, ContentSummary>,
}

/// Collects the deployments of one pass.
#[derive(Debug, Default)]
pub struct ArtifactCollector {
  state: Mutex<CollectorState>,
}

impl ArtifactCollector {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one discovery.
  ///
  /// Claiming the path is atomic, so concurrent callers never both inspect
  /// the same artifact. Inspection runs outside the lock.
  pub fn record(&self, discovery: &Discovery) {
    if !self.claim(&discovery.relative_path) {
      debug!(
        artifact = %discovery.relative_path,
        subproject = %discovery.subproject,
        "artifact already recorded, skipping"
      );
      return;
    }

    let content = match inspect::inspect(&discovery.file) {
      Ok(content) => content,
      Err(e) => {
        warn!(artifact = %discovery.relative_path, error = %e, "failed to inspect artifact, recording it without content");
        ContentSummary::Absent
      }
    };

    self
      .lock()
      .deployments
      .insert(discovery.relative_path.clone(), content);
  }

  /// Number of distinct artifacts claimed so far.
  pub fn len(&self) -> usize {
    self.lock().seen.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Freeze the collected deployments into a report.
  pub fn finish(self) -> Deployments {
    let state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
    Deployments::from(state.deployments)
  }

  fn claim(&self, artifact: &str) -> bool {
    self.lock().seen.insert(artifact.to_string())
  }

  fn lock(&self) -> MutexGuard<'_, CollectorState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Fold `discoveries` into a report, in delivery order.
///
/// Fails only if the discovery sequence itself yields an error; artifacts
/// whose content cannot be read are recorded as [`ContentSummary::Absent`].
pub fn collect<I>(discoveries: I) -> Result<Deployments, DiscoveryError>
where
  I: IntoIterator<Item = Result<Discovery, DiscoveryError>>,
{
  let collector = ArtifactCollector::new();
  for discovery in discoveries {
    collector.record(&discovery?);
  }
  Ok(collector.finish())
}

/// Like [`collect`], but inspects artifacts on the rayon thread pool.
///
/// Which duplicate wins depends on scheduling; the report is still sorted.
pub fn collect_parallel<I>(discoveries: I) -> Result<Deployments, DiscoveryError>
where
  I: IntoIterator<Item = Result<Discovery, DiscoveryError>>,
  I::IntoIter: Send,
{
  let collector = ArtifactCollector::new();
  discoveries
    .into_iter()
    .par_bridge()
    .try_for_each(|discovery| discovery.map(|d| collector.record(&d)))?;
  Ok(collector.finish())
}
