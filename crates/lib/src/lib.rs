//! list-artifacts-lib: build artifact inventory
//!
//! After a successful build, every artifact the build produced is discovered,
//! deduplicated by its path relative to the build root, and summarized:
//! - `report`: the `Deployments` report and its content summaries
//! - `inspect`: archive entry listings and manifest text capture
//! - `discover`: subproject detection and artifact enumeration
//! - `collect`: the deduplicating, order-stable fold into a report
//! - `sink`: logging or writing the serialized report
//! - `pass`: the `on_build_completed` entry point

pub mod collect;
pub mod discover;
pub mod inspect;
pub mod pass;
pub mod report;
pub mod sink;

#[cfg(test)]
mod util;
