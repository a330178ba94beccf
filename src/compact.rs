//! Compaction driver
//!
//! Orchestrates a full store rewrite: validate the source header, buffer
//! the live records, sort by key, and write a fresh store through the
//! record store's rewrite primitive. Used standalone as the `sort`
//! operation and as the prerequisite step before index builds and joins,
//! both of which depend on global key order.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::store::{Record, RecordStore};

/// Outcome of one compaction pass.
#[derive(Debug, Clone, Copy)]
pub struct CompactionStats {
    /// Records scanned from the source, live or removed
    pub scanned: i32,

    /// Live records carried into the destination
    pub kept: i32,

    /// Tombstoned records dropped; the reclaimed space
    pub dropped: i32,
}

/// Rewrite `source` into a deleted-tuple-free, key-ordered store at
/// `destination`.
///
/// Fails if the source is DIRTY; an empty source is allowed and produces
/// an empty sorted store. On success the destination is CLEAN; on any
/// failure it is either absent or DIRTY, and a later validation rejects
/// it — there is no partially committed output.
pub fn sort_store<R: Record>(source: &Path, destination: &Path) -> Result<CompactionStats> {
    let mut store = RecordStore::<R>::open(source)?.validate(true, false)?;

    let stats = CompactionStats {
        scanned: store.header().total_records(),
        kept: store.header().live_count,
        dropped: store.header().removed_count,
    };

    store.rewrite_sorted(destination)?;

    info!(
        entity = R::NAME,
        scanned = stats.scanned,
        kept = stats.kept,
        dropped = stats.dropped,
        destination = %destination.display(),
        "store compacted"
    );

    Ok(stats)
}
