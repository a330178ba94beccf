//! Command layer
//!
//! The operations exposed to callers, one per entry in the external
//! interface: table creation, queries, inserts (indexed or not), index
//! builds, compaction, and the two-store join.
//!
//! Commands return decoded records and statistics; rendering them is the
//! caller's concern. Every command opens its own handles, validates
//! headers before use, and brackets mutating sequences DIRTY -> CLEAN;
//! a failure leaves a DIRTY artifact that later validation rejects, and
//! closes every handle on the way out.

use std::path::Path;

use tracing::{info, warn};

use crate::compact::{self, CompactionStats};
use crate::entity::{Entity, Line, Vehicle};
use crate::error::{Result, TransitError};
use crate::index::OrderedIndex;
use crate::join::merge_join;
use crate::store::{Record, RecordStore};
use crate::text;

/// Outcome of a table creation.
#[derive(Debug, Clone, Copy)]
pub struct ImportStats {
    pub live: i32,
    pub removed: i32,
}

/// A query result: records plus the header labels to render them with.
#[derive(Debug)]
pub struct Selection<E> {
    pub labels: Vec<String>,
    pub records: Vec<E>,
}

/// A join result: matched pairs plus both stores' labels.
#[derive(Debug)]
pub struct JoinResult {
    pub vehicle_labels: Vec<String>,
    pub line_labels: Vec<String>,
    pub pairs: Vec<(Vehicle, Line)>,
}

// =============================================================================
// Table creation and inserts
// =============================================================================

/// Import a delimited text file into a fresh record store.
///
/// Records carrying the removal marker are stored tombstoned; the store
/// is DIRTY for the whole load and CLEAN only once every record landed.
pub fn create_table<E: Entity>(source: &Path, destination: &Path) -> Result<ImportStats> {
    let (labels, rows) = text::read_import_file(source)?;

    let mut store = RecordStore::<E>::create(destination, labels)?;
    for row in &rows {
        let record = E::from_fields(row.live, &row.fields)?;
        store.append(&record)?;
    }
    store.mark_clean()?;

    let stats = ImportStats {
        live: store.header().live_count,
        removed: store.header().removed_count,
    };

    info!(
        entity = E::NAME,
        live = stats.live,
        removed = stats.removed,
        destination = %destination.display(),
        "table created"
    );

    Ok(stats)
}

/// Append records to an existing store.
pub fn insert<E: Entity>(store_path: &Path, records: &[E]) -> Result<()> {
    let mut store = RecordStore::<E>::open_for_update(store_path)?.validate(true, false)?;

    store.mark_dirty()?;
    for record in records {
        store.append(record)?;
    }
    store.mark_clean()?;

    info!(entity = E::NAME, count = records.len(), "records inserted");

    Ok(())
}

/// Append records while keeping the store's ordered index current.
///
/// Requires the index to exist and be CLEAN; both files are DIRTY for
/// the duration of the batch. Tombstoned input records are appended and
/// counted but never indexed.
pub fn insert_with_index<E: Entity>(
    store_path: &Path,
    index_path: &Path,
    records: &[E],
) -> Result<()> {
    let mut store = RecordStore::<E>::open_for_update(store_path)?.validate(true, false)?;

    let mut index = OrderedIndex::load(index_path)?.ok_or_else(|| {
        TransitError::IndexUnavailable(format!("{}: no such index", index_path.display()))
    })?;

    store.mark_dirty()?;
    index.mark_dirty()?;

    for record in records {
        let offset = store.append(record)?;
        if record.is_live() {
            index.insert(record.key(), offset)?;
        }
    }

    store.mark_clean()?;
    index.finalize()?;

    info!(entity = E::NAME, count = records.len(), "records inserted and indexed");

    Ok(())
}

// =============================================================================
// Queries
// =============================================================================

/// Every live record in the store, in append order.
pub fn select_all<E: Entity>(store_path: &Path) -> Result<Selection<E>> {
    let mut store = RecordStore::<E>::open(store_path)?.validate(true, true)?;
    let labels = store.header().labels.clone();

    let mut records = Vec::new();
    for entry in store.records()? {
        let (_, record) = entry?;
        if record.is_live() {
            records.push(record);
        }
    }

    Ok(Selection { labels, records })
}

/// Live records whose named field equals the given value.
///
/// A query on the entity's unique field stops at the first match; an
/// empty result is normal, not an error.
pub fn select_where<E: Entity>(store_path: &Path, field: &str, value: &str) -> Result<Selection<E>> {
    let mut store = RecordStore::<E>::open(store_path)?.validate(true, true)?;
    let labels = store.header().labels.clone();

    let unique = E::UNIQUE_FIELD == Some(field);
    let mut records = Vec::new();

    for entry in store.records()? {
        let (_, record) = entry?;
        if !record.is_live() {
            continue;
        }
        if record.matches(field, value)? {
            records.push(record);
            if unique {
                break;
            }
        }
    }

    Ok(Selection { labels, records })
}

/// Point lookup through the ordered index.
///
/// Falls back to a sequential key scan when the index file is absent;
/// a DIRTY index is rejected. `None` records means the key is not
/// present — a normal result.
pub fn select_with_index<E: Entity>(
    store_path: &Path,
    index_path: &Path,
    key: i32,
) -> Result<Selection<E>> {
    let mut store = RecordStore::<E>::open(store_path)?.validate(true, true)?;
    let labels = store.header().labels.clone();

    let record = match OrderedIndex::load(index_path)? {
        Some(index) => match index.search(key) {
            Some(offset) => store.read_at(offset)?.filter(Record::is_live),
            None => None,
        },
        None => {
            warn!(index = %index_path.display(), "index missing, falling back to full scan");
            scan_for_key(&mut store, key)?
        }
    };

    Ok(Selection {
        labels,
        records: record.into_iter().collect(),
    })
}

fn scan_for_key<E: Entity>(store: &mut RecordStore<E>, key: i32) -> Result<Option<E>> {
    for entry in store.records()? {
        let (_, record) = entry?;
        if record.is_live() && record.key() == key {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

// =============================================================================
// Index build, compaction, join
// =============================================================================

/// Build an ordered index over every live record of a validated store.
///
/// Returns the number of indexed keys. An interrupted build leaves the
/// index file DIRTY, which the next load rejects.
pub fn create_index<E: Entity>(store_path: &Path, index_path: &Path) -> Result<usize> {
    let mut store = RecordStore::<E>::open(store_path)?.validate(true, false)?;

    let mut index = OrderedIndex::create(index_path)?;
    index.mark_dirty()?;

    for entry in store.records()? {
        let (offset, record) = entry?;
        if record.is_live() {
            index.insert(record.key(), offset)?;
        }
    }

    let indexed = index.len();
    index.finalize()?;

    info!(entity = E::NAME, keys = indexed, index = %index_path.display(), "index created");

    Ok(indexed)
}

/// Rewrite a store deleted-tuple-free and key-ordered. See
/// [`compact::sort_store`].
pub fn sort<E: Entity>(source: &Path, destination: &Path) -> Result<CompactionStats> {
    compact::sort_store::<E>(source, destination)
}

/// Merge-join sorted vehicle and line stores on the line code.
///
/// Both inputs must already be sorted ascending by key (the `sort`
/// operation produces them); zero pairs is a normal result.
pub fn join(vehicle_store: &Path, line_store: &Path) -> Result<JoinResult> {
    let mut vehicles = RecordStore::<Vehicle>::open(vehicle_store)?.validate(true, true)?;
    let mut lines = RecordStore::<Line>::open(line_store)?.validate(true, true)?;

    let vehicle_labels = vehicles.header().labels.clone();
    let line_labels = lines.header().labels.clone();

    let pairs = merge_join(&mut lines, &mut vehicles)?;

    Ok(JoinResult {
        vehicle_labels,
        line_labels,
        pairs,
    })
}
