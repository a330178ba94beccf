//! Record store file handle
//!
//! Create/open, header validation, append, point and sequential reads,
//! and the sorted rewrite that compaction is built on.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec;
use crate::error::{Result, TransitError};

use super::iterator::Records;
use super::{Record, StoreHeader, TOMBSTONE_LIVE, TOMBSTONE_REMOVED};

/// A single entity's record store file.
///
/// The header is owned here and only reachable through `&mut self`, so
/// the counters and next-free-offset have exactly one writer. The header
/// on disk is refreshed by `mark_dirty`/`mark_clean`, which bracket every
/// mutating pass; between the two, only the in-memory copy advances.
pub struct RecordStore<R: Record> {
    /// Path, kept for logging and error context
    path: PathBuf,

    /// Underlying file; all I/O is synchronous and blocking
    file: File,

    /// In-memory header state
    header: StoreHeader,

    _entity: PhantomData<R>,
}

impl<R: Record> RecordStore<R> {
    /// Create a new store, truncating any existing file.
    ///
    /// The header is written immediately with DIRTY status; call
    /// `mark_clean` once the initial load completes.
    pub fn create(path: &Path, labels: Vec<String>) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let header = StoreHeader::new(R::LABEL_WIDTHS, labels);
        header.write(&mut file)?;

        debug!(entity = R::NAME, path = %path.display(), "created store");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            header,
            _entity: PhantomData,
        })
    }

    /// Open an existing store for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, false)
    }

    /// Open an existing store for reading and appending.
    pub fn open_for_update(path: &Path) -> Result<Self> {
        Self::open_with(path, true)
    }

    fn open_with(path: &Path, writable: bool) -> Result<Self> {
        let mut file = OpenOptions::new().read(true).write(writable).open(path)?;
        let header = StoreHeader::read(&mut file, R::LABEL_WIDTHS)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            header,
            _entity: PhantomData,
        })
    }

    /// Check the header before use, consuming the store on failure.
    ///
    /// `check_status` rejects a DIRTY store (interrupted prior write);
    /// `check_records` rejects a store with no records at all. The file
    /// handle is closed on the error path by dropping `self`.
    pub fn validate(self, check_status: bool, check_records: bool) -> Result<Self> {
        if check_status && !self.header.is_clean() {
            return Err(TransitError::Inconsistent(format!(
                "{}: interrupted write detected (status DIRTY)",
                self.path.display()
            )));
        }

        if check_records && self.header.total_records() == 0 {
            return Err(TransitError::Inconsistent(format!(
                "{}: store holds no records",
                self.path.display()
            )));
        }

        Ok(self)
    }

    pub fn header(&self) -> &StoreHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the header with DIRTY status. Call before any mutating pass.
    pub fn mark_dirty(&mut self) -> Result<()> {
        self.header.mark_dirty();
        self.write_header()
    }

    /// Persist the header with CLEAN status and sync. Call only after a
    /// mutating pass completed without error.
    pub fn mark_clean(&mut self) -> Result<()> {
        self.header.mark_clean();
        self.write_header()?;
        self.file.sync_all()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.header.write(&mut self.file)?;
        Ok(())
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Append one record at the next free offset.
    ///
    /// Writes the tombstone flag, the encoded length, then the entity
    /// body; advances `next_free_offset` to the new end of data and bumps
    /// the matching counter. The only mutating primitive: there is no
    /// update-in-place and no physical delete.
    ///
    /// Returns the byte offset the record was written at.
    pub fn append(&mut self, record: &R) -> Result<i64> {
        let offset = self.header.next_free_offset;
        self.file.seek(SeekFrom::Start(offset as u64))?;

        let tombstone = if record.is_live() {
            TOMBSTONE_LIVE
        } else {
            TOMBSTONE_REMOVED
        };
        codec::write_u8(&mut self.file, tombstone)?;
        codec::write_i32(&mut self.file, record.body_len())?;
        record.write_body(&mut self.file)?;

        self.header.next_free_offset = self.file.stream_position()? as i64;
        self.header.count_append(record.is_live());

        Ok(offset)
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Decode one record starting at the given byte offset.
    ///
    /// `None` means the offset is at or past the end of data.
    pub fn read_at(&mut self, offset: i64) -> Result<Option<R>> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.decode_next()
    }

    /// Decode the record at the current file position.
    ///
    /// `None` distinguishes "no more records" from a logically removed
    /// record, which is still returned with its tombstone flag set so
    /// callers can filter.
    pub fn next_record(&mut self) -> Result<Option<R>> {
        self.decode_next()
    }

    /// Iterate every record from the first data offset, live or removed,
    /// yielding each record's byte offset alongside it.
    pub fn records(&mut self) -> Result<Records<'_, R>> {
        let start = self.header.encoded_len();
        self.file.seek(SeekFrom::Start(start as u64))?;
        Ok(Records::new(self))
    }

    pub(super) fn position(&mut self) -> Result<i64> {
        Ok(self.file.stream_position()? as i64)
    }

    fn decode_next(&mut self) -> Result<Option<R>> {
        // The tombstone byte failing to read is the end-of-data signal.
        let tombstone = match codec::read_u8(&mut self.file)? {
            Some(b) => b,
            None => return Ok(None),
        };

        // Past the first byte we are mid-record: short data is truncation.
        let _body_len = codec::read_i32(&mut self.file)?
            .ok_or(TransitError::Truncated("record length"))?;

        let live = tombstone == TOMBSTONE_LIVE;
        let record = R::read_body(&mut self.file, live)?;
        Ok(Some(record))
    }

    // =========================================================================
    // Sorted rewrite
    // =========================================================================

    /// Rewrite this store into a fresh one at `dest`: live records only,
    /// ordered ascending by key. The only way space held by removed
    /// records is ever reclaimed.
    ///
    /// The destination header starts re-zeroed and DIRTY, and flips CLEAN
    /// only after every record is appended; no partial output is ever
    /// left in the CLEAN state.
    pub fn rewrite_sorted(&mut self, dest: &Path) -> Result<RecordStore<R>> {
        let live_count = self.header.live_count.max(0) as usize;

        let mut buffer: Vec<R> = Vec::new();
        buffer.try_reserve_exact(live_count).map_err(|e| {
            TransitError::Allocation(format!(
                "buffer for {} live {} records: {}",
                live_count,
                R::NAME,
                e
            ))
        })?;

        for entry in self.records()? {
            let (_, record) = entry?;
            if record.is_live() {
                buffer.push(record);
            }
        }

        buffer.sort_by_key(Record::key);

        let mut rewritten = RecordStore::create(dest, self.header.labels.clone())?;
        for record in &buffer {
            rewritten.append(record)?;
        }
        rewritten.mark_clean()?;

        debug!(
            entity = R::NAME,
            records = buffer.len(),
            dest = %dest.display(),
            "rewrote store sorted"
        );

        Ok(rewritten)
    }
}
