//! Store header
//!
//! Per-store metadata at offset 0: consistency status, the offset where
//! the next record will be appended, live/removed counters, and the
//! entity's display labels in fixed-width slots.

use std::io::{Read, Write};

use crate::codec;
use crate::error::{Result, TransitError};

use super::{FIXED_HEADER_LEN, STATUS_CLEAN, STATUS_DIRTY};

/// Header of a record store file.
///
/// Owned exclusively by its [`super::RecordStore`]; every operation that
/// touches the store goes through an exclusive mutable reference, so the
/// counters can never be updated from two places at once.
#[derive(Debug, Clone)]
pub struct StoreHeader {
    /// DIRTY while a mutating pass runs, CLEAN only after it completes
    pub status: u8,

    /// Byte offset where the next appended record will be written
    pub next_free_offset: i64,

    /// Number of live records
    pub live_count: i32,

    /// Number of logically removed records
    pub removed_count: i32,

    /// Display labels for the entity's fields (metadata only)
    pub labels: Vec<String>,

    /// Fixed slot width of each label, entity-specific
    label_widths: &'static [usize],
}

impl StoreHeader {
    /// Header for a freshly created store: DIRTY, no records, next free
    /// offset right after the header itself.
    pub fn new(label_widths: &'static [usize], labels: Vec<String>) -> Self {
        Self {
            status: STATUS_DIRTY,
            next_free_offset: Self::data_start(label_widths),
            live_count: 0,
            removed_count: 0,
            labels,
            label_widths,
        }
    }

    /// Offset of the first data record for an entity's label widths.
    pub fn data_start(label_widths: &'static [usize]) -> i64 {
        FIXED_HEADER_LEN + label_widths.iter().sum::<usize>() as i64
    }

    /// Total encoded length of this header.
    pub fn encoded_len(&self) -> i64 {
        Self::data_start(self.label_widths)
    }

    pub fn is_clean(&self) -> bool {
        self.status == STATUS_CLEAN
    }

    /// Every record ever appended, live or removed.
    pub fn total_records(&self) -> i32 {
        self.live_count + self.removed_count
    }

    /// Count one appended record into the matching counter.
    pub fn count_append(&mut self, live: bool) {
        if live {
            self.live_count += 1;
        } else {
            self.removed_count += 1;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.status = STATUS_DIRTY;
    }

    pub fn mark_clean(&mut self) {
        self.status = STATUS_CLEAN;
    }

    /// Decode a header from the start of a store file.
    pub fn read<R: Read>(r: &mut R, label_widths: &'static [usize]) -> Result<Self> {
        let status = codec::read_u8(r)?
            .ok_or(TransitError::Truncated("store header status"))?;
        let next_free_offset = codec::read_i64(r)?
            .ok_or(TransitError::Truncated("store header next free offset"))?;
        let live_count = codec::read_i32(r)?
            .ok_or(TransitError::Truncated("store header live count"))?;
        let removed_count = codec::read_i32(r)?
            .ok_or(TransitError::Truncated("store header removed count"))?;

        let mut labels = Vec::with_capacity(label_widths.len());
        for width in label_widths {
            labels.push(codec::read_fixed_text(r, *width, "store header label")?);
        }

        Ok(Self {
            status,
            next_free_offset,
            live_count,
            removed_count,
            labels,
            label_widths,
        })
    }

    /// Encode this header; always writes exactly `encoded_len()` bytes.
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_u8(w, self.status)?;
        codec::write_i64(w, self.next_free_offset)?;
        codec::write_i32(w, self.live_count)?;
        codec::write_i32(w, self.removed_count)?;

        for (i, width) in self.label_widths.iter().enumerate() {
            let label = self.labels.get(i).map(String::as_str).unwrap_or("");
            codec::write_fixed_text(w, label, *width)?;
        }

        Ok(())
    }
}
