//! Record Store
//!
//! One entity's on-disk layout: a fixed-size header followed by an
//! append-only sequence of variable-length records.
//!
//! ## File Format
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ Header (17 bytes + fixed-width labels)                        │
//! │   Status: u8 | NextFree: i64 | Live: i32 | Removed: i32       │
//! │   Label slots (entity-specific widths, zero-padded)           │
//! ├───────────────────────────────────────────────────────────────┤
//! │ Records (variable, append-only)                               │
//! │   [Tombstone: u8][BodyLen: i32][entity body: BodyLen bytes]   │
//! │   ... repeated; removed records keep their bytes ...          │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scanning from the first data offset and following each record's
//! `BodyLen` visits every record exactly once, live or removed, with no
//! gaps and no overlaps. Records are never rewritten in place; space is
//! reclaimed only by [`RecordStore::rewrite_sorted`].
//!
//! Every mutating pass is bracketed by `mark_dirty` / `mark_clean`; a
//! store whose status byte is DIRTY on open was interrupted mid-write and
//! is rejected by validation.

mod file;
mod header;
mod iterator;
mod record;

pub use file::RecordStore;
pub use header::StoreHeader;
pub use iterator::Records;
pub use record::Record;

// =============================================================================
// Shared Constants (used by header, store, index)
// =============================================================================

/// Status byte: a mutating pass is in progress or was interrupted
pub const STATUS_DIRTY: u8 = b'0';

/// Status byte: the last mutating pass completed
pub const STATUS_CLEAN: u8 = b'1';

/// Tombstone byte: record is logically removed
pub const TOMBSTONE_REMOVED: u8 = b'0';

/// Tombstone byte: record is live
pub const TOMBSTONE_LIVE: u8 = b'1';

/// Fixed header part: Status (1) + NextFree (8) + Live (4) + Removed (4)
pub const FIXED_HEADER_LEN: i64 = 17;
