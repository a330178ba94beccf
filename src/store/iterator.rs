//! Sequential record scan
//!
//! Forward pass over every record in a store, live or removed, following
//! each record's encoded length. Yields the byte offset each record
//! starts at, which index builds persist as the lookup target.

use crate::error::Result;

use super::{Record, RecordStore};

/// Iterator over `(byte_offset, record)` pairs in append order.
///
/// Created by [`RecordStore::records`], which positions the file at the
/// first data offset. Ends when the next record's tombstone byte cannot
/// be read; a decode error ends the scan after being yielded once.
pub struct Records<'a, R: Record> {
    store: &'a mut RecordStore<R>,
    done: bool,
}

impl<'a, R: Record> Records<'a, R> {
    pub(super) fn new(store: &'a mut RecordStore<R>) -> Self {
        Self { store, done: false }
    }
}

impl<'a, R: Record> Iterator for Records<'a, R> {
    type Item = Result<(i64, R)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let offset = match self.store.position() {
            Ok(offset) => offset,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        match self.store.next_record() {
            Ok(Some(record)) => Some(Ok((offset, record))),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
