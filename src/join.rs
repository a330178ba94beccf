//! Join Engine
//!
//! Sorted merge join over two record stores that are already ordered
//! ascending by their join keys. The join never sorts; producing the
//! sorted inputs is the caller's job (see [`crate::compact`]).

use tracing::debug;

use crate::error::Result;
use crate::store::{Record, Records, RecordStore};

/// Merge-join a dimension store against a detail store on their keys.
///
/// `one` is the dimension side, whose key is unique; `many` is the
/// detail side, whose key may repeat (the foreign key). One cursor per
/// store advances in a single forward pass:
///
/// - keys equal: emit the pair and advance only the detail cursor, so
///   the dimension row stays current until its key stops matching;
/// - dimension key smaller: advance the dimension cursor;
/// - detail key smaller: advance the detail cursor.
///
/// Terminates when either store is exhausted. Exactly one pair is
/// emitted per matching (detail, dimension) combination; zero pairs is
/// a normal result the caller reports as "no match found".
pub fn merge_join<One, Many>(
    one: &mut RecordStore<One>,
    many: &mut RecordStore<Many>,
) -> Result<Vec<(Many, One)>>
where
    One: Record + Clone,
    Many: Record,
{
    let mut ones = one.records()?;
    let mut manys = many.records()?;

    let mut current_one = next_live(&mut ones)?;
    let mut current_many = next_live(&mut manys)?;

    let mut pairs = Vec::new();

    loop {
        let (one_key, many_key) = match (&current_one, &current_many) {
            (Some(o), Some(m)) => (o.key(), m.key()),
            _ => break,
        };

        if one_key == many_key {
            if let (Some(m), Some(o)) = (current_many.take(), current_one.as_ref()) {
                pairs.push((m, o.clone()));
            }
            current_many = next_live(&mut manys)?;
        } else if one_key < many_key {
            current_one = next_live(&mut ones)?;
        } else {
            current_many = next_live(&mut manys)?;
        }
    }

    debug!(
        dimension = One::NAME,
        detail = Many::NAME,
        pairs = pairs.len(),
        "merge join complete"
    );

    Ok(pairs)
}

/// Advance a scan cursor to its next live record.
///
/// Sorted stores produced by compaction hold no tombstones, but a store
/// sorted before further appends may; skipping keeps the pass correct
/// either way.
fn next_live<R: Record>(records: &mut Records<'_, R>) -> Result<Option<R>> {
    for entry in records {
        let (_, record) = entry?;
        if record.is_live() {
            return Ok(Some(record));
        }
    }
    Ok(None)
}
