//! Index node codec

use std::io::{Read, Write};

use crate::codec;
use crate::error::{Result, TransitError};

use super::NULL_LINK;

/// One key's entry in the ordered index.
///
/// Child links are ordinals of sibling nodes in the same arena/file,
/// never language-level references; `None` is persisted as -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexNode {
    /// Search key
    pub key: i32,

    /// Byte offset of the corresponding live record in its store
    pub data_offset: i64,

    /// Subtree with keys smaller than `key`
    pub before: Option<u32>,

    /// Subtree with keys greater than `key`
    pub after: Option<u32>,
}

impl IndexNode {
    /// A fresh leaf for an inserted key.
    pub fn leaf(key: i32, data_offset: i64) -> Self {
        Self {
            key,
            data_offset,
            before: None,
            after: None,
        }
    }

    /// Decode one node; `None` when the stream ends at a node boundary.
    pub fn read<R: Read>(r: &mut R) -> Result<Option<Self>> {
        let key = match codec::read_i32(r)? {
            Some(key) => key,
            None => return Ok(None),
        };
        let data_offset =
            codec::read_i64(r)?.ok_or(TransitError::Truncated("index node offset"))?;
        let before = codec::read_i32(r)?.ok_or(TransitError::Truncated("index node link"))?;
        let after = codec::read_i32(r)?.ok_or(TransitError::Truncated("index node link"))?;

        Ok(Some(Self {
            key,
            data_offset,
            before: decode_link(before),
            after: decode_link(after),
        }))
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_i32(w, self.key)?;
        codec::write_i64(w, self.data_offset)?;
        codec::write_i32(w, encode_link(self.before))?;
        codec::write_i32(w, encode_link(self.after))?;
        Ok(())
    }
}

fn decode_link(raw: i32) -> Option<u32> {
    if raw == NULL_LINK {
        None
    } else {
        Some(raw as u32)
    }
}

fn encode_link(link: Option<u32>) -> i32 {
    match link {
        Some(ordinal) => ordinal as i32,
        None => NULL_LINK,
    }
}
