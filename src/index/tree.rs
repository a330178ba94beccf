//! Ordered index file handle
//!
//! Create/load, the DIRTY/CLEAN bracket around insert batches, in-arena
//! insert and search, and the finalize step that persists every node.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec;
use crate::error::{Result, TransitError};
use crate::store::{STATUS_CLEAN, STATUS_DIRTY};

use super::IndexNode;

/// A disk-persisted ordered index over one record store's keys.
///
/// The whole arena lives in memory while the index is open; inserts only
/// touch the arena, and [`OrderedIndex::finalize`] writes every node
/// back in one pass. An interrupted batch leaves the file DIRTY with its
/// pre-batch nodes, which the next load rejects.
pub struct OrderedIndex {
    path: PathBuf,
    file: File,

    /// Node arena; ordinals are the only form of reference between nodes
    nodes: Vec<IndexNode>,
}

impl OrderedIndex {
    /// Initialize an empty index file, truncating any existing one.
    pub fn create(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        codec::write_u8(&mut file, STATUS_CLEAN)?;

        debug!(path = %path.display(), "created index");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            nodes: Vec::new(),
        })
    }

    /// Open an existing index.
    ///
    /// A missing file is `Ok(None)`, not an error: callers fall back to
    /// a full store scan. A DIRTY file is evidence of an interrupted
    /// build and is rejected; this design detects, it does not repair.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let status = codec::read_u8(&mut file)?.ok_or_else(|| {
            TransitError::IndexUnavailable(format!("{}: empty index file", path.display()))
        })?;
        if status != STATUS_CLEAN {
            return Err(TransitError::IndexUnavailable(format!(
                "{}: interrupted build detected (status DIRTY)",
                path.display()
            )));
        }

        let mut nodes = Vec::new();
        while let Some(node) = IndexNode::read(&mut file)? {
            nodes.push(node);
        }

        debug!(path = %path.display(), nodes = nodes.len(), "loaded index");

        Ok(Some(Self {
            path: path.to_path_buf(),
            file,
            nodes,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Consistency bracket
    // =========================================================================

    /// Persist DIRTY status. Call before every insertion batch.
    pub fn mark_dirty(&mut self) -> Result<()> {
        self.write_status(STATUS_DIRTY)
    }

    /// Persist CLEAN status.
    pub fn mark_clean(&mut self) -> Result<()> {
        self.write_status(STATUS_CLEAN)
    }

    fn write_status(&mut self, status: u8) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        codec::write_u8(&mut self.file, status)?;
        Ok(())
    }

    // =========================================================================
    // Insert / search
    // =========================================================================

    /// Insert a key pointing at a record's byte offset, keeping the tree
    /// ordered. Keys are unique per the entity's identifier; inserting a
    /// key twice is rejected and the arena is left unchanged.
    pub fn insert(&mut self, key: i32, data_offset: i64) -> Result<()> {
        if self.nodes.is_empty() {
            self.nodes.push(IndexNode::leaf(key, data_offset));
            return Ok(());
        }

        let new_ordinal = self.nodes.len() as u32;
        let mut current = 0usize;

        loop {
            let node = self.nodes[current];
            let link = if key < node.key {
                node.before
            } else if key > node.key {
                node.after
            } else {
                return Err(TransitError::DuplicateKey(key));
            };

            match link {
                Some(child) => current = child as usize,
                None => {
                    if key < node.key {
                        self.nodes[current].before = Some(new_ordinal);
                    } else {
                        self.nodes[current].after = Some(new_ordinal);
                    }
                    self.nodes.push(IndexNode::leaf(key, data_offset));
                    return Ok(());
                }
            }
        }
    }

    /// Look up a key; `Some(offset)` on an exact match, `None` when a
    /// null link is reached (not found is a normal result, not an error).
    pub fn search(&self, key: i32) -> Option<i64> {
        let mut current = self.nodes.first().map(|_| 0usize);

        while let Some(ordinal) = current {
            let node = &self.nodes[ordinal];
            if key == node.key {
                return Some(node.data_offset);
            }
            let link = if key < node.key {
                node.before
            } else {
                node.after
            };
            current = link.map(|c| c as usize);
        }

        None
    }

    // =========================================================================
    // Finalize
    // =========================================================================

    /// Flush every node and mark the index CLEAN.
    ///
    /// Must be the last operation before the file is closed on any code
    /// path; consuming `self` closes the handle afterwards.
    pub fn finalize(mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(1))?;
        for node in &self.nodes {
            node.write(&mut self.file)?;
        }
        self.mark_clean()?;
        self.file.sync_all()?;

        debug!(path = %self.path.display(), nodes = self.nodes.len(), "finalized index");

        Ok(())
    }
}
