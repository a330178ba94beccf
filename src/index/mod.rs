//! Ordered Index
//!
//! A disk-persisted key-ordered structure mapping an integer key to a
//! record's byte offset in its record store. The index never reads
//! record payloads; it stores keys and offsets and hands offsets back
//! for the store to materialize.
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Status: u8 (DIRTY while an insert batch runs)              │
//! ├────────────────────────────────────────────────────────────┤
//! │ Nodes (20 bytes each, ordinal-addressed)                   │
//! │   [Key: i32][DataOffset: i64][Before: i32][After: i32]     │
//! │   ... Before/After are node ordinals, -1 = no child ...    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nodes form a plain binary search tree held in an in-memory arena and
//! addressed only by ordinal; node 0 is the root, which never moves
//! because no operation deletes or rotates nodes. Search and insert run
//! in time proportional to the tree height; no balance is guaranteed.
//!
//! Per key the lifecycle is `{absent} -> insert -> {present}`: there is
//! no update and no delete, and inserting a key twice is rejected.

mod node;
mod tree;

pub use node::IndexNode;
pub use tree::OrderedIndex;

/// Persisted child-link value meaning "no child"
pub(crate) const NULL_LINK: i32 = -1;
