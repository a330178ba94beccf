//! # TransitDB
//!
//! A minimal single-file relational storage engine for transit data:
//! - Delimited-text import into compact binary record stores
//! - Per-store header metadata with DIRTY/CLEAN consistency checking
//! - Point and predicate queries over live records
//! - A disk-persisted ordered index mapping line codes to byte offsets
//! - Compaction/sort and a two-store sorted merge join
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Commands                            │
//! │   create_table · select · insert · index · sort · join      │
//! └────────┬──────────────────┬──────────────────┬──────────────┘
//!          │                  │                  │
//!          ▼                  ▼                  ▼
//!   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!   │ Record      │◄───│  Ordered    │    │    Join     │
//!   │ Store       │    │  Index      │    │   Engine    │
//!   │ (header +   │    │ (key →      │    │ (sorted     │
//!   │  records)   │    │  offset)    │    │  merge)     │
//!   └──────┬──────┘    └──────┬──────┘    └─────────────┘
//!          │                  │
//!          ▼                  ▼
//!   ┌─────────────────────────────────┐
//!   │          Binary Codec           │
//!   │  (native-endian fixed widths)   │
//!   └─────────────────────────────────┘
//! ```
//!
//! Single-threaded, synchronous, blocking I/O throughout: one exclusive
//! writer/reader process per store/index pair, no locking. Mutating
//! sequences are bracketed DIRTY-before/CLEAN-after so an interrupted
//! run is detectable at the next open.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod text;

pub mod store;
pub mod entity;
pub mod index;

pub mod compact;
pub mod join;
pub mod commands;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use entity::{Entity, Line, Vehicle};
pub use error::{Result, TransitError};
pub use index::OrderedIndex;
pub use store::{Record, RecordStore, StoreHeader};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TransitDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
