//! Error types for TransitDB
//!
//! Provides a unified error type for all operations.
//!
//! "Not found" is never an error anywhere in this crate: queries that
//! match nothing return `None` or an empty `Vec`.

use thiserror::Error;

/// Result type alias using TransitError
pub type Result<T> = std::result::Result<T, TransitError>;

/// Unified error type for TransitDB operations
#[derive(Debug, Error)]
pub enum TransitError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// A fixed-size read hit end of data mid-record. End of data at a
    /// record boundary is not an error (scans report it as `None`).
    #[error("truncated read: {0}")]
    Truncated(&'static str),

    /// DIRTY status on open, or an empty store where records were required.
    #[error("inconsistent store: {0}")]
    Inconsistent(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    /// Index file missing where one is required, or DIRTY on load.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    /// The ordered index holds at most one node per key.
    #[error("duplicate index key: {0}")]
    DuplicateKey(i32),

    // -------------------------------------------------------------------------
    // Compaction Errors
    // -------------------------------------------------------------------------
    /// Could not size the in-memory record buffer for a rewrite.
    #[error("allocation failure: {0}")]
    Allocation(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("malformed record text: {0}")]
    Parse(String),

    #[error("unknown field: {0}")]
    UnknownField(String),
}
