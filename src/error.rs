//! Error types for AvlStore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for AvlStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Tree Errors
    // -------------------------------------------------------------------------
    /// The operation requires a root node but the tree is empty
    #[error("Tree is empty")]
    EmptyTree,

    /// The key is not present in the tree
    #[error("No record found with key {key}")]
    NotFound { key: i32 },

    /// Insert of a key already present; the original record is untouched
    #[error("A record with key {key} already exists")]
    DuplicateKey { key: i32 },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// A slot reference outside `[0, record_count)` — file corruption or
    /// a logic defect
    #[error("Slot {slot} out of range (record count {count})")]
    OutOfRange { slot: i32, count: i32 },

    /// Malformed header or block detected while opening or loading
    #[error("Corrupt store: {0}")]
    Corrupt(String),
}
