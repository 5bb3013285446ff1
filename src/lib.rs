//! # AvlStore
//!
//! An embedded record store backed by an on-disk AVL tree:
//! - Single flat file holds both tree topology and payload records
//! - Slot-indexed child references instead of native pointers
//! - Iterative insert with single/double rotations (no recursion)
//! - Ordered range queries via an explicit traversal stack
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller / CLI                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      AVL Engine                              │
//! │     (insert / search / delete / range_search / scan_all)     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ slot indices
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Slot Store                              │
//! │        (header + append-only array of 64-byte slots)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ fixed-width blocks
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Record Codec                             │
//! │          (little-endian encode/decode of one node)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod engine;
pub mod loader;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use engine::Engine;
pub use record::{Node, Record};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AvlStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
