//! Storage Module
//!
//! The slot store: a single flat file holding a fixed header followed by
//! an append-only array of record-sized blocks.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (8 bytes)                                        │
//! │   HeadSlot: i32 (4) | RecordCount: i32 (4)              │
//! ├─────────────────────────────────────────────────────────┤
//! │ Slot 0 (64 bytes)                                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Slot 1 (64 bytes)                                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ ...                                                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Slot `i` begins at byte `8 + i*64`. `HeadSlot` is the slot index of
//! the tree root, or -1 when the tree is empty. `RecordCount` counts
//! slots ever appended and is never decremented: deletion detaches a
//! node from the tree but the slot itself is never reclaimed, so a raw
//! scan can surface slots no longer reachable from the head.

mod slot_file;

pub use slot_file::SlotFile;
