//! Record Module
//!
//! Node and payload types plus the fixed-width binary codec.
//!
//! ## Slot Format (64 bytes, little-endian)
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ Key: i32 (4)                                              │
//! ├───────────────────────────────────────────────────────────┤
//! │ Name: 30 bytes, space-padded                              │
//! ├───────────────────────────────────────────────────────────┤
//! │ Quantity: i32 (4) | Price: f32 (4)                        │
//! ├───────────────────────────────────────────────────────────┤
//! │ Date: 10 bytes, space-padded                              │
//! ├───────────────────────────────────────────────────────────┤
//! │ BalanceFactor: i32 (4) | Left: i32 (4) | Right: i32 (4)   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Child links are slot indices into the store file, not byte offsets,
//! so they survive a file reopen unchanged. `-1` is the null sentinel.

mod codec;

pub use codec::{decode, encode};

// =============================================================================
// Layout Constants (shared by codec and slot store)
// =============================================================================

/// Null sentinel for slot references
pub const NIL: i32 = -1;

/// Fixed width of the name field in bytes
pub const NAME_WIDTH: usize = 30;

/// Fixed width of the date field in bytes
pub const DATE_WIDTH: usize = 10;

/// Size of one encoded node: key + name + quantity + price + date +
/// balance factor + two child links
pub const NODE_SIZE: usize = 4 + NAME_WIDTH + 4 + 4 + DATE_WIDTH + 4 + 4 + 4;

/// Size of the file header: head slot (i32) + record count (i32)
pub const HEADER_SIZE: usize = 8;

// =============================================================================
// Payload and Node Types
// =============================================================================

/// The business payload of one record. Opaque to the tree except for `id`,
/// which is the unique ordering key.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique ordering key; duplicates are rejected on insert
    pub id: i32,
    /// Truncated to [`NAME_WIDTH`] bytes on encode
    pub name: String,
    pub quantity: i32,
    pub price: f32,
    /// Truncated to [`DATE_WIDTH`] bytes on encode
    pub date: String,
}

impl Record {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        quantity: i32,
        price: f32,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            price,
            date: date.into(),
        }
    }
}

/// One tree node as stored in a slot: payload plus AVL bookkeeping.
///
/// `slot` is runtime-only state assigned by the slot store on read/append;
/// it is never written to disk (a node's position IS its slot).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub record: Record,
    /// height(right) - height(left); AVL validity keeps this in {-1,0,1}
    pub balance: i32,
    /// Slot index of the left child, or [`NIL`]
    pub left: i32,
    /// Slot index of the right child, or [`NIL`]
    pub right: i32,
    /// Slot this node was read from / appended at (runtime-only)
    pub slot: i32,
}

impl Node {
    /// Create a detached leaf node for `record` (no children, balance 0)
    pub fn leaf(record: Record) -> Self {
        Self {
            record,
            balance: 0,
            left: NIL,
            right: NIL,
            slot: NIL,
        }
    }

    /// Ordering key shorthand
    pub fn key(&self) -> i32 {
        self.record.id
    }

    /// Child link on the given side
    pub fn child(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Overwrite the child link on the given side
    pub fn set_child(&mut self, side: Side, slot: i32) {
        match side {
            Side::Left => self.left = slot,
            Side::Right => self.right = slot,
        }
    }
}

// =============================================================================
// Descent Direction
// =============================================================================

/// Which child to follow during a descent. Maps to the balance-factor
/// convention: `Left` leans -1, `Right` leans +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The balance-factor contribution of growth on this side
    pub fn factor(self) -> i32 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Direction `key` falls relative to a node's key, for paths where
    /// equality cannot occur (the key was already proven absent)
    pub fn toward(key: i32, node_key: i32) -> Side {
        if key < node_key {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Direction `key` falls relative to a node's key. `None` on equality.
    pub fn of(key: i32, node_key: i32) -> Option<Side> {
        if key < node_key {
            Some(Side::Left)
        } else if key > node_key {
            Some(Side::Right)
        } else {
            None
        }
    }
}
