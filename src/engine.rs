//! Engine Module
//!
//! The AVL engine: balancing logic over the slot store.
//!
//! ## Responsibilities
//! - Iterative insert with single/double rotation
//! - Key lookup and ordered range scan
//! - Structural delete with in-order successor splice
//! - Serialize operations over the underlying file
//!
//! All traversal is iterative — an explicit slot stack for range scans
//! and a bounded ancestor chain for insert/delete — so stack usage stays
//! constant regardless of tree depth. Nodes are addressed exclusively by
//! slot index; byte offsets never appear at this layer.

use std::path::Path;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::record::{Node, Record, Side, NIL};
use crate::storage::SlotFile;

/// The record store engine
///
/// ## Concurrency Model: Exclusive Per-Operation
///
/// Each public operation locks the slot file for its own duration and
/// releases it on return. Nothing spans operations: no versioning, no
/// transaction boundary, no retry. A crash between the writes of one
/// rotation or splice leaves the file in an engine-undefined state —
/// the accepted failure model for a non-transactional single-file store.
/// Callers needing cross-operation atomicity must serialize externally
/// or run independent engines over disjoint files.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The slot store (exclusive access per operation)
    store: Mutex<SlotFile>,
}

impl Engine {
    /// Open or create an engine with the given config
    pub fn open(config: Config) -> Result<Self> {
        let store = SlotFile::open(&config.file_path, config.truncate)?;

        Ok(Self {
            config,
            store: Mutex::new(store),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified store file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().file_path(path).build();
        Self::open(config)
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert a record, keeping the tree height-balanced
    ///
    /// A single descent locates the attachment point while tracking `S`,
    /// the deepest ancestor whose balance factor is non-zero — the only
    /// node that can tip to ±2 — and `T`, S's parent. After the new leaf
    /// is appended and linked, the balance factors between S and the leaf
    /// are set to the descent direction, then at most one rotation (or
    /// double rotation) at S restores the invariant.
    ///
    /// Fails with `DuplicateKey` when the key is already present; the
    /// existing record is untouched.
    pub fn insert(&self, record: Record) -> Result<()> {
        let mut store = self.store.lock();
        let head = store.head()?;

        let mut node = Node::leaf(record);
        let key = node.key();

        // Empty tree: the first record becomes the root.
        if head == NIL {
            let slot = store.append(&mut node)?;
            store.set_head(slot)?;
            tracing::debug!(key, slot, "inserted root record");
            return Ok(());
        }

        // Stage 1: descend to the attachment point.
        let mut t: Option<Node> = None;
        let mut s = store.get(head)?;
        let mut p = s.clone();
        let attach_side;
        loop {
            let dir = Side::of(key, p.key()).ok_or(StoreError::DuplicateKey { key })?;
            match store.get_opt(p.child(dir))? {
                None => {
                    attach_side = dir;
                    break;
                }
                Some(q) => {
                    if q.balance != 0 {
                        t = Some(p.clone());
                        s = q.clone();
                    }
                    p = q;
                }
            }
        }

        // Stage 2: append the leaf and link it under its parent.
        let leaf_slot = store.append(&mut node)?;
        p.set_child(attach_side, leaf_slot);
        store.set(&p)?;

        // The parent may have been S itself; reload so the link is visible.
        let mut s = store.get(s.slot)?;

        // Stage 3: every node strictly between S and the leaf was balanced
        // before; set each one's factor to the side the new key fell on.
        let grow = Side::toward(key, s.key());
        let r_slot = s.child(grow);
        let mut walk = store.get(r_slot)?;
        while walk.slot != leaf_slot {
            let dir = Side::toward(key, walk.key());
            walk.balance = dir.factor();
            store.set(&walk)?;
            walk = store.get(walk.child(dir))?;
        }

        // Stage 4: resolve S.
        let a = grow.factor();

        if s.balance == 0 {
            // The subtree grew taller but stayed within tolerance.
            s.balance = a;
            store.set(&s)?;
            tracing::debug!(key, slot = leaf_slot, "inserted, tree grew");
            return Ok(());
        }
        if s.balance == -a {
            // Growth on the shorter side evened S out.
            s.balance = 0;
            store.set(&s)?;
            tracing::debug!(key, slot = leaf_slot, "inserted, tree rebalanced");
            return Ok(());
        }

        // S tipped to ±2. R is S's child on the growth side; its balance
        // factor was refreshed by stage 3 and decides the rotation kind.
        let mut r = store.get(r_slot)?;
        let new_root = if r.balance == a {
            // Single rotation: R takes S's place, S becomes R's child on
            // the opposite side, both factors reset.
            s.set_child(grow, r.child(grow.opposite()));
            r.set_child(grow.opposite(), s.slot);
            s.balance = 0;
            r.balance = 0;
            store.set(&s)?;
            store.set(&r)?;
            tracing::debug!(key, pivot = s.key(), "single rotation");
            r.slot
        } else {
            // Double rotation: R's child on the inner side is promoted
            // above both S and R; the three factors resolve from its
            // pre-rotation factor.
            let mut q = store.get(r.child(grow.opposite()))?;
            r.set_child(grow.opposite(), q.child(grow));
            q.set_child(grow, r.slot);
            s.set_child(grow, q.child(grow.opposite()));
            q.set_child(grow.opposite(), s.slot);

            if q.balance == a {
                s.balance = -a;
                r.balance = 0;
            } else if q.balance == 0 {
                s.balance = 0;
                r.balance = 0;
            } else {
                s.balance = 0;
                r.balance = a;
            }
            q.balance = 0;

            store.set(&q)?;
            store.set(&r)?;
            store.set(&s)?;
            tracing::debug!(key, pivot = s.key(), "double rotation");
            q.slot
        };

        // Stage 5: the rotated subtree has a new root; re-link it into T,
        // or retarget the header when S was the overall root.
        match t {
            None => store.set_head(new_root)?,
            Some(mut t) => {
                let side = if t.right == s.slot {
                    Side::Right
                } else {
                    Side::Left
                };
                t.set_child(side, new_root);
                store.set(&t)?;
            }
        }

        tracing::debug!(key, slot = leaf_slot, "inserted, tree rotated");
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Look up a record by key
    ///
    /// Fails with `EmptyTree` when there is no root and `NotFound` when
    /// the descent reaches a null child before matching.
    pub fn search(&self, key: i32) -> Result<Record> {
        let mut store = self.store.lock();
        let head = store.head()?;
        if head == NIL {
            return Err(StoreError::EmptyTree);
        }

        let mut p = store.get(head)?;
        loop {
            match Side::of(key, p.key()) {
                None => return Ok(p.record),
                Some(dir) => match store.get_opt(p.child(dir))? {
                    Some(q) => p = q,
                    None => return Err(StoreError::NotFound { key }),
                },
            }
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove a record by key
    ///
    /// Structural deletion only: the node is detached (or, with two
    /// children, replaced by its in-order successor, which takes over
    /// the target's children) and the vacated slot stays on disk. BST
    /// order is preserved, but balance factors are NOT recomputed —
    /// after deletions the tree is BST-guaranteed, AVL-balance is not.
    pub fn delete(&self, key: i32) -> Result<()> {
        let mut store = self.store.lock();
        let head = store.head()?;
        if head == NIL {
            return Err(StoreError::EmptyTree);
        }

        // Stage 1: find the target and its immediate parent.
        let mut parent: Option<(Node, Side)> = None;
        let mut p = store.get(head)?;
        loop {
            match Side::of(key, p.key()) {
                None => break,
                Some(dir) => match store.get_opt(p.child(dir))? {
                    Some(q) => {
                        parent = Some((p, dir));
                        p = q;
                    }
                    None => return Err(StoreError::NotFound { key }),
                },
            }
        }

        // Stage 2: pick the subtree that replaces the target.
        let replacement = if p.left != NIL && p.right != NIL {
            // Two children: splice out the in-order successor (leftmost
            // node of the right subtree) and install it in the target's
            // position with the target's children.
            let mut o2 = p.clone();
            let mut succ = store.get(p.right)?;
            let mut succ_side = Side::Right;
            while succ.left != NIL {
                o2 = succ;
                succ = store.get(o2.left)?;
                succ_side = Side::Left;
            }

            o2.set_child(succ_side, succ.right);
            if o2.slot == p.slot {
                // The successor was the target's direct right child.
                p = o2.clone();
            }
            succ.left = p.left;
            succ.right = p.right;

            store.set(&o2)?;
            store.set(&succ)?;
            succ.slot
        } else if p.left != NIL {
            p.left
        } else {
            // Single right child, or NIL for a leaf.
            p.right
        };

        // Stage 3: re-link the parent (or the header when the target was
        // the root). The vacated slot remains on disk, unreachable.
        match parent {
            None => store.set_head(replacement)?,
            Some((mut o, dir)) => {
                o.set_child(dir, replacement);
                store.set(&o)?;
            }
        }

        tracing::debug!(key, slot = p.slot, "deleted record");
        Ok(())
    }

    // =========================================================================
    // Range Search
    // =========================================================================

    /// Collect every record with `low <= key <= high`, in ascending
    /// key order
    ///
    /// Iterative in-order traversal over an explicit slot stack. A left
    /// subtree is abandoned wholesale once a node's key is at or below
    /// `low`; descent to the right stops once a node's key reaches
    /// `high`, since every remaining in-order key is larger. Returns an
    /// empty vec when nothing matches or the tree is empty.
    pub fn range_search(&self, low: i32, high: i32) -> Result<Vec<Record>> {
        let mut store = self.store.lock();
        let mut records = Vec::new();
        let mut stack: Vec<i32> = Vec::new();

        let head = store.head()?;
        let mut current = store.get_opt(head)?;

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current.take() {
                let descend = node.key() > low;
                stack.push(node.slot);
                if !descend {
                    break;
                }
                current = store.get_opt(node.left)?;
            }

            let Some(slot) = stack.pop() else { break };
            let node = store.get(slot)?;
            let key = node.key();

            if low <= key && key <= high {
                records.push(node.record);
            }

            // At or past the upper bound every remaining in-order key is
            // larger; abandon the right subtree and let the stack unwind.
            current = if key < high {
                store.get_opt(node.right)?
            } else {
                None
            };
        }

        Ok(records)
    }

    // =========================================================================
    // Scan
    // =========================================================================

    /// Raw slot-order scan of the whole file
    ///
    /// Includes slots detached by deletion (the store never reclaims
    /// them) — a documented limitation, not the ordered view.
    pub fn scan_all(&self) -> Result<Vec<Record>> {
        self.store.lock().scan_all()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Slot index of the tree root, or -1 when empty
    pub fn head_slot(&self) -> Result<i32> {
        self.store.lock().head()
    }

    /// Number of slots ever appended (never decremented by delete)
    pub fn record_count(&self) -> Result<i32> {
        self.store.lock().count()
    }

    /// Read one raw node, links and balance factor included
    pub fn node(&self, slot: i32) -> Result<Node> {
        self.store.lock().get(slot)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
