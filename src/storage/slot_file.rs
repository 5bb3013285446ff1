//! Slot file implementation
//!
//! Whole-block random-access reads and writes over the store file. All
//! addressing is by slot index; byte offsets never leave this module.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::record::{self, Node, Record, HEADER_SIZE, NIL, NODE_SIZE};

/// The append-only array of node slots plus the fixed header
pub struct SlotFile {
    file: File,
    path: PathBuf,
}

impl SlotFile {
    /// Open or create the store file
    ///
    /// With `truncate` set (or when the file does not exist) a fresh
    /// empty store is written: head = -1, count = 0. Otherwise the
    /// existing file is reopened and its header validated — slot
    /// references are stable across reopen, so no rebuild is needed.
    pub fn open(path: &Path, truncate: bool) -> Result<Self> {
        let fresh = truncate || !path.exists();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(truncate)
            .open(path)?;

        let mut store = Self {
            file,
            path: path.to_path_buf(),
        };

        if fresh {
            store.write_header(NIL, 0)?;
            tracing::debug!("Created empty store at {}", store.path.display());
        } else {
            store.validate_header()?;
        }

        Ok(store)
    }

    /// Check that the existing file carries a coherent header
    fn validate_header(&mut self) -> Result<()> {
        let len = self.file.metadata()?.len();
        if len < HEADER_SIZE as u64 {
            return Err(StoreError::Corrupt(format!(
                "file too short for header: {} bytes",
                len
            )));
        }

        let head = self.head()?;
        let count = self.count()?;

        if count < 0 {
            return Err(StoreError::Corrupt(format!(
                "negative record count: {}",
                count
            )));
        }
        if head != NIL && (head < 0 || head >= count) {
            return Err(StoreError::Corrupt(format!(
                "head slot {} outside record count {}",
                head, count
            )));
        }

        Ok(())
    }

    // =========================================================================
    // Header Access
    // =========================================================================

    /// Slot index of the tree root, or [`NIL`] when the tree is empty
    pub fn head(&mut self) -> Result<i32> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut bytes = [0u8; 4];
        self.file.read_exact(&mut bytes)?;
        Ok(i32::from_le_bytes(bytes))
    }

    /// Retarget the root pointer
    pub fn set_head(&mut self, slot: i32) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&slot.to_le_bytes())?;
        Ok(())
    }

    /// Number of slots ever appended; never decremented
    pub fn count(&mut self) -> Result<i32> {
        self.file.seek(SeekFrom::Start(4))?;
        let mut bytes = [0u8; 4];
        self.file.read_exact(&mut bytes)?;
        Ok(i32::from_le_bytes(bytes))
    }

    fn set_count(&mut self, count: i32) -> Result<()> {
        self.file.seek(SeekFrom::Start(4))?;
        self.file.write_all(&count.to_le_bytes())?;
        Ok(())
    }

    fn write_header(&mut self, head: i32, count: i32) -> Result<()> {
        self.set_head(head)?;
        self.set_count(count)
    }

    // =========================================================================
    // Slot Access
    // =========================================================================

    /// Read the node at `slot`
    ///
    /// Fails with `OutOfRange` when the slot is outside `[0, count)` —
    /// a stored link pointing there means corruption or a logic defect.
    pub fn get(&mut self, slot: i32) -> Result<Node> {
        let count = self.count()?;
        if slot < 0 || slot >= count {
            return Err(StoreError::OutOfRange { slot, count });
        }

        self.file.seek(SeekFrom::Start(Self::offset(slot)))?;
        let mut block = [0u8; NODE_SIZE];
        self.file.read_exact(&mut block)?;

        let mut node = record::decode(&block);
        node.slot = slot;
        Ok(node)
    }

    /// Read the node at `slot`, treating the [`NIL`] sentinel as `None`
    pub fn get_opt(&mut self, slot: i32) -> Result<Option<Node>> {
        if slot == NIL {
            return Ok(None);
        }
        self.get(slot).map(Some)
    }

    /// Overwrite the node's slot in place
    pub fn set(&mut self, node: &Node) -> Result<()> {
        self.file.seek(SeekFrom::Start(Self::offset(node.slot)))?;
        self.file.write_all(&record::encode(node))?;
        Ok(())
    }

    /// Append a node at the next free slot and assign it
    ///
    /// Always grows the store; vacated slots are never reused.
    pub fn append(&mut self, node: &mut Node) -> Result<i32> {
        let slot = self.count()?;

        self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(&record::encode(node))?;

        node.slot = slot;
        self.set_count(slot + 1)?;
        Ok(slot)
    }

    /// Raw slot-order scan of every slot in `0..count`
    ///
    /// Includes slots detached by deletion — the store never reclaims
    /// them, so this is the full physical contents, not the reachable
    /// tree. Ordered queries go through the engine's range search.
    pub fn scan_all(&mut self) -> Result<Vec<Record>> {
        let count = self.count()?;
        let mut records = Vec::with_capacity(count as usize);
        for slot in 0..count {
            records.push(self.get(slot)?.record);
        }
        Ok(records)
    }

    /// Byte offset of `slot` within the file
    fn offset(slot: i32) -> u64 {
        HEADER_SIZE as u64 + slot as u64 * NODE_SIZE as u64
    }
}
