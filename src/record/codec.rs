//! Record codec
//!
//! Pure fixed-width encode/decode of one node to/from a 64-byte block.
//! Every field is little-endian; text fields are truncated/right-padded
//! with spaces on encode and right-trimmed on decode. Offset arithmetic
//! in the slot store depends on the block size being constant, so no
//! variable-length or self-describing data is permitted here.

use bytes::{Buf, BufMut};

use super::{Node, Record, DATE_WIDTH, NAME_WIDTH, NIL, NODE_SIZE};

/// Encode a node into its fixed 64-byte block
pub fn encode(node: &Node) -> [u8; NODE_SIZE] {
    let mut block = [0u8; NODE_SIZE];
    {
        let mut buf = &mut block[..];
        buf.put_i32_le(node.record.id);
        put_text(&mut buf, &node.record.name, NAME_WIDTH);
        buf.put_i32_le(node.record.quantity);
        buf.put_f32_le(node.record.price);
        put_text(&mut buf, &node.record.date, DATE_WIDTH);
        buf.put_i32_le(node.balance);
        buf.put_i32_le(node.left);
        buf.put_i32_le(node.right);
    }
    block
}

/// Decode a node from one fixed-size block
///
/// The caller supplies exactly [`NODE_SIZE`] bytes; the decoded node is
/// detached (`slot` is [`NIL`]) until the slot store tags it.
pub fn decode(block: &[u8; NODE_SIZE]) -> Node {
    let mut buf = &block[..];
    let id = buf.get_i32_le();
    let name = take_text(&mut buf, NAME_WIDTH);
    let quantity = buf.get_i32_le();
    let price = buf.get_f32_le();
    let date = take_text(&mut buf, DATE_WIDTH);
    let balance = buf.get_i32_le();
    let left = buf.get_i32_le();
    let right = buf.get_i32_le();

    Node {
        record: Record {
            id,
            name,
            quantity,
            price,
            date,
        },
        balance,
        left,
        right,
        slot: NIL,
    }
}

/// Write `text` truncated to `width` bytes, right-padded with spaces
fn put_text(buf: &mut impl BufMut, text: &str, width: usize) {
    let raw = text.as_bytes();
    let take = raw.len().min(width);
    buf.put_slice(&raw[..take]);
    for _ in take..width {
        buf.put_u8(b' ');
    }
}

/// Read a `width`-byte text field, dropping trailing padding
fn take_text(buf: &mut impl Buf, width: usize) -> String {
    let mut raw = vec![0u8; width];
    buf.copy_to_slice(&mut raw);
    let text = String::from_utf8_lossy(&raw);
    text.trim_end_matches(' ').to_string()
}
