//! Portable binary encoding of a Huffman tree.
//!
//! # Format
//!
//! Pre-order, one control bit per node, MSB-first, zero padded to a byte
//! boundary:
//!
//! ```text
//! node := 1 <symbol: 8 * width bits>     leaf
//!       | 0 <node: left> <node: right>   internal
//! ```
//!
//! The synthetic root of a single-symbol tree has no right child and cannot
//! be written with this grammar, so that tree is written as its lone leaf. A
//! built tree never has a leaf root, so a leaf at the top always means
//! "single-symbol tree" when parsed.
//!
//! The encoding is self-delimiting: [`parse_tree`] reports how many bytes it
//! consumed, and the container continues right after them.

use std::collections::HashSet;

use crate::bitio::{BitReader, BitWriter};
use crate::code_table::MAX_CODE_LEN;
use crate::error::{Error, FormatError, HuffmanError, Result};
use crate::symbol::{Symbol, SymbolWidth};
use crate::tree::{HuffmanTree, TreeNode};

/// Serialize `tree` with `width`-byte symbol values.
///
/// # Errors
/// - `HuffmanError::SymbolOutOfRange` if a leaf symbol doesn't fit `width`
/// - `HuffmanError::IncompleteTree` if a non-root internal node lacks a child
pub fn serialize_tree(tree: &HuffmanTree, width: SymbolWidth) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    match tree.single_symbol() {
        Some(symbol) => write_leaf(&mut writer, symbol, width)?,
        None => write_node(&mut writer, tree.root(), width)?,
    }
    let bytes = writer.finish();
    tracing::debug!(bytes = bytes.len(), leaves = tree.leaf_count(), "serialized tree");
    Ok(bytes)
}

/// Byte length [`serialize_tree`] produces for `tree`, without writing it.
///
/// A full tree with `n` leaves has `n - 1` internal nodes; the single-symbol
/// tree is written as its lone leaf.
pub fn serialized_len(tree: &HuffmanTree, width: SymbolWidth) -> usize {
    let leaves = tree.leaf_count();
    let bits = leaves * (1 + width.bits()) + leaves.saturating_sub(1);
    bits.div_ceil(8)
}

fn write_leaf(writer: &mut BitWriter, symbol: Symbol, width: SymbolWidth) -> Result<()> {
    if symbol > width.max_symbol() {
        return Err(HuffmanError::SymbolOutOfRange {
            symbol,
            width_bytes: width.bytes(),
        }
        .into());
    }
    writer.write_bit(true);
    writer.write_bits(symbol as u64, width.bits())
}

fn write_node(writer: &mut BitWriter, node: &TreeNode, width: SymbolWidth) -> Result<()> {
    match node {
        TreeNode::Leaf { symbol, .. } => write_leaf(writer, *symbol, width),
        TreeNode::Internal {
            left,
            right: Some(right),
            ..
        } => {
            writer.write_bit(false);
            write_node(writer, left, width)?;
            write_node(writer, right, width)
        }
        TreeNode::Internal { right: None, .. } => Err(HuffmanError::IncompleteTree.into()),
    }
}

/// Parse a tree from the start of `bytes`.
///
/// Returns the tree and the number of bytes it occupied, padding included.
///
/// # Errors
/// - `FormatError::Truncated` if `bytes` ends inside the tree
/// - `FormatError::TreeTooDeep` if the nesting exceeds the longest valid code
/// - `FormatError::DuplicateLeaf` if a symbol appears twice
pub fn parse_tree(bytes: &[u8], width: SymbolWidth) -> Result<(HuffmanTree, usize)> {
    let mut parser = Parser {
        reader: BitReader::new(bytes),
        width,
        seen: HashSet::new(),
        available: bytes.len(),
    };
    let root = match parser.node(0)? {
        leaf @ TreeNode::Leaf { .. } => TreeNode::Internal {
            weight: 0,
            left: Box::new(leaf),
            right: None,
        },
        internal => internal,
    };
    let consumed = parser.reader.bytes_consumed();
    tracing::debug!(bytes = consumed, leaves = parser.seen.len(), "parsed tree");
    Ok((HuffmanTree::from_root(root), consumed))
}

struct Parser<'a> {
    reader: BitReader<'a>,
    width: SymbolWidth,
    seen: HashSet<Symbol>,
    available: usize,
}

impl Parser<'_> {
    fn node(&mut self, depth: usize) -> Result<TreeNode> {
        if self.read_bits(1)? == 1 {
            let symbol = self.read_bits(self.width.bits())? as Symbol;
            if !self.seen.insert(symbol) {
                return Err(FormatError::DuplicateLeaf { symbol }.into());
            }
            return Ok(TreeNode::Leaf { symbol, weight: 0 });
        }

        if depth == MAX_CODE_LEN {
            return Err(FormatError::TreeTooDeep { max: MAX_CODE_LEN }.into());
        }
        let left = self.node(depth + 1)?;
        let right = self.node(depth + 1)?;
        Ok(TreeNode::Internal {
            weight: 0,
            left: Box::new(left),
            right: Some(Box::new(right)),
        })
    }

    fn read_bits(&mut self, count: usize) -> Result<u64> {
        self.reader.read_bits(count).map_err(|err| match err {
            Error::BitIo(_) => FormatError::Truncated {
                section: "tree",
                needed: self.available + 1,
                available: self.available,
            }
            .into(),
            other => other,
        })
    }
}
