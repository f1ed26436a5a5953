//! Code assignment from tree leaf paths.
//!
//! A code is the path from the root to a symbol's leaf, `0` for a left step
//! and `1` for a right step. Codes taken from distinct leaves of one tree are
//! prefix-free, so nothing here checks for that.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, TreeNode};

/// Longest code the bit writer can emit in one call.
pub const MAX_CODE_LEN: usize = 64;

/// A non-empty bit string of at most 64 bits, stored right-aligned in `bits`
/// and emitted most significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

#[allow(clippy::len_without_is_empty)]
impl Code {
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Bit `i` counted from the first emitted bit.
    pub fn bit(&self, i: usize) -> bool {
        (self.bits >> (self.len() - 1 - i)) & 1 == 1
    }

    /// Whether this code is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping, one entry per leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk the tree and record every leaf path.
    ///
    /// # Errors
    /// `HuffmanError::CodeLengthTooLong` if a leaf sits deeper than
    /// [`MAX_CODE_LEN`].
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = BTreeMap::new();
        walk(tree.root(), 0, 0, &mut codes)?;
        Ok(Self { codes })
    }

    pub fn get(&self, symbol: Symbol) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Code)> + '_ {
        self.codes.iter().map(|(&s, &c)| (s, c))
    }

    /// Encoded length in bits of `symbols`, without padding.
    pub fn encoded_bit_len(&self, symbols: &[Symbol]) -> Result<u64> {
        symbols.iter().try_fold(0u64, |acc, &symbol| {
            let code = self
                .get(symbol)
                .ok_or(HuffmanError::SymbolNotInTable { symbol })?;
            Ok(acc + code.len() as u64)
        })
    }
}

fn walk(
    node: &TreeNode,
    bits: u64,
    depth: usize,
    codes: &mut BTreeMap<Symbol, Code>,
) -> Result<()> {
    match node {
        TreeNode::Leaf { symbol, .. } => {
            // A leaf at the root has no path; it still needs one bit per occurrence
            let code = if depth == 0 {
                Code { bits: 0, len: 1 }
            } else {
                Code {
                    bits,
                    len: depth as u8,
                }
            };
            codes.insert(*symbol, code);
            Ok(())
        }
        TreeNode::Internal { left, right, .. } => {
            if depth == MAX_CODE_LEN {
                return Err(HuffmanError::CodeLengthTooLong { length: depth + 1 }.into());
            }
            walk(left, bits << 1, depth + 1, codes)?;
            if let Some(right) = right {
                walk(right, (bits << 1) | 1, depth + 1, codes)?;
            }
            Ok(())
        }
    }
}
