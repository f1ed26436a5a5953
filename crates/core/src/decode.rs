//! Tree-walk decoding of a packed stream.

use crate::error::{FormatError, Result};
use crate::packing::PackedStream;
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, TreeNode};

/// A non-fatal condition met while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeWarning {
    /// The stream ended inside a code. Everything before it was decoded.
    MidSymbolTruncation { dangling_bits: usize },
}

/// Symbols recovered from a stream, plus any warning raised on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedStream {
    pub symbols: Vec<Symbol>,
    pub warning: Option<DecodeWarning>,
}

/// Decode every logical bit of `stream` against `tree`.
///
/// - No tree: only an empty stream is valid.
/// - Single-symbol tree: one copy of the symbol per bit, whatever the bit.
/// - Otherwise: walk from the root, `0` left and `1` right, emitting on every
///   leaf. Ending inside a code yields a warning, not an error.
///
/// `capacity_hint` bounds the initial allocation; it is clamped to the bit
/// count since every symbol costs at least one bit.
///
/// # Errors
/// - `FormatError::MissingTree` if bits are present but there is no tree
/// - `FormatError::MissingChild` if a bit leads to an absent child
pub fn decode_stream(
    stream: &PackedStream,
    tree: Option<&HuffmanTree>,
    capacity_hint: usize,
) -> Result<DecodedStream> {
    let bit_len = stream.logical_bit_len();
    let Some(tree) = tree else {
        if bit_len == 0 {
            return Ok(DecodedStream {
                symbols: Vec::new(),
                warning: None,
            });
        }
        return Err(FormatError::MissingTree { bits: bit_len }.into());
    };

    if let Some(symbol) = tree.single_symbol() {
        return Ok(DecodedStream {
            symbols: vec![symbol; bit_len],
            warning: None,
        });
    }

    let root = tree.root();
    let mut symbols = Vec::with_capacity(capacity_hint.min(bit_len));
    let mut node = root;
    let mut dangling = 0usize;

    for (position, bit) in stream.bits().enumerate() {
        // `node` is always internal: the walk resets to the root on every leaf
        let next = match node {
            TreeNode::Internal { right, .. } if bit => right.as_deref(),
            TreeNode::Internal { left, .. } => Some(left.as_ref()),
            TreeNode::Leaf { .. } => None,
        };
        let next = next.ok_or(FormatError::MissingChild { position })?;

        match next {
            TreeNode::Leaf { symbol, .. } => {
                symbols.push(*symbol);
                node = root;
                dangling = 0;
            }
            internal => {
                node = internal;
                dangling += 1;
            }
        }
    }

    let warning = (dangling > 0).then(|| {
        tracing::warn!(
            dangling_bits = dangling,
            decoded = symbols.len(),
            "stream ended in the middle of a symbol"
        );
        DecodeWarning::MidSymbolTruncation {
            dangling_bits: dangling,
        }
    });

    Ok(DecodedStream { symbols, warning })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_table::CodeTable;
    use crate::error::Error;
    use crate::frequency::FrequencyTable;
    use crate::packing::pack;

    fn tree_for(symbols: &[Symbol]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::from_symbols(symbols)).unwrap()
    }

    #[test]
    fn test_round_trip_general_tree() {
        let data = [4, 8, 15, 16, 23, 42, 4, 4, 8, 42];
        let tree = tree_for(&data);
        let stream = pack(&data, &CodeTable::from_tree(&tree).unwrap()).unwrap();

        let decoded = decode_stream(&stream, Some(&tree), data.len()).unwrap();
        assert_eq!(decoded.symbols, data);
        assert_eq!(decoded.warning, None);
    }

    #[test]
    fn test_single_symbol_one_per_bit() {
        let tree = tree_for(&[7]);
        // Bit values don't matter for a one-leaf tree
        let stream = PackedStream::from_bytes(vec![2, 0b1010_1100]).unwrap();
        let decoded = decode_stream(&stream, Some(&tree), 0).unwrap();
        assert_eq!(decoded.symbols, vec![7; 6]);
    }

    #[test]
    fn test_no_tree() {
        let empty = PackedStream::from_bytes(vec![0]).unwrap();
        assert!(decode_stream(&empty, None, 0).unwrap().symbols.is_empty());

        let bits = PackedStream::from_bytes(vec![0, 0xFF]).unwrap();
        assert!(matches!(
            decode_stream(&bits, None, 0),
            Err(Error::Format(FormatError::MissingTree { bits: 8 }))
        ));
    }

    #[test]
    fn test_mid_symbol_end_is_a_warning() {
        // codes: 1 -> "00", 2 -> "01", 0 -> "1"
        let tree = tree_for(&[0, 0, 0, 0, 1, 2]);
        // "1" "01" then a dangling "0"
        let stream = PackedStream::from_bytes(vec![4, 0b1010_0000]).unwrap();

        let decoded = decode_stream(&stream, Some(&tree), 16).unwrap();
        assert_eq!(decoded.symbols, vec![0, 2]);
        assert_eq!(
            decoded.warning,
            Some(DecodeWarning::MidSymbolTruncation { dangling_bits: 1 })
        );
    }

    #[test]
    fn test_absent_child_is_an_error() {
        // Hand-built tree whose right branch under the root is an internal
        // node missing its own right child
        let tree = HuffmanTree::from_root(TreeNode::Internal {
            weight: 0,
            left: Box::new(TreeNode::Leaf {
                symbol: 1,
                weight: 0,
            }),
            right: Some(Box::new(TreeNode::Internal {
                weight: 0,
                left: Box::new(TreeNode::Leaf {
                    symbol: 2,
                    weight: 0,
                }),
                right: None,
            })),
        });
        // "0" -> 1, "10" -> 2, "11" -> missing
        let stream = PackedStream::from_bytes(vec![3, 0b0101_1000]).unwrap();
        assert!(matches!(
            decode_stream(&stream, Some(&tree), 0),
            Err(Error::Format(FormatError::MissingChild { position: 4 }))
        ));
    }
}
