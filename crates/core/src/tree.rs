//! Huffman tree construction.
//!
//! # Tie-break
//!
//! The priority queue is keyed by `(weight, sequence)`. Leaves get sequence
//! numbers in ascending symbol order, merged nodes get the next free number
//! as they are created. Equal weights therefore resolve to "smaller symbol
//! first, older node first", which makes the produced codes (and so the
//! container bytes) reproducible.
//!
//! The first node popped in a merge becomes the left (`0`) child.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// A node of the prefix tree.
///
/// `weight` is the frequency sum of the subtree. It drives construction only;
/// trees parsed back from a container carry weight 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    /// `right` is `None` only for the synthetic root of a single-symbol tree.
    Internal {
        weight: u64,
        left: Box<TreeNode>,
        right: Option<Box<TreeNode>>,
    },
}

impl TreeNode {
    pub fn weight(&self) -> u64 {
        match self {
            TreeNode::Leaf { weight, .. } | TreeNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    fn merge(left: TreeNode, right: TreeNode) -> TreeNode {
        TreeNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }
}

/// Queue entry ordered for a min-heap on `(weight, seq)`.
struct Pending {
    weight: u64,
    seq: usize,
    node: TreeNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, lowest (weight, seq) must pop first
        (other.weight, other.seq).cmp(&(self.weight, self.seq))
    }
}

/// A Huffman prefix tree. The root is always an internal node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: TreeNode,
}

impl HuffmanTree {
    /// Build the tree for a non-empty frequency table.
    ///
    /// # Errors
    /// `HuffmanError::EmptyFrequencyTable` if the table has no symbols.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        let mut queue: BinaryHeap<Pending> = freqs
            .iter()
            .enumerate()
            .map(|(seq, (symbol, weight))| Pending {
                weight,
                seq,
                node: TreeNode::Leaf { symbol, weight },
            })
            .collect();
        let mut next_seq = queue.len();
        let mut last = None;

        while let Some(first) = queue.pop() {
            let Some(second) = queue.pop() else {
                last = Some(first.node);
                break;
            };
            let node = TreeNode::merge(first.node, second.node);
            queue.push(Pending {
                weight: node.weight(),
                seq: next_seq,
                node,
            });
            next_seq += 1;
        }

        let root = match last.ok_or(HuffmanError::EmptyFrequencyTable)? {
            leaf @ TreeNode::Leaf { .. } => TreeNode::Internal {
                weight: leaf.weight(),
                left: Box::new(leaf),
                right: None,
            },
            internal => internal,
        };

        tracing::debug!(
            distinct_symbols = freqs.len(),
            total = freqs.total(),
            "built huffman tree"
        );
        Ok(Self { root })
    }

    /// Wrap an already validated root. The root must be internal.
    pub(crate) fn from_root(root: TreeNode) -> Self {
        debug_assert!(!root.is_leaf());
        Self { root }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// The lone symbol if the root has one leaf child and no sibling.
    pub fn single_symbol(&self) -> Option<Symbol> {
        match &self.root {
            TreeNode::Internal {
                left, right: None, ..
            } => match left.as_ref() {
                TreeNode::Leaf { symbol, .. } => Some(*symbol),
                TreeNode::Internal { .. } => None,
            },
            _ => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Internal { left, right, .. } => {
                    count(left) + right.as_deref().map_or(0, count)
                }
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Internal { left, right, .. } => {
                    1 + depth(left).max(right.as_deref().map_or(0, depth))
                }
            }
        }
        depth(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_symbol(node: &TreeNode) -> Symbol {
        match node {
            TreeNode::Leaf { symbol, .. } => *symbol,
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    fn children(node: &TreeNode) -> (&TreeNode, Option<&TreeNode>) {
        match node {
            TreeNode::Internal { left, right, .. } => (left, right.as_deref()),
            other => panic!("expected internal node, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = HuffmanTree::build(&FrequencyTable::default());
        assert!(matches!(
            result,
            Err(crate::error::Error::Huffman(HuffmanError::EmptyFrequencyTable))
        ));
    }

    #[test]
    fn test_single_symbol_gets_synthetic_root() {
        let tree = HuffmanTree::build(&FrequencyTable::from_symbols(&[7, 7, 7])).unwrap();
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.single_symbol(), Some(7));
        assert_eq!(tree.root().weight(), 3);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_lowest_weights_merge_first() {
        // 0 occurs ten times, 1 and 2 once each: {1, 2} merge, then join 0
        let freqs = FrequencyTable::from_symbols(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2]);
        let tree = HuffmanTree::build(&freqs).unwrap();
        assert_eq!(tree.root().weight(), 12);
        assert_eq!(tree.single_symbol(), None);

        let (left, right) = children(tree.root());
        assert_eq!(left.weight(), 2);
        assert_eq!(leaf_symbol(right.unwrap()), 0);

        let (ll, lr) = children(left);
        assert_eq!(leaf_symbol(ll), 1);
        assert_eq!(leaf_symbol(lr.unwrap()), 2);
    }

    #[test]
    fn test_equal_weights_follow_symbol_order() {
        let freqs = FrequencyTable::from_symbols(&[40, 30, 20, 10]);
        let tree = HuffmanTree::build(&freqs).unwrap();

        // Leaves 10, 20 merge first (seq 4), then 30, 40 (seq 5)
        let (left, right) = children(tree.root());
        let (a, b) = children(left);
        let (c, d) = children(right.unwrap());
        assert_eq!(
            [a, b.unwrap(), c, d.unwrap()].map(leaf_symbol),
            [10, 20, 30, 40]
        );
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_build_is_deterministic() {
        let data: Vec<Symbol> = (0..500u16).map(|i| (i * 7919) % 13).collect();
        let freqs = FrequencyTable::from_symbols(&data);
        assert_eq!(
            HuffmanTree::build(&freqs).unwrap(),
            HuffmanTree::build(&freqs).unwrap()
        );
    }
}
