//! Symbol frequency accounting and deterministic Huffman tree construction.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{HuffmanError, Result};
use crate::tree::{CodeTree, Node, NodeId};

/// Occurrence count per symbol, one slot for every symbol in the alphabet.
///
/// Zero-count symbols get no codeword when a tree is built from the table,
/// so they must never be coded with that tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    frequencies: Vec<u32>,
}

/// Forest entry ordered by (frequency, lowest symbol, node).
///
/// Two entries never share a lowest symbol, so the order is total on the
/// frequency vector alone; `node` only makes the derive complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    frequency: u64,
    lowest_symbol: u32,
    node: NodeId,
}

impl FrequencyTable {
    /// Create a table from explicit counts.
    ///
    /// # Errors
    /// `SymbolLimitTooSmall` if fewer than two symbols are given.
    pub fn new(frequencies: Vec<u32>) -> Result<Self> {
        if frequencies.len() < 2 {
            return Err(HuffmanError::SymbolLimitTooSmall(frequencies.len()).into());
        }
        Ok(Self { frequencies })
    }

    /// Every symbol starts at `value`.
    pub fn flat(symbol_limit: u32, value: u32) -> Result<Self> {
        Self::new(vec![value; symbol_limit as usize])
    }

    pub fn zeros(symbol_limit: u32) -> Result<Self> {
        Self::flat(symbol_limit, 0)
    }

    pub fn symbol_limit(&self) -> u32 {
        self.frequencies.len() as u32
    }

    pub fn get(&self, symbol: u32) -> Result<u32> {
        let index = self.check_symbol(symbol)?;
        Ok(self.frequencies[index])
    }

    pub fn set(&mut self, symbol: u32, frequency: u32) -> Result<()> {
        let index = self.check_symbol(symbol)?;
        self.frequencies[index] = frequency;
        Ok(())
    }

    /// Add one to the count of `symbol`.
    ///
    /// # Errors
    /// - `SymbolOutOfRange` for an index outside the alphabet
    /// - `FrequencyOverflow` if the count is already `u32::MAX`
    pub fn increment(&mut self, symbol: u32) -> Result<()> {
        let index = self.check_symbol(symbol)?;
        let slot = &mut self.frequencies[index];
        *slot = slot
            .checked_add(1)
            .ok_or(HuffmanError::FrequencyOverflow { symbol })?;
        Ok(())
    }

    /// Count every byte of `bytes` as one occurrence of its symbol.
    pub fn increment_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.increment(byte as u32)?;
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.frequencies
    }

    /// Build a Huffman code tree from the current counts.
    ///
    /// The two lowest entries of the forest are merged repeatedly, the first
    /// one popped becoming the left child. Equal frequencies are ordered by the
    /// smallest symbol each subtree contains, so identical tables always give
    /// identical trees. If only one symbol is present, the lowest-indexed
    /// absent symbol is added as a zero-frequency leaf so the root stays an
    /// internal node.
    ///
    /// # Errors
    /// `EmptyFrequencyTable` if every count is zero.
    pub fn build_code_tree(&self) -> Result<CodeTree> {
        let mut nodes = Vec::with_capacity(self.frequencies.len() * 2);
        let mut forest = BinaryHeap::with_capacity(self.frequencies.len());

        for (symbol, &frequency) in self.frequencies.iter().enumerate() {
            if frequency > 0 {
                push_leaf(&mut nodes, &mut forest, symbol as u32, frequency);
            }
        }

        match forest.len() {
            0 => return Err(HuffmanError::EmptyFrequencyTable.into()),
            1 => {
                // new() guarantees at least two slots, so an absent one exists
                if let Some(pad) = self.frequencies.iter().position(|&f| f == 0) {
                    push_leaf(&mut nodes, &mut forest, pad as u32, 0);
                }
            }
            _ => {}
        }

        while forest.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (forest.pop(), forest.pop()) else {
                break;
            };
            let node = NodeId(nodes.len() as u32);
            nodes.push(Node::Internal {
                left: left.node,
                right: right.node,
            });
            forest.push(Reverse(Pending {
                frequency: left.frequency + right.frequency,
                lowest_symbol: left.lowest_symbol.min(right.lowest_symbol),
                node,
            }));
        }

        let root = forest
            .pop()
            .map(|Reverse(p)| p.node)
            .ok_or(HuffmanError::EmptyFrequencyTable)?;
        CodeTree::from_nodes(nodes, root, self.symbol_limit())
    }

    fn check_symbol(&self, symbol: u32) -> Result<usize> {
        if (symbol as usize) < self.frequencies.len() {
            Ok(symbol as usize)
        } else {
            Err(HuffmanError::SymbolOutOfRange {
                symbol,
                limit: self.symbol_limit(),
            }
            .into())
        }
    }
}

fn push_leaf(
    nodes: &mut Vec<Node>,
    forest: &mut BinaryHeap<Reverse<Pending>>,
    symbol: u32,
    frequency: u32,
) {
    let node = NodeId(nodes.len() as u32);
    nodes.push(Node::Leaf { symbol });
    forest.push(Reverse(Pending {
        frequency: frequency as u64,
        lowest_symbol: symbol,
        node,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn code_string(tree: &CodeTree, symbol: u32) -> String {
        tree.code(symbol)
            .unwrap()
            .iter()
            .map(|&b| if b { '1' } else { '0' })
            .collect()
    }

    #[test]
    fn test_increment_and_get() {
        let mut freqs = FrequencyTable::zeros(257).unwrap();
        freqs.increment(65).unwrap();
        freqs.increment(65).unwrap();
        freqs.increment(256).unwrap();

        assert_eq!(freqs.get(65).unwrap(), 2);
        assert_eq!(freqs.get(256).unwrap(), 1);
        assert_eq!(freqs.get(0).unwrap(), 0);
        assert_eq!(freqs.symbol_limit(), 257);
    }

    #[test]
    fn test_increment_out_of_range() {
        let mut freqs = FrequencyTable::zeros(257).unwrap();
        assert!(matches!(
            freqs.increment(257),
            Err(Error::Huffman(HuffmanError::SymbolOutOfRange { symbol: 257, limit: 257 }))
        ));
    }

    #[test]
    fn test_increment_overflow() {
        let mut freqs = FrequencyTable::new(vec![u32::MAX, 1]).unwrap();
        assert!(matches!(
            freqs.increment(0),
            Err(Error::Huffman(HuffmanError::FrequencyOverflow { symbol: 0 }))
        ));
        assert_eq!(freqs.get(0).unwrap(), u32::MAX);
    }

    #[test]
    fn test_too_small_alphabet() {
        assert!(FrequencyTable::new(vec![1]).is_err());
        assert!(FrequencyTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_empty_table_fails() {
        let freqs = FrequencyTable::zeros(257).unwrap();
        assert!(matches!(
            freqs.build_code_tree(),
            Err(Error::Huffman(HuffmanError::EmptyFrequencyTable))
        ));
    }

    #[test]
    fn test_single_symbol_is_padded() {
        let mut freqs = FrequencyTable::zeros(257).unwrap();
        freqs.set(256, 1).unwrap();

        let tree = freqs.build_code_tree().unwrap();
        // Symbol 0 is the padding leaf; it sorts first at frequency 0.
        assert_eq!(code_string(&tree, 0), "0");
        assert_eq!(code_string(&tree, 256), "1");
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_single_symbol_padding_skips_present_symbol() {
        let mut freqs = FrequencyTable::zeros(4).unwrap();
        freqs.set(0, 9).unwrap();

        let tree = freqs.build_code_tree().unwrap();
        assert_eq!(code_string(&tree, 1), "0");
        assert_eq!(code_string(&tree, 0), "1");
    }

    #[test]
    fn test_equal_frequencies_break_ties_by_symbol() {
        // All four tied: (0,1) merge first, then (2,3), then the two pairs.
        let freqs = FrequencyTable::new(vec![5, 5, 5, 5]).unwrap();
        let tree = freqs.build_code_tree().unwrap();

        assert_eq!(code_string(&tree, 0), "00");
        assert_eq!(code_string(&tree, 1), "01");
        assert_eq!(code_string(&tree, 2), "10");
        assert_eq!(code_string(&tree, 3), "11");
    }

    #[test]
    fn test_two_way_tie_lower_symbol_goes_left() {
        let mut freqs = FrequencyTable::zeros(10).unwrap();
        freqs.set(8, 5).unwrap();
        freqs.set(3, 5).unwrap();

        let tree = freqs.build_code_tree().unwrap();
        assert_eq!(code_string(&tree, 3), "0");
        assert_eq!(code_string(&tree, 8), "1");
    }

    #[test]
    fn test_merged_subtree_ties_with_leaf() {
        // {0,1} merges to 10 with lowest symbol 0, tying with leaf 2 (10).
        // The subtree wins the tie and becomes the left child.
        let freqs = FrequencyTable::new(vec![5, 5, 10]).unwrap();
        let tree = freqs.build_code_tree().unwrap();

        assert_eq!(code_string(&tree, 0), "00");
        assert_eq!(code_string(&tree, 1), "01");
        assert_eq!(code_string(&tree, 2), "1");
    }

    #[test]
    fn test_skewed_frequencies() {
        let freqs = FrequencyTable::new(vec![1, 2, 4, 8, 16]).unwrap();
        let tree = freqs.build_code_tree().unwrap();

        assert_eq!(tree.code_length(4), 1);
        assert_eq!(tree.code_length(3), 2);
        assert_eq!(tree.code_length(2), 3);
        assert_eq!(tree.code_length(1), 4);
        assert_eq!(tree.code_length(0), 4);
    }

    #[test]
    fn test_identical_tables_build_identical_trees() {
        let counts: Vec<u32> = (0..257u32).map(|s| (s * 7919) % 13).collect();
        let a = FrequencyTable::new(counts.clone()).unwrap();
        let b = FrequencyTable::new(counts).unwrap();

        let tree_a = a.build_code_tree().unwrap();
        let tree_b = b.build_code_tree().unwrap();
        assert_eq!(tree_a, tree_b);
        for symbol in 0..257 {
            assert_eq!(tree_a.code(symbol).ok(), tree_b.code(symbol).ok());
        }
    }

    #[test]
    fn test_zero_frequency_symbols_have_no_code() {
        let freqs = FrequencyTable::new(vec![3, 0, 4, 0]).unwrap();
        let tree = freqs.build_code_tree().unwrap();

        assert!(tree.code(1).is_err());
        assert!(tree.code(3).is_err());
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_flat_prior_gives_near_uniform_lengths() {
        let freqs = FrequencyTable::flat(257, 1).unwrap();
        let tree = freqs.build_code_tree().unwrap();

        for symbol in 0..257 {
            let len = tree.code_length(symbol);
            assert!((8..=9).contains(&len), "symbol {symbol} has length {len}");
        }
    }
}
