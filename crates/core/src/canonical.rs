//! Canonical Huffman codes: a code described by its lengths alone.
//!
//! Given one code length per symbol (0 = absent), codewords are assigned in
//! order of (length, symbol): the first gets all zeros, each next codeword is
//! the previous one plus one, shifted left whenever the length grows. Only the
//! lengths need to be transmitted; the receiver rebuilds the identical tree.

use crate::error::{HuffmanError, Result};
use crate::tree::{CodeTree, Node, NodeId};

/// Per-symbol code lengths of a complete prefix code.
///
/// # Invariants
/// - at least two symbols in the alphabet
/// - the nonzero lengths satisfy Kraft's equality: sum of 2^-len is exactly 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    code_lengths: Vec<u32>,
}

impl CanonicalCode {
    /// Create a canonical code from explicit lengths.
    ///
    /// # Errors
    /// - `SymbolLimitTooSmall` if fewer than two lengths are given
    /// - `EmptyFrequencyTable` if every length is zero
    /// - `OversubscribedCode` / `IncompleteCode` if the lengths do not
    ///   describe a full binary tree
    pub fn new(code_lengths: Vec<u32>) -> Result<Self> {
        if code_lengths.len() < 2 {
            return Err(HuffmanError::SymbolLimitTooSmall(code_lengths.len()).into());
        }
        check_kraft(&code_lengths)?;
        Ok(Self { code_lengths })
    }

    /// Record the depth of every leaf in `tree`.
    ///
    /// Symbols without a leaf get length 0.
    pub fn from_code_tree(tree: &CodeTree, symbol_limit: u32) -> Result<Self> {
        if tree.symbol_limit() > symbol_limit {
            for symbol in symbol_limit..tree.symbol_limit() {
                if tree.code_length(symbol) > 0 {
                    return Err(HuffmanError::SymbolOutOfRange {
                        symbol,
                        limit: symbol_limit,
                    }
                    .into());
                }
            }
        }
        let code_lengths = (0..symbol_limit).map(|s| tree.code_length(s)).collect();
        Self::new(code_lengths)
    }

    pub fn symbol_limit(&self) -> u32 {
        self.code_lengths.len() as u32
    }

    pub fn code_length(&self, symbol: u32) -> Result<u32> {
        self.code_lengths
            .get(symbol as usize)
            .copied()
            .ok_or_else(|| {
                HuffmanError::SymbolOutOfRange {
                    symbol,
                    limit: self.symbol_limit(),
                }
                .into()
            })
    }

    pub fn code_lengths(&self) -> &[u32] {
        &self.code_lengths
    }

    pub fn max_code_length(&self) -> u32 {
        self.code_lengths.iter().copied().max().unwrap_or(0)
    }

    /// Build the tree holding the canonical codewords.
    ///
    /// Works from the deepest level up: each level lists its leaves in symbol
    /// order followed by the parents of the level below, paired left to right.
    /// This yields the same codewords as counting upward in (length, symbol)
    /// order, without needing integers as wide as the longest code.
    pub fn to_code_tree(&self) -> Result<CodeTree> {
        let max_len = self.max_code_length() as usize;
        let mut by_length: Vec<Vec<u32>> = vec![Vec::new(); max_len + 1];
        for (symbol, &len) in self.code_lengths.iter().enumerate() {
            if len > 0 {
                by_length[len as usize].push(symbol as u32);
            }
        }

        let mut nodes = Vec::with_capacity(self.code_lengths.len() * 2);
        let mut level: Vec<NodeId> = Vec::new();
        for len in (0..=max_len).rev() {
            let mut next = Vec::with_capacity(by_length[len].len() + level.len() / 2);
            if len > 0 {
                for &symbol in &by_length[len] {
                    next.push(NodeId(nodes.len() as u32));
                    nodes.push(Node::Leaf { symbol });
                }
            }
            for pair in level.chunks(2) {
                let &[left, right] = pair else {
                    return Err(HuffmanError::IncompleteCode.into());
                };
                next.push(NodeId(nodes.len() as u32));
                nodes.push(Node::Internal { left, right });
            }
            level = next;
        }

        match level.as_slice() {
            &[root] => CodeTree::from_nodes(nodes, root, self.symbol_limit()),
            _ => Err(HuffmanError::IncompleteCode.into()),
        }
    }
}

/// Check that the nonzero lengths fill a full binary tree exactly.
///
/// Walks down one level at a time tracking how many open slots remain. The
/// walk stops as soon as the slots outnumber the symbols left to place, so
/// the counter never grows past the alphabet size.
fn check_kraft(code_lengths: &[u32]) -> Result<()> {
    let mut lengths: Vec<u32> = code_lengths.iter().copied().filter(|&l| l > 0).collect();
    if lengths.is_empty() {
        return Err(HuffmanError::EmptyFrequencyTable.into());
    }
    lengths.sort_unstable();

    let mut remaining = lengths.len() as u64;
    let mut open: u64 = 1;
    let mut next = 0usize;
    let mut depth = 0u32;
    while remaining > 0 {
        depth += 1;
        open *= 2;
        let start = next;
        while next < lengths.len() && lengths[next] == depth {
            next += 1;
        }
        let placed = (next - start) as u64;
        if placed > open {
            return Err(HuffmanError::OversubscribedCode.into());
        }
        open -= placed;
        remaining -= placed;
        if open > remaining {
            return Err(HuffmanError::IncompleteCode.into());
        }
        if open == 0 && remaining > 0 {
            return Err(HuffmanError::OversubscribedCode.into());
        }
    }

    Ok(())
}
