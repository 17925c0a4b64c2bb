//! Immutable prefix-code trees.
//!
//! A `CodeTree` is a full binary tree stored in an index arena. Leaves carry
//! symbols; the root-to-leaf path spells the symbol's codeword, with the left
//! child meaning 0 and the right child meaning 1.
//!
//! Trees are built once (from a `FrequencyTable` or a `CanonicalCode`) and
//! never mutated afterwards. Coders that need a different code swap the whole
//! tree.

use crate::error::{HuffmanError, Result};

/// Index of a node inside a tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u32 },
    Internal { left: NodeId, right: NodeId },
}

/// A full binary tree assigning one codeword to each present symbol.
///
/// # Invariants
/// - the root is an internal node, so every codeword has at least one bit
/// - each symbol below `symbol_limit` appears on at most one leaf
/// - `codes[s]` is `Some` exactly when symbol `s` has a leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
    symbol_limit: u32,
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTree {
    /// Assemble a tree from an arena and validate it.
    ///
    /// Nodes unreachable from `root` are allowed but ignored.
    ///
    /// # Errors
    /// - `DegenerateTree` if the root is a leaf
    /// - `SymbolOutOfRange` if a leaf symbol is >= `symbol_limit`
    /// - `DuplicateSymbol` if a symbol appears on two leaves
    pub fn from_nodes(nodes: Vec<Node>, root: NodeId, symbol_limit: u32) -> Result<Self> {
        if symbol_limit < 2 {
            return Err(HuffmanError::SymbolLimitTooSmall(symbol_limit as usize).into());
        }
        match nodes.get(root.index()) {
            Some(Node::Internal { .. }) => {}
            _ => return Err(HuffmanError::DegenerateTree.into()),
        }

        let mut codes: Vec<Option<Vec<bool>>> = vec![None; symbol_limit as usize];

        // Iterative depth-first walk; `path` is the codeword for `id`.
        let mut stack = vec![(root, Vec::new())];
        while let Some((id, path)) = stack.pop() {
            let node = nodes
                .get(id.index())
                .copied()
                .ok_or(HuffmanError::DegenerateTree)?;
            match node {
                Node::Leaf { symbol } => {
                    let slot = codes.get_mut(symbol as usize).ok_or(
                        HuffmanError::SymbolOutOfRange {
                            symbol,
                            limit: symbol_limit,
                        },
                    )?;
                    if slot.is_some() {
                        return Err(HuffmanError::DuplicateSymbol { symbol }.into());
                    }
                    *slot = Some(path);
                }
                Node::Internal { left, right } => {
                    // A well-formed arena has fewer edges than nodes; anything
                    // longer has a cycle.
                    if path.len() >= nodes.len() {
                        return Err(HuffmanError::DegenerateTree.into());
                    }
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((right, right_path));
                    stack.push((left, left_path));
                }
            }
        }

        Ok(Self {
            nodes,
            root,
            symbol_limit,
            codes,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Ids handed out by this tree are always valid.
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }

    pub fn symbol_limit(&self) -> u32 {
        self.symbol_limit
    }

    /// Codeword of `symbol`, left (0) = `false`, right (1) = `true`.
    ///
    /// # Errors
    /// - `SymbolOutOfRange` if `symbol >= symbol_limit`
    /// - `SymbolNotInCode` if the symbol has no leaf
    pub fn code(&self, symbol: u32) -> Result<&[bool]> {
        match self.codes.get(symbol as usize) {
            None => Err(HuffmanError::SymbolOutOfRange {
                symbol,
                limit: self.symbol_limit,
            }
            .into()),
            Some(None) => Err(HuffmanError::SymbolNotInCode { symbol }.into()),
            Some(Some(code)) => Ok(code),
        }
    }

    /// Depth of the symbol's leaf, or 0 if it has none.
    pub fn code_length(&self, symbol: u32) -> u32 {
        self.codes
            .get(symbol as usize)
            .and_then(|c| c.as_ref())
            .map_or(0, |c| c.len() as u32)
    }

    pub fn max_code_length(&self) -> u32 {
        self.codes
            .iter()
            .flatten()
            .map(|c| c.len() as u32)
            .max()
            .unwrap_or(0)
    }

    /// Number of symbols that have a codeword.
    pub fn leaf_count(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }
}
