//! Symbol-level Huffman encoder and decoder.
//!
//! Both sides hold the tree they are currently using behind an `Rc`. The
//! adaptive codec swaps in a freshly built tree between symbols with
//! `set_tree`; the old tree is dropped once nothing refers to it.

use std::io::{Read, Write};
use std::rc::Rc;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{HuffmanError, Result};
use crate::tree::{CodeTree, Node};

/// Turns symbols into codewords on a bit stream.
#[derive(Debug)]
pub struct HuffmanEncoder<W: Write> {
    writer: BitWriter<W>,
    tree: Rc<CodeTree>,
}

impl<W: Write> HuffmanEncoder<W> {
    pub fn new(writer: BitWriter<W>, tree: Rc<CodeTree>) -> Self {
        Self { writer, tree }
    }

    pub fn tree(&self) -> &Rc<CodeTree> {
        &self.tree
    }

    pub fn set_tree(&mut self, tree: Rc<CodeTree>) {
        self.tree = tree;
    }

    /// Emit the codeword for `symbol`.
    ///
    /// # Errors
    /// `SymbolNotInCode` if the current tree has no leaf for `symbol`.
    pub fn encode(&mut self, symbol: u32) -> Result<()> {
        for &bit in self.tree.code(symbol)? {
            self.writer.write_bit(bit)?;
        }
        Ok(())
    }

    pub fn bit_len(&self) -> u64 {
        self.writer.bit_len()
    }

    /// Pad and flush the final byte, returning the sink.
    pub fn finish(self) -> Result<W> {
        self.writer.finish()
    }
}

/// Turns a bit stream back into symbols.
#[derive(Debug)]
pub struct HuffmanDecoder<R: Read> {
    reader: BitReader<R>,
    tree: Rc<CodeTree>,
}

impl<R: Read> HuffmanDecoder<R> {
    pub fn new(reader: BitReader<R>, tree: Rc<CodeTree>) -> Self {
        Self { reader, tree }
    }

    pub fn tree(&self) -> &Rc<CodeTree> {
        &self.tree
    }

    pub fn set_tree(&mut self, tree: Rc<CodeTree>) {
        self.tree = tree;
    }

    /// Walk from the root one bit at a time until a leaf is reached.
    ///
    /// # Errors
    /// `TruncatedStream` if the input ends before a leaf is reached.
    pub fn decode(&mut self) -> Result<u32> {
        let mut id = self.tree.root();
        loop {
            match self.tree.node(id) {
                Node::Leaf { symbol } => return Ok(symbol),
                Node::Internal { left, right } => {
                    let bit = self.reader.read_bit()?.ok_or(HuffmanError::TruncatedStream {
                        bits_read: self.reader.position(),
                    })?;
                    id = if bit { right } else { left };
                }
            }
        }
    }

    /// Bits consumed so far.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
