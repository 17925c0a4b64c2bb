//! huffpack-core: static and adaptive Huffman coding over byte streams
//!
//! Two compressed formats share one coding engine:
//! - **static**: one pass gathers byte frequencies, a 257-byte table of
//!   canonical code lengths is written, then a second pass encodes
//! - **adaptive**: no table; encoder and decoder start from the same flat
//!   frequencies and rebuild their trees at the same symbol counts
//!
//! Both formats end the coded data with an explicit end-of-data symbol (256),
//! so decoders never need the original length.
//!
//! # Architecture
//!
//! - `frequency`: symbol counts and deterministic tree construction
//! - `tree`: immutable code trees stored in an index arena
//! - `canonical`: length-only codes for the static header
//! - `bitio`: MSB-first bit reading/writing over `Read`/`Write`
//! - `coder`: symbol encoder/decoder over a swappable tree
//! - `static_huffman` / `adaptive`: the two format drivers
//! - `stats`: per-run statistics
//! - `verify`: CRC-32 round-trip check of a compressed stream
//!
//! # Example
//! ```
//! use huffpack_core::{compress, decompress, Variant};
//! use std::io::Cursor;
//!
//! let input = b"abracadabra".to_vec();
//! let mut packed = Vec::new();
//! compress(Variant::Adaptive, Cursor::new(&input), &mut packed).unwrap();
//!
//! let mut unpacked = Vec::new();
//! decompress(Variant::Adaptive, &packed[..], &mut unpacked).unwrap();
//! assert_eq!(unpacked, input);
//! ```

use std::fmt;
use std::io::{Read, Seek, Write};

pub mod adaptive;
pub mod bitio;
pub mod canonical;
pub mod coder;
pub mod error;
pub mod frequency;
pub mod static_huffman;
pub mod stats;
pub mod tree;
pub mod verify;

pub use adaptive::{AdaptiveConfig, AdaptiveModel};
pub use canonical::CanonicalCode;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use stats::CodecStats;
pub use tree::CodeTree;

/// Alphabet size: 256 byte values plus the end-of-data marker.
pub const SYMBOL_LIMIT: u32 = 257;

/// Symbol that terminates every coded stream.
pub const END_OF_DATA: u32 = 256;

/// Symbol count after which the adaptive frequency table starts over.
pub const RESET_PERIOD: u32 = 262_144;

/// Which compressed format to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Static,
    Adaptive,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Static => f.write_str("static"),
            Variant::Adaptive => f.write_str("adaptive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Compress => f.write_str("compress"),
            Direction::Decompress => f.write_str("decompress"),
        }
    }
}

/// Compress `input` into `output` with default settings.
pub fn compress<R: Read + Seek, W: Write>(variant: Variant, input: R, output: W) -> Result<CodecStats> {
    compress_with(variant, &AdaptiveConfig::default(), input, output)
}

/// Decompress `input` into `output` with default settings.
pub fn decompress<R: Read, W: Write>(variant: Variant, input: R, output: W) -> Result<CodecStats> {
    decompress_with(variant, &AdaptiveConfig::default(), input, output)
}

/// Compress with an explicit adaptive configuration (ignored by the static
/// format).
pub fn compress_with<R: Read + Seek, W: Write>(
    variant: Variant,
    config: &AdaptiveConfig,
    input: R,
    output: W,
) -> Result<CodecStats> {
    match variant {
        Variant::Static => static_huffman::compress(input, output),
        Variant::Adaptive => adaptive::compress_with_config(input, output, config),
    }
}

/// Decompress with an explicit adaptive configuration (ignored by the static
/// format). The configuration must match the one used to compress.
pub fn decompress_with<R: Read, W: Write>(
    variant: Variant,
    config: &AdaptiveConfig,
    input: R,
    output: W,
) -> Result<CodecStats> {
    match variant {
        Variant::Static => static_huffman::decompress(input, output),
        Variant::Adaptive => adaptive::decompress_with_config(input, output, config),
    }
}

/// Convert a decoded non-marker symbol back to its byte.
pub(crate) fn symbol_to_byte(symbol: u32) -> Result<u8> {
    u8::try_from(symbol).map_err(|_| {
        error::HuffmanError::SymbolOutOfRange {
            symbol,
            limit: END_OF_DATA,
        }
        .into()
    })
}
