//! Error types for huffpack.
//!
//! Every operation returns a structured error instead of panicking. A
//! compression run is a one-shot batch transform, so callers are expected to
//! abort on the first error rather than retry.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte streams
/// - Huffman: code construction, length tables, encode/decode failures
/// - CRC: a verified round trip did not reproduce the original bytes
/// - I/O: the underlying byte source or sink failed
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., malformed length table, truncated stream)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Round-trip verification failed, indicating a codec defect or corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid codec configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the stream
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a code tree)
    #[error("empty frequency table: cannot build code tree")]
    EmptyFrequencyTable,

    /// An alphabet needs at least two symbols
    #[error("symbol limit {0} is too small, need at least 2")]
    SymbolLimitTooSmall(usize),

    /// Symbol index outside the alphabet
    #[error("symbol {symbol} out of range (limit {limit})")]
    SymbolOutOfRange { symbol: u32, limit: u32 },

    /// A frequency counter would exceed its representable range
    #[error("frequency of symbol {symbol} overflowed")]
    FrequencyOverflow { symbol: u32 },

    /// Symbol has no codeword in the current tree
    #[error("symbol {symbol} has no code in the current tree")]
    SymbolNotInCode { symbol: u32 },

    /// Code length does not fit the 8-bit length field
    #[error("code length {length} of symbol {symbol} exceeds maximum 255")]
    CodeLengthTooLong { symbol: u32, length: u32 },

    /// Code lengths claim more codewords than a prefix code can hold
    #[error("code length table is over-subscribed")]
    OversubscribedCode,

    /// Code lengths leave unused codewords, so the tree would not be full
    #[error("code length table is incomplete")]
    IncompleteCode,

    /// The same symbol appears on two leaves
    #[error("symbol {symbol} appears on more than one leaf")]
    DuplicateSymbol { symbol: u32 },

    /// A code tree must have an internal node at its root
    #[error("code tree root must be an internal node")]
    DegenerateTree,

    /// Bit stream ended before the end-of-data symbol was decoded
    #[error("compressed stream truncated after {bits_read} bits")]
    TruncatedStream { bits_read: u64 },

    /// Length table has the wrong number of entries
    #[error("length table mismatch: expected {expected} entries, got {actual}")]
    TableLengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
