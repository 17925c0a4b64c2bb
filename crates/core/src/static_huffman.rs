//! Static (two-pass) Huffman format.
//!
//! # Format
//!
//! ```text
//! +----------------------------+
//! | code lengths (257 bytes)   |  one u8 per symbol 0..=256, 0 = unused
//! +----------------------------+
//! | coded bits                 |  every input byte, then symbol 256,
//! | (variable)                 |  MSB-first, zero-padded to a byte
//! +----------------------------+
//! ```
//!
//! The lengths describe a canonical code, so the decoder rebuilds the exact
//! tree the encoder used from the table alone.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::bitio::{read_chunk, BitReader, BitWriter};
use crate::canonical::CanonicalCode;
use crate::coder::{HuffmanDecoder, HuffmanEncoder};
use crate::error::{BitIoError, Error, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::stats::CodecStats;
use crate::{symbol_to_byte, Direction, Variant, END_OF_DATA, SYMBOL_LIMIT};

/// Size of the code length table in bytes.
pub const HEADER_SIZE: usize = SYMBOL_LIMIT as usize;

/// Largest code length the 8-bit table field can hold.
pub const MAX_CODE_LENGTH: u32 = 255;

const CHUNK_SIZE: usize = 64 * 1024;

/// Compress `input` into `output`.
///
/// The input is read twice: once to count byte frequencies and once, after
/// seeking back to where it started, to encode.
///
/// # Errors
/// - `CodeLengthTooLong` if some code does not fit the table; nothing has
///   been written to `output` in that case
/// - `Error::Io` if either pass fails to read, or the input changes length
///   between passes
pub fn compress<R: Read + Seek, W: Write>(mut input: R, output: W) -> Result<CodecStats> {
    let mut stats = CodecStats::new(Variant::Static, Direction::Compress);
    let start = input.stream_position()?;
    let mut buf = vec![0u8; CHUNK_SIZE];

    // SCAN
    let mut freqs = FrequencyTable::zeros(SYMBOL_LIMIT)?;
    loop {
        let n = read_chunk(&mut input, &mut buf)?;
        if n == 0 {
            break;
        }
        freqs.increment_all(&buf[..n])?;
        stats.input_bytes += n as u64;
    }
    freqs.increment(END_OF_DATA)?;
    trace!(bytes = stats.input_bytes, "frequency scan complete");

    // BUILD
    let tree = freqs.build_code_tree()?;
    let canonical = CanonicalCode::from_code_tree(&tree, SYMBOL_LIMIT)?;
    check_lengths(&canonical)?;
    let tree = Rc::new(canonical.to_code_tree()?);
    stats.max_code_length = canonical.max_code_length();

    // EMIT_HEADER
    let mut writer = BitWriter::new(output);
    write_header(&mut writer, &canonical)?;
    stats.header_bytes = HEADER_SIZE as u64;
    debug!(
        max_code_length = stats.max_code_length,
        symbols = tree.leaf_count(),
        "wrote code length table"
    );

    // ENCODE
    input.seek(SeekFrom::Start(start))?;
    let mut encoder = HuffmanEncoder::new(writer, tree);
    let mut second_pass = 0u64;
    loop {
        let n = read_chunk(&mut input, &mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            encoder.encode(byte as u32)?;
        }
        second_pass += n as u64;
    }
    if second_pass != stats.input_bytes {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "input changed between passes: {} bytes, then {}",
                stats.input_bytes, second_pass
            ),
        )));
    }
    encoder.encode(END_OF_DATA)?;
    stats.symbols = stats.input_bytes + 1;
    stats.output_bytes = encoder.bit_len().div_ceil(8);
    encoder.finish()?;

    stats.complete();
    info!(
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        "static compression complete"
    );
    Ok(stats)
}

/// Decompress `input` into `output`.
///
/// Decoding stops at the end-of-data symbol; any bytes after it are left
/// unread.
///
/// # Errors
/// - `TruncatedStream` if the table or the coded data ends early
/// - `OversubscribedCode` / `IncompleteCode` for a malformed table
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<CodecStats> {
    let mut stats = CodecStats::new(Variant::Static, Direction::Decompress);

    let mut reader = BitReader::new(input);
    let canonical = read_header(&mut reader)?;
    let tree = Rc::new(canonical.to_code_tree()?);
    stats.header_bytes = HEADER_SIZE as u64;
    stats.max_code_length = canonical.max_code_length();
    debug!(max_code_length = stats.max_code_length, "read code length table");

    let mut decoder = HuffmanDecoder::new(reader, tree);
    let mut pending = Vec::with_capacity(CHUNK_SIZE);
    loop {
        let symbol = decoder.decode()?;
        stats.symbols += 1;
        if symbol == END_OF_DATA {
            break;
        }
        pending.push(symbol_to_byte(symbol)?);
        if pending.len() == CHUNK_SIZE {
            output.write_all(&pending)?;
            stats.output_bytes += pending.len() as u64;
            pending.clear();
        }
    }
    output.write_all(&pending)?;
    stats.output_bytes += pending.len() as u64;
    output.flush()?;

    stats.input_bytes = decoder.position().div_ceil(8);
    stats.complete();
    info!(
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        "static decompression complete"
    );
    Ok(stats)
}

/// Write one 8-bit length per symbol.
///
/// The whole table is checked before the first bit is written.
pub fn write_header<W: Write>(writer: &mut BitWriter<W>, code: &CanonicalCode) -> Result<()> {
    check_lengths(code)?;
    for &len in code.code_lengths() {
        writer.write_bits(len as u64, 8)?;
    }
    Ok(())
}

/// Read a `SYMBOL_LIMIT`-entry length table and validate it.
pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<CanonicalCode> {
    let mut lengths = Vec::with_capacity(HEADER_SIZE);
    for _ in 0..HEADER_SIZE {
        let len = reader.read_bits(8).map_err(|e| match e {
            Error::BitIo(BitIoError::UnexpectedEof) => HuffmanError::TruncatedStream {
                bits_read: reader.position(),
            }
            .into(),
            other => other,
        })?;
        lengths.push(len as u32);
    }
    CanonicalCode::new(lengths)
}

fn check_lengths(code: &CanonicalCode) -> Result<()> {
    if code.symbol_limit() != SYMBOL_LIMIT {
        return Err(HuffmanError::TableLengthMismatch {
            expected: HEADER_SIZE,
            actual: code.symbol_limit() as usize,
        }
        .into());
    }
    for (symbol, &length) in code.code_lengths().iter().enumerate() {
        if length > MAX_CODE_LENGTH {
            return Err(HuffmanError::CodeLengthTooLong {
                symbol: symbol as u32,
                length,
            }
            .into());
        }
    }
    Ok(())
}
