//! Round-trip verification of a compressed stream.
//!
//! A compressed file is checked by decoding it into a CRC-32 sink and
//! comparing against the CRC-32 of the original. Nothing is buffered beyond
//! what the codec itself holds, so files of any size can be checked.

use std::io::{self, Read, Write};

use crate::adaptive::AdaptiveConfig;
use crate::error::{Error, Result};
use crate::{decompress_with, Variant};

/// A `Write` sink that only hashes what it is given.
#[derive(Debug, Default)]
pub struct Crc32Writer {
    hasher: crc32fast::Hasher,
    len: u64,
}

impl Crc32Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

impl Write for Crc32Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hasher.update(buf);
        self.len += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// CRC-32 and length of everything `reader` yields.
pub fn checksum<R: Read>(mut reader: R) -> Result<(u32, u64)> {
    let mut sink = Crc32Writer::new();
    io::copy(&mut reader, &mut sink)?;
    let len = sink.len();
    Ok((sink.finalize(), len))
}

/// Decode `compressed` and check that it reproduces `original`.
///
/// Returns the CRC-32 of the original on success.
///
/// # Errors
/// - `Error::Crc` if the decoded bytes differ from `original` (a length
///   difference is reported the same way)
/// - any error the decoder raises on malformed input
pub fn verify_round_trip<R1: Read, R2: Read>(
    variant: Variant,
    config: &AdaptiveConfig,
    original: R1,
    compressed: R2,
) -> Result<u32> {
    let (expected, expected_len) = checksum(original)?;

    let mut sink = Crc32Writer::new();
    decompress_with(variant, config, compressed, &mut sink)?;
    let actual_len = sink.len();
    let actual = sink.finalize();

    if actual != expected || actual_len != expected_len {
        return Err(Error::Crc { expected, actual });
    }
    Ok(expected)
}
