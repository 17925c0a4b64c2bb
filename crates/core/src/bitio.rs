//! Bit-level I/O over byte streams.
//!
//! `BitWriter` and `BitReader` move individual bits to and from any
//! `Write`/`Read`. Both operate in MSB-first order: the first bit written
//! lands in bit 7 of the first byte.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with zeros on `finish`
//! - BitReader: cannot tell padding from data; the codecs stop at the
//!   end-of-data symbol and never read the padding
//!
//! Both sides do one small read or write per byte, so wrap files in
//! `BufReader`/`BufWriter`.
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bit(true).unwrap();
//! let bytes = writer.finish().unwrap();
//! assert_eq!(bytes, vec![0b1011_0000]);
//!
//! let mut reader = BitReader::new(&bytes[..]);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte sink.
///
/// # Invariants
/// - `bit_count` is always < 8; a full byte is pushed to the sink immediately
/// - unused low bits of `bit_buffer` are zero
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Complete bytes handed to the sink
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bit_buffer: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.bit_buffer |= (bit as u8) << (7 - self.bit_count);
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.flush_byte()?;
        }
        Ok(())
    }

    /// Write up to 64 bits, most significant first.
    ///
    /// Writing value=0b101 with count=3 writes bits 1, 0, 1 in that order.
    /// Only the lowest `count` bits of `value` are used.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);
            let shift = remaining - bits_to_write;
            let mask = (1u64 << bits_to_write) - 1;
            let bits = ((value >> shift) & mask) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;
            if self.bit_count == 8 {
                self.flush_byte()?;
            }
            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Total number of bits written, including the pending partial byte.
    pub fn bit_len(&self) -> u64 {
        self.bytes_written * 8 + self.bit_count as u64
    }

    /// Pad the pending partial byte with zeros, flush the sink and return it.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            self.flush_byte()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn flush_byte(&mut self) -> Result<()> {
        self.inner.write_all(&[self.bit_buffer])?;
        self.bytes_written += 1;
        self.bit_buffer = 0;
        self.bit_count = 0;
        Ok(())
    }
}

/// Reads bits MSB-first from a byte source.
///
/// # Invariants
/// - `bits_left` counts the unread low bits of `current` (0-7 between calls)
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    bits_left: u8,
    /// Total bits handed out so far
    position: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            bits_left: 0,
            position: 0,
        }
    }

    /// Read the next bit, or `None` once the source is exhausted and no
    /// buffered bits remain.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_left == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.bits_left = 8;
                }
                None => return Ok(None),
            }
        }
        self.bits_left -= 1;
        self.position += 1;
        Ok(Some((self.current >> self.bits_left) & 1 == 1))
    }

    /// Read the next bit, treating end of input as an error.
    pub fn read_bit_no_eof(&mut self) -> Result<bool> {
        self.read_bit()?
            .ok_or_else(|| BitIoError::UnexpectedEof.into())
    }

    /// Read up to 64 bits, most significant first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if the source ends first
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut result = 0u64;
        for _ in 0..count {
            result = (result << 1) | self.read_bit_no_eof()? as u64;
        }
        Ok(result)
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Fill as much of `buf` as one read allows, retrying on interruption.
///
/// Returns 0 only at end of input.
pub(crate) fn read_chunk<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match input.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn write_all_bits(bits: &[bool]) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        for &bit in bits {
            writer.write_bit(bit).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_write_read_single_byte() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b10110011, 8).unwrap();

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0b10110011]);

        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(reader.read_bits(8).unwrap(), 0b10110011);
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_write_read_partial_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11, 2).unwrap();
        writer.write_bits(0b000, 3).unwrap();

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0b10111000]);

        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(2).unwrap(), 0b11);
        assert_eq!(reader.read_bits(3).unwrap(), 0b000);
    }

    #[test]
    fn test_padding() {
        assert_eq!(write_all_bits(&[true]), vec![0b10000000]);
        assert_eq!(write_all_bits(&[false, true, true]), vec![0b01100000]);
    }

    #[test]
    fn test_finish_empty_writes_nothing() {
        let writer = BitWriter::new(Vec::new());
        assert_eq!(writer.finish().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bit_by_bit() {
        let pattern = [true, false, true, true, false, false, true, false, true];
        let bytes = write_all_bits(&pattern);
        assert_eq!(bytes, vec![0b10110010, 0b10000000]);

        let mut reader = BitReader::new(&bytes[..]);
        for &expected in &pattern {
            assert_eq!(reader.read_bit().unwrap(), Some(expected));
        }
        // Padding bits are still readable; end is only at the byte boundary
        for _ in 0..7 {
            assert_eq!(reader.read_bit().unwrap(), Some(false));
        }
        assert_eq!(reader.read_bit().unwrap(), None);
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn test_multi_byte() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b1010101111110000, 16).unwrap();
        assert_eq!(writer.bit_len(), 16);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0b10101011, 0b11110000]);
    }

    #[test]
    fn test_64_bit_values() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        let val = 0x123456789ABCDEF0u64;
        writer.write_bits(val, 64).unwrap();
        assert_eq!(writer.bit_len(), 65);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 9);
        let mut reader = BitReader::new(&bytes[..]);
        assert!(reader.read_bit_no_eof().unwrap());
        assert_eq!(reader.read_bits(64).unwrap(), val);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0b10101010u8];
        let mut reader = BitReader::new(&data[..]);

        assert_eq!(reader.read_bits(8).unwrap(), 0b10101010);
        assert!(matches!(
            reader.read_bit_no_eof(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
        assert!(matches!(
            reader.read_bits(2),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new(Vec::new());
        assert!(matches!(
            writer.write_bits(0, 65),
            Err(Error::BitIo(BitIoError::InvalidBitCount(65)))
        ));

        let mut reader = BitReader::new(&[0u8; 16][..]);
        assert!(reader.read_bits(65).is_err());
    }

    #[test]
    fn test_zero_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xFF, 0).unwrap();
        assert_eq!(writer.finish().unwrap().len(), 0);

        let mut reader = BitReader::new(&[0xFFu8][..]);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_empty_source() {
        let mut reader = BitReader::new(std::io::empty());
        assert_eq!(reader.read_bit().unwrap(), None);
    }
}
