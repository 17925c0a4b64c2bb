//! Statistics for a single compression or decompression run.
//!
//! Each driver fills a `CodecStats` as it goes and marks it complete at the
//! end. Byte counts are always "bytes read" and "bytes written" from the
//! driver's point of view; `raw_bytes` / `compressed_bytes` translate them
//! according to the direction.

use std::time::{Duration, Instant};

use crate::{Direction, Variant};

#[derive(Debug, Clone)]
pub struct CodecStats {
    pub variant: Variant,
    pub direction: Direction,

    // === Timing ===
    pub start_time: Instant,
    pub end_time: Option<Instant>,

    // === Input/Output ===
    /// Bytes read from the input stream
    pub input_bytes: u64,

    /// Bytes written to the output stream
    pub output_bytes: u64,

    /// Bytes of code-length table (static format only)
    pub header_bytes: u64,

    // === Coding ===
    /// Symbols coded, including the end-of-data marker
    pub symbols: u64,

    /// Scheduled code tree rebuilds (adaptive format only)
    pub tree_rebuilds: u64,

    /// Frequency table resets (adaptive format only)
    pub table_resets: u64,

    /// Longest codeword in use (static: the transmitted code)
    pub max_code_length: u32,
}

impl CodecStats {
    pub fn new(variant: Variant, direction: Direction) -> Self {
        Self {
            variant,
            direction,
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            header_bytes: 0,
            symbols: 0,
            tree_rebuilds: 0,
            table_resets: 0,
            max_code_length: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Size of the uncompressed side.
    pub fn raw_bytes(&self) -> u64 {
        match self.direction {
            Direction::Compress => self.input_bytes,
            Direction::Decompress => self.output_bytes,
        }
    }

    /// Size of the compressed side, header included.
    pub fn compressed_bytes(&self) -> u64 {
        match self.direction {
            Direction::Compress => self.output_bytes,
            Direction::Decompress => self.input_bytes,
        }
    }

    /// Compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if there was no raw data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes() == 0 {
            0.0
        } else {
            self.compressed_bytes() as f64 / self.raw_bytes() as f64
        }
    }

    /// Average compressed bits per raw byte, header excluded.
    pub fn bits_per_byte(&self) -> f64 {
        if self.raw_bytes() == 0 {
            0.0
        } else {
            let payload = self.compressed_bytes().saturating_sub(self.header_bytes);
            (payload * 8) as f64 / self.raw_bytes() as f64
        }
    }

    /// Raw bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes() as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== {} ({}) ===", self.direction, self.variant);
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Input:  {} bytes", self.input_bytes);
        println!("Output: {} bytes", self.output_bytes);
        if self.header_bytes > 0 {
            println!("Header: {} bytes", self.header_bytes);
        }
        println!();
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!("Bits per byte: {:.3}", self.bits_per_byte());
        println!("Symbols coded: {}", self.symbols);
        println!("Longest code: {} bits", self.max_code_length);
        if self.variant == Variant::Adaptive {
            println!("Tree rebuilds: {}", self.tree_rebuilds);
            println!("Table resets: {}", self.table_resets);
        }
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "variant={}\n\
             direction={}\n\
             duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             header_bytes={}\n\
             symbols={}\n\
             tree_rebuilds={}\n\
             table_resets={}\n\
             max_code_length={}\n\
             compression_ratio={:.4}\n",
            self.variant,
            self.direction,
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.header_bytes,
            self.symbols,
            self.tree_rebuilds,
            self.table_resets,
            self.max_code_length,
            self.compression_ratio(),
        )
    }
}
