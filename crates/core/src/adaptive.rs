//! Adaptive (one-pass) Huffman format.
//!
//! No table is transmitted. Encoder and decoder both start from a flat
//! frequency table (every symbol counted once) and feed every coded symbol
//! back into it. After `count` symbols:
//!
//! - the tree is rebuilt when `count` is a power of two below the reset
//!   period, or a multiple of the reset period
//! - at a multiple of the reset period the table then returns to the flat
//!   prior; that boundary's rebuild has already used the old counts
//!
//! The schedule depends only on the number of symbols processed, so both
//! sides stay in lockstep with nothing but the coded bits between them.

use std::io::{Read, Write};
use std::rc::Rc;

use tracing::{debug, info};

use crate::bitio::{read_chunk, BitReader, BitWriter};
use crate::coder::{HuffmanDecoder, HuffmanEncoder};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::stats::CodecStats;
use crate::tree::CodeTree;
use crate::{symbol_to_byte, Direction, Variant, END_OF_DATA, RESET_PERIOD, SYMBOL_LIMIT};

const CHUNK_SIZE: usize = 64 * 1024;

/// Settings both sides of an adaptive stream must agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveConfig {
    /// Symbols between frequency table resets
    pub reset_period: u32,
}

impl AdaptiveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reset_period == 0 {
            return Err(Error::Config("reset period must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            reset_period: RESET_PERIOD,
        }
    }
}

/// Whether the tree is rebuilt after `count` symbols.
pub fn is_rebuild_point(count: u64, reset_period: u64) -> bool {
    count > 0 && ((count < reset_period && count.is_power_of_two()) || count % reset_period == 0)
}

/// Whether the frequency table is reset after `count` symbols.
pub fn is_reset_point(count: u64, reset_period: u64) -> bool {
    count > 0 && count % reset_period == 0
}

/// What `AdaptiveModel::update` did for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelUpdate {
    /// Symbols processed, this one included
    pub count: u64,
    pub rebuilt: bool,
    pub reset: bool,
}

/// The state an adaptive encoder or decoder evolves in lockstep.
#[derive(Debug, Clone)]
pub struct AdaptiveModel {
    initial: FrequencyTable,
    frequencies: FrequencyTable,
    tree: Rc<CodeTree>,
    count: u64,
    reset_period: u64,
}

impl AdaptiveModel {
    pub fn new(config: &AdaptiveConfig) -> Result<Self> {
        config.validate()?;
        let initial = FrequencyTable::flat(SYMBOL_LIMIT, 1)?;
        let tree = Rc::new(initial.build_code_tree()?);
        Ok(Self {
            frequencies: initial.clone(),
            initial,
            tree,
            count: 0,
            reset_period: config.reset_period as u64,
        })
    }

    /// The tree to code the next symbol with.
    pub fn tree(&self) -> Rc<CodeTree> {
        Rc::clone(&self.tree)
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Symbols processed so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Account for one coded symbol, then rebuild and reset on schedule.
    pub fn update(&mut self, symbol: u32) -> Result<ModelUpdate> {
        self.frequencies.increment(symbol)?;
        self.count += 1;

        let rebuilt = is_rebuild_point(self.count, self.reset_period);
        if rebuilt {
            self.tree = Rc::new(self.frequencies.build_code_tree()?);
            debug!(count = self.count, "rebuilt code tree");
        }

        let reset = is_reset_point(self.count, self.reset_period);
        if reset {
            self.frequencies = self.initial.clone();
            debug!(count = self.count, "reset frequency table");
        }

        Ok(ModelUpdate {
            count: self.count,
            rebuilt,
            reset,
        })
    }
}

/// Compress `input` into `output` with the default reset period.
pub fn compress<R: Read, W: Write>(input: R, output: W) -> Result<CodecStats> {
    compress_with_config(input, output, &AdaptiveConfig::default())
}

/// Decompress `input` into `output` with the default reset period.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<CodecStats> {
    decompress_with_config(input, output, &AdaptiveConfig::default())
}

pub fn compress_with_config<R: Read, W: Write>(
    mut input: R,
    output: W,
    config: &AdaptiveConfig,
) -> Result<CodecStats> {
    let mut stats = CodecStats::new(Variant::Adaptive, Direction::Compress);
    let mut model = AdaptiveModel::new(config)?;
    let mut encoder = HuffmanEncoder::new(BitWriter::new(output), model.tree());

    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = read_chunk(&mut input, &mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            encode_symbol(&mut encoder, &mut model, &mut stats, byte as u32)?;
        }
        stats.input_bytes += n as u64;
    }
    encode_symbol(&mut encoder, &mut model, &mut stats, END_OF_DATA)?;

    stats.output_bytes = encoder.bit_len().div_ceil(8);
    encoder.finish()?;

    stats.complete();
    info!(
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        rebuilds = stats.tree_rebuilds,
        resets = stats.table_resets,
        "adaptive compression complete"
    );
    Ok(stats)
}

pub fn decompress_with_config<R: Read, W: Write>(
    input: R,
    mut output: W,
    config: &AdaptiveConfig,
) -> Result<CodecStats> {
    let mut stats = CodecStats::new(Variant::Adaptive, Direction::Decompress);
    let mut model = AdaptiveModel::new(config)?;
    let mut decoder = HuffmanDecoder::new(BitReader::new(input), model.tree());

    let mut pending = Vec::with_capacity(CHUNK_SIZE);
    loop {
        let symbol = decoder.decode()?;
        stats.max_code_length = stats
            .max_code_length
            .max(decoder.tree().code_length(symbol));
        let update = model.update(symbol)?;
        record_update(&mut stats, update);
        if update.rebuilt {
            decoder.set_tree(model.tree());
        }

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
        rebuilds = stats.tree_rebuilds,
        resets = stats.table_resets,
        "adaptive decompression complete"
    );
    Ok(stats)
}

fn encode_symbol<W: Write>(
    encoder: &mut HuffmanEncoder<W>,
    model: &mut AdaptiveModel,
    stats: &mut CodecStats,
    symbol: u32,
) -> Result<()> {
    encoder.encode(symbol)?;
    stats.max_code_length = stats
        .max_code_length
        .max(encoder.tree().code_length(symbol));
    let update = model.update(symbol)?;
    record_update(stats, update);
    if update.rebuilt {
        encoder.set_tree(model.tree());
    }
    Ok(())
}

fn record_update(stats: &mut CodecStats, update: ModelUpdate) {
    stats.symbols = update.count;
    stats.tree_rebuilds += update.rebuilt as u64;
    stats.table_resets += update.reset as u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_with(data: &[u8], config: &AdaptiveConfig) -> (Vec<u8>, CodecStats, CodecStats) {
        let mut packed = Vec::new();
        let enc_stats = compress_with_config(data, &mut packed, config).unwrap();
        let mut unpacked = Vec::new();
        let dec_stats = decompress_with_config(&packed[..], &mut unpacked, config).unwrap();
        (unpacked, enc_stats, dec_stats)
    }

    #[test]
    fn test_rebuild_points() {
        let period = RESET_PERIOD as u64;
        let points: Vec<u64> = (1..=3 * period)
            .filter(|&c| is_rebuild_point(c, period))
            .collect();

        let mut expected: Vec<u64> = (0..18).map(|e| 1u64 << e).collect();
        expected.extend([period, 2 * period, 3 * period]);
        assert_eq!(points, expected);
        assert!(!is_rebuild_point(0, period));
    }

    #[test]
    fn test_reset_points() {
        let period = RESET_PERIOD as u64;
        assert!(!is_reset_point(0, period));
        assert!(!is_reset_point(131_072, period));
        assert!(is_reset_point(262_144, period));
        assert!(is_reset_point(524_288, period));
        assert!(!is_reset_point(524_289, period));
    }

    #[test]
    fn test_model_rebuilds_before_reset() {
        let config = AdaptiveConfig { reset_period: 8 };
        let mut model = AdaptiveModel::new(&config).unwrap();

        for _ in 0..7 {
            model.update(b'x' as u32).unwrap();
        }
        let before = model.tree();
        let update = model.update(b'x' as u32).unwrap();
        assert_eq!(
            update,
            ModelUpdate {
                count: 8,
                rebuilt: true,
                reset: true
            }
        );

        // The new tree saw 9 counts of 'x' (prior + 8), so 'x' got shorter.
        let after = model.tree();
        assert!(after.code_length(b'x' as u32) < before.code_length(b'x' as u32));
        // The table is back to the flat prior.
        assert_eq!(model.frequencies().get(b'x' as u32).unwrap(), 1);
    }

    #[test]
    fn test_round_trip_text() {
        let data = b"adaptive huffman adapts as it goes, as it goes, as it goes";
        let (out, enc, dec) = round_trip_with(data, &AdaptiveConfig::default());
        assert_eq!(out, data);
        assert_eq!(enc.symbols, data.len() as u64 + 1);
        assert_eq!(enc.tree_rebuilds, dec.tree_rebuilds);
    }

    #[test]
    fn test_empty_input() {
        let mut packed = Vec::new();
        let stats = compress(&b""[..], &mut packed).unwrap();
        assert_eq!(stats.symbols, 1);

        // The flat prior gives the end marker an 8-bit code: exactly one byte
        let flat = FrequencyTable::flat(SYMBOL_LIMIT, 1).unwrap();
        assert_eq!(flat.build_code_tree().unwrap().code_length(END_OF_DATA), 8);
        assert_eq!(packed.len(), 1);

        let mut unpacked = Vec::new();
        decompress(&packed[..], &mut unpacked).unwrap();
        assert!(unpacked.is_empty());
    }

    #[test]
    fn test_small_reset_period() {
        let config = AdaptiveConfig { reset_period: 5 };
        let data: Vec<u8> = b"abcabcabcabcaaaaaaaaaaaazzzz".to_vec();
        let (out, enc, dec) = round_trip_with(&data, &config);

        assert_eq!(out, data);
        // 29 symbols with the end marker: resets at 5, 10, 15, 20, 25
        assert_eq!(enc.table_resets, 5);
        assert_eq!(dec.table_resets, 5);
        // rebuilds at 1, 2, 4 and every reset
        assert_eq!(enc.tree_rebuilds, 8);
    }

    #[test]
    fn test_zero_reset_period_rejected() {
        let config = AdaptiveConfig { reset_period: 0 };
        let result = compress_with_config(&b"abc"[..], Vec::new(), &config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_truncated_stream() {
        let data = vec![7u8; 1000];
        let mut packed = Vec::new();
        compress(&data[..], &mut packed).unwrap();

        let result = decompress(&packed[..packed.len() / 2], Vec::new());
        assert!(result.is_err());
    }
}
