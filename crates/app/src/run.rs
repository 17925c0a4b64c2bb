//! One compression or decompression run over real files.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use huffpack_core::verify::verify_round_trip;
use huffpack_core::{compress_with, decompress_with, CodecStats, Direction, Error, Result};
use tracing::{debug, info};

use crate::config::Config;

/// Run the configured transform, then the optional verification.
///
/// The input is never truncated: naming the same file twice is rejected
/// before anything is created. A failed transform removes its output file.
pub fn run(config: &Config) -> Result<CodecStats> {
    let input = BufReader::new(open(&config.input_file)?);
    if same_file(&config.input_file, &config.output_file)? {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{}: input and output are the same file",
                config.output_file.display()
            ),
        )));
    }
    let output = BufWriter::new(create(&config.output_file)?);

    let result = match config.direction {
        Direction::Compress => compress_with(config.variant, &config.adaptive, input, output),
        Direction::Decompress => decompress_with(config.variant, &config.adaptive, input, output),
    };
    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(&config.output_file) {
                debug!(error = %remove_err, "could not remove incomplete output");
            }
            return Err(e);
        }
    };
    info!(
        input = %config.input_file.display(),
        output = %config.output_file.display(),
        ratio = stats.compression_ratio(),
        "{} ({}) done",
        config.direction,
        config.variant
    );

    if config.verify {
        let crc = verify_round_trip(
            config.variant,
            &config.adaptive,
            BufReader::new(open(&config.input_file)?),
            BufReader::new(open(&config.output_file)?),
        )?;
        info!(crc = %format!("{:08x}", crc), "round trip verified");
    }

    if config.print_stats {
        stats.print_summary();
    }

    Ok(stats)
}

/// Whether both paths resolve to one existing file.
fn same_file(input: &Path, output: &Path) -> Result<bool> {
    let input = fs::canonicalize(input).map_err(|e| with_path(e, input))?;
    match fs::canonicalize(output) {
        Ok(output) => Ok(input == output),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(with_path(e, output)),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| with_path(e, path))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| with_path(e, path))
}

fn with_path(err: io::Error, path: &Path) -> Error {
    Error::Io(io::Error::new(err.kind(), format!("{}: {}", path.display(), err)))
}
