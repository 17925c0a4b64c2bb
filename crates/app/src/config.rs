//! Command-line configuration.
//!
//! `huffpack` takes flags plus two positional paths. The four fixed
//! programs (`huffman-compress` and friends) take the two paths and nothing
//! else; their variant and direction come from the program itself.

use std::path::PathBuf;

use huffpack_core::adaptive::AdaptiveConfig;
use huffpack_core::{Direction, Variant};

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // === Files ===
    pub input_file: PathBuf,
    pub output_file: PathBuf,

    // === Coding ===
    pub variant: Variant,
    pub direction: Direction,
    pub adaptive: AdaptiveConfig,

    // === Behavior ===
    /// Decode the written file and compare CRC-32s (compression only)
    pub verify: bool,
    /// Print run statistics to stdout
    pub print_stats: bool,
    /// Print the resolved configuration before running
    pub print_config: bool,
    /// Number of `-v` flags
    pub verbosity: u8,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Parse `huffpack` arguments (program name excluded).
    pub fn from_args(args: &[String]) -> Result<Command, String> {
        let mut positionals: Vec<PathBuf> = Vec::new();
        let mut direction = Direction::Compress;
        let mut variant = Variant::Static;
        let mut reset_period: Option<u32> = None;
        let mut verify = false;
        let mut print_stats = false;
        let mut print_config = false;
        let mut verbosity = 0u8;
        let mut options_done = false;

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            if options_done || !arg.starts_with('-') || arg == "-" {
                positionals.push(PathBuf::from(arg));
                i += 1;
                continue;
            }
            match arg {
                "-d" | "--decompress" => {
                    direction = Direction::Decompress;
                }
                "-a" | "--adaptive" => {
                    variant = Variant::Adaptive;
                }
                "--reset-period" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--reset-period requires a number".to_string());
                    }
                    let period: u32 = args[i].parse().map_err(|_| "invalid reset period")?;
                    if period == 0 {
                        return Err("reset period must be at least 1".to_string());
                    }
                    reset_period = Some(period);
                }
                "--verify" => {
                    verify = true;
                }
                "--stats" => {
                    print_stats = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "-v" | "--verbose" => {
                    verbosity = verbosity.saturating_add(1);
                }
                "-h" | "--help" => {
                    return Ok(Command::Help);
                }
                "--" => {
                    options_done = true;
                }
                cluster if cluster.len() > 2 && cluster[1..].bytes().all(|b| b == b'v') => {
                    let count = u8::try_from(cluster.len() - 1).unwrap_or(u8::MAX);
                    verbosity = verbosity.saturating_add(count);
                }
                _ => {
                    return Err(format!("unknown argument: {}", arg));
                }
            }
            i += 1;
        }

        if reset_period.is_some() && variant != Variant::Adaptive {
            return Err("--reset-period only applies with --adaptive".to_string());
        }
        if verify && direction != Direction::Compress {
            return Err("--verify only applies when compressing".to_string());
        }

        let (input_file, output_file) = take_paths(positionals)?;
        let mut adaptive = AdaptiveConfig::default();
        if let Some(period) = reset_period {
            adaptive.reset_period = period;
        }

        Ok(Command::Run(Config {
            input_file,
            output_file,
            variant,
            direction,
            adaptive,
            verify,
            print_stats,
            print_config,
            verbosity,
        }))
    }

    /// Configuration for a fixed-purpose program: exactly two paths.
    pub fn fixed(variant: Variant, direction: Direction, args: &[String]) -> Result<Self, String> {
        let paths = args.iter().map(PathBuf::from).collect();
        let (input_file, output_file) = take_paths(paths)?;
        Ok(Config {
            input_file,
            output_file,
            variant,
            direction,
            adaptive: AdaptiveConfig::default(),
            verify: false,
            print_stats: false,
            print_config: false,
            verbosity: 0,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Input file:  {}", self.input_file.display());
        println!("Output file: {}", self.output_file.display());
        println!();
        println!("Direction: {}", self.direction);
        println!("Format:    {}", self.variant);
        if self.variant == Variant::Adaptive {
            println!("Reset period: {} symbols", self.adaptive.reset_period);
        }
        println!("Verify: {}", if self.verify { "yes" } else { "no" });
        println!();
    }
}

fn take_paths(mut paths: Vec<PathBuf>) -> Result<(PathBuf, PathBuf), String> {
    if paths.len() != 2 {
        return Err(format!(
            "expected an input file and an output file, got {} path(s)",
            paths.len()
        ));
    }
    let output = paths.remove(1);
    let input = paths.remove(0);
    Ok((input, output))
}

/// One-line usage for the fixed-purpose programs.
pub fn fixed_usage(program: &str) -> String {
    format!("Usage: {} InputFile OutputFile", program)
}

pub fn print_help() {
    println!("huffpack: static and adaptive Huffman compression");
    println!();
    println!("USAGE:");
    println!("    huffpack [OPTIONS] <INPUT> <OUTPUT>");
    println!();
    println!("OPTIONS:");
    println!("    -d, --decompress        Decompress INPUT (default: compress)");
    println!("    -a, --adaptive          Use the adaptive format (default: static)");
    println!("    --reset-period <N>      Adaptive table reset period (default: 262144)");
    println!("                            The same value must be used to decompress");
    println!();
    println!("    --verify                After compressing, decode OUTPUT and compare");
    println!("    --stats                 Print run statistics");
    println!("    --print-config          Print resolved configuration");
    println!("    -v, --verbose           More logging on stderr (repeatable, -vv)");
    println!("    --help, -h              Print this help");
    println!();
    println!("    RUST_LOG overrides the log filter when no -v is given.");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack notes.txt notes.huf                # Static compression");
    println!("    huffpack -d notes.huf notes.txt             # Static decompression");
    println!("    huffpack -a --verify --stats big.log big.ahf  # Adaptive, checked");
    println!();
}
