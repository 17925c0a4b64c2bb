use std::process::ExitCode;

use huffpack_core::{Direction, Variant};

fn main() -> ExitCode {
    huffpack::run_fixed("huffman-decompress", Variant::Static, Direction::Decompress)
}
