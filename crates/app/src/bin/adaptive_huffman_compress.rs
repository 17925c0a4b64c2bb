use std::process::ExitCode;

use huffpack_core::{Direction, Variant};

fn main() -> ExitCode {
    huffpack::run_fixed("adaptive-huffman-compress", Variant::Adaptive, Direction::Compress)
}
