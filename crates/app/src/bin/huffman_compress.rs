use std::process::ExitCode;

use huffpack_core::{Direction, Variant};

fn main() -> ExitCode {
    huffpack::run_fixed("huffman-compress", Variant::Static, Direction::Compress)
}
