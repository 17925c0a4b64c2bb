#![allow(dead_code)]

//! Seeded test inputs with mixed compressibility.
//!
//! Data is produced in blocks of different character so that adaptive
//! coding sees its statistics shift:
//! - runs of one byte
//! - text over a small alphabet
//! - short repeating patterns
//! - uniform random bytes

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BLOCK_SIZE: usize = 4096;

/// Deterministic sample data of exactly `size_bytes` bytes.
pub fn sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let block = (size_bytes - data.len()).min(BLOCK_SIZE);
        match rng.gen_range(0..10u8) {
            0..=2 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(block));
            }
            3..=5 => {
                let alphabet = b"etaoin shrdlu.,\n";
                for _ in 0..block {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }
            6..=7 => {
                let len = rng.gen_range(3..=24);
                let pattern: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().cycle().take(block));
            }
            _ => {
                for _ in 0..block {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}

/// Uniform random bytes.
pub fn random_bytes(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size_bytes).map(|_| rng.gen()).collect()
}
