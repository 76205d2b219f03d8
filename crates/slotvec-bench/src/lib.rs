//! Benchmark workloads for the slotvec growable array.
//!
//! Provides deterministic inputs shared by the criterion benches:
//!
//! - [`insert_positions`]: valid insertion indices for a growing array
//! - [`erase_positions`]: valid erasure indices for a shrinking array
//! - [`filled`]: an array of `0..n` built by appending

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotvec_array::GrowableArray;
use slotvec_core::ArrayError;

/// Generate `n` insertion positions for an array that starts at
/// `start_len` elements and grows by one after each insertion.
///
/// Position `i` lies in `[0, start_len + i]`, so every position is valid
/// when applied in order. Identical seeds give identical sequences.
pub fn insert_positions(start_len: usize, n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| bounded(&mut rng, start_len + i + 1))
        .collect()
}

/// Generate `n` erasure positions for an array that starts at `start_len`
/// elements and shrinks by one after each erasure.
///
/// Position `i` lies in `[0, start_len - i)`. `n` is capped at `start_len`.
pub fn erase_positions(start_len: usize, n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n.min(start_len))
        .map(|i| bounded(&mut rng, start_len - i))
        .collect()
}

/// An array holding `0..n`, built by repeated appends.
///
/// # Errors
///
/// Propagates the first failed append, so a benchmark never runs on a
/// shorter workload than it asked for.
pub fn filled(n: usize) -> Result<GrowableArray<u64>, ArrayError> {
    let mut array = GrowableArray::new();
    for v in 0..n as u64 {
        array.push_back(v)?;
    }
    Ok(array)
}

/// Uniform-enough index in `[0, bound)`; `bound` must be non-zero.
fn bounded(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    (rng.next_u64() % bound as u64) as usize
}
