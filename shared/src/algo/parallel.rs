//! Parallel processing utilities for array operations
//!
//! Rows are processed in parallel, each with its own random stream derived
//! deterministically from a base seed, so results do not depend on thread
//! scheduling.

use ndarray::{Array2, ArrayViewMut1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Derive the seed of an independent sub-stream from a base seed.
///
/// SplitMix64 finalizer over the base seed offset by the stream index, so
/// neighbouring base seeds do not produce shifted copies of each other's
/// streams.
pub fn stream_seed(base_seed: u64, stream_index: u64) -> u64 {
    let mut z = base_seed
        .wrapping_add(stream_index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Process each row of an Array2 in parallel with deterministic seeding
///
/// Each row receives its index, a mutable view of itself and an RNG seeded
/// with [`stream_seed`]`(seed, row_index)`.
///
/// # Arguments
/// * `array` - The 2D array to process
/// * `seed` - Base seed for random number generation
/// * `processor` - Closure that fills one row using its own RNG
///
/// # Returns
/// The processed array
pub fn process_rows_in_parallel<F>(mut array: Array2<f64>, seed: u64, processor: F) -> Array2<f64>
where
    F: Fn(usize, ArrayViewMut1<f64>, &mut StdRng) + Send + Sync,
{
    array
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(row_idx, row)| {
            let mut rng = StdRng::seed_from_u64(stream_seed(seed, row_idx as u64));
            processor(row_idx, row, &mut rng);
        });

    array
}
