//! Numerical building blocks shared by the calculators
//!
//! Filtering, summary statistics and deterministic parallel processing.

pub mod filter;
pub mod parallel;
pub mod stats;

pub use filter::OnePoleLowPass;
pub use parallel::{process_rows_in_parallel, stream_seed};
pub use stats::{mean, rms};
