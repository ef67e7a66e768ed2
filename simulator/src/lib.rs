//! Interstellar-precursor feasibility calculators
//!
//! Each work package is an independent set of pure functions:
//! - [`phasing`]: path-length stability requirement and closed-loop walk-off
//! - [`storage`]: energy storage mass trade
//! - [`comms`]: optical link budget and integration windows
//! - [`figures`]: PNG rendering of the study figures

pub mod comms;
pub mod figures;
pub mod phasing;
pub mod shared_args;
pub mod storage;

// Re-exports for easier access
pub use comms::{
    bits_home_grid, coherent_integration_time, doppler_shift_emitted_to_observed,
    photon_count_rx, IntegrationWindows, LinkBudget, Site,
};
pub use phasing::{
    closed_loop_walkoff, required_path_length_stability, PsdSamples, WalkoffParams,
    WalkoffResult,
};
pub use storage::{compare_storage_options, total_mass_for_energy, StorageTechnology};
