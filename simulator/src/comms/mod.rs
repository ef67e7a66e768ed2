//! WP6 optical communications models.
//!
//! - [`link_budget`]: Doppler shift, Gaussian-beam photon rate and the
//!   bits-returned grid.
//! - [`windows`]: daily coherent integration windows for an Earth or Moon
//!   receiver.

pub mod link_budget;
pub mod windows;

pub use link_budget::{
    bits_home_grid, doppler_shift_emitted_to_observed, photon_count_rx, LinkBudget,
    LinkBudgetError,
};
pub use windows::{
    coherent_integration_time, IntegrationWindows, Site, WindowError,
    MOON_INTEGRATION_REDUCTION_FACTOR,
};
