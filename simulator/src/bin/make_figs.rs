//! Render all study figures
//!
//! Usage:
//! ```
//! cargo run --release --bin make_figs -- --output-dir figures
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simulator::figures::{
    plot_bits_home_grid, plot_closed_loop_walkoff, plot_phase_error_frontier,
    plot_storage_tradeoff,
};
use simulator::shared_args::ConstantsArgs;

/// Generate the phasing, storage and comms figures
#[derive(Parser, Debug)]
#[command(name = "make_figs")]
struct Cli {
    #[command(flatten)]
    constants: ConstantsArgs,

    /// Directory receiving the per-work-package figure folders
    #[arg(long, default_value = "figures")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let constants = cli
        .constants
        .load()
        .with_context(|| format!("loading {}", cli.constants.constants.display()))?;

    let phasing_dir = cli.output_dir.join("wp2_phasing");
    let frontier_path = phasing_dir.join("F2-01_phase_error_frontier.png");
    let walkoff_path = phasing_dir.join("F2-01b_walkoff_timeseries.png");
    let storage_path = cli.output_dir.join("wp3_storage").join("F2-02_storage_trade.png");
    let bits_path = cli.output_dir.join("wp6_comms").join("F2-03_bits_home.png");

    let frontier = plot_phase_error_frontier(&constants, Some(frontier_path.as_path()))
        .context("phase-error frontier figure")?;
    info!(
        "frontier: {} array diameters at R = {} m",
        frontier.array_diameters_km.len(),
        frontier.sail_radius_m
    );

    let walkoff = plot_closed_loop_walkoff(Some(walkoff_path.as_path()))
        .context("walk-off time series figure")?;
    info!(
        "walk-off: RMS {:.3e} m, 5σ {:.3e} m, within requirement: {}",
        walkoff.rms_m,
        walkoff.five_sigma_m,
        walkoff.within_requirement()
    );

    plot_storage_tradeoff(Some(storage_path.as_path())).context("storage trade figure")?;
    plot_bits_home_grid(&constants, Some(bits_path.as_path())).context("bits-home figure")?;

    println!("Figures written to {}", cli.output_dir.display());
    Ok(())
}
