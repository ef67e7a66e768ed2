//! Figure rendering for the study work packages.
//!
//! Every `plot_*` function computes the data it plots and returns it. A PNG
//! is rendered only when a save path is given; the parent directory is
//! created as needed.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;
use shared::config::Constants;
use thiserror::Error;

use crate::comms::{LinkBudget, LinkBudgetError};
use crate::phasing::requirement::FRONTIER_DISTANCE_M;
use crate::phasing::{
    closed_loop_walkoff, phase_error_frontier, PhaseErrorFrontier, PhasingError, PsdSamples,
    WalkoffParams, WalkoffResult,
};
use crate::storage::{compare_storage_options, StorageError, StorageTechnology, StorageTradeRow};

const FIGURE_SIZE: (u32, u32) = (1024, 768);
const PANEL_WIDTH: u32 = 640;
const PANEL_HEIGHT: u32 = 560;

/// Stored energies plotted in the storage trade figure, in TJ
pub const STORAGE_FIGURE_ENERGIES_TJ: [f64; 5] = [10.0, 20.0, 30.0, 40.0, 50.0];

/// Seed for the example walk-off figure
pub const WALKOFF_FIGURE_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum FigureError {
    #[error(transparent)]
    Phasing(#[from] PhasingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    LinkBudget(#[from] LinkBudgetError),

    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render {}: {message}", .path.display())]
    Drawing { path: PathBuf, message: String },
}

fn prepare_output(path: &Path) -> Result<(), FigureError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| FigureError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn render<F>(path: &Path, draw: F) -> Result<(), FigureError>
where
    F: FnOnce(&Path) -> Result<(), Box<dyn Error>>,
{
    prepare_output(path)?;
    draw(path).map_err(|e| FigureError::Drawing {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!("Figure saved to: {}", path.display());
    Ok(())
}

/// Padded log-axis range covering every positive value
fn log_bounds(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| *v > 0.0 && v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() && hi.is_finite() {
        (lo / 2.0, hi * 2.0)
    } else {
        (1.0, 10.0)
    }
}

/// F2-01: required path-length stability against array diameter.
pub fn plot_phase_error_frontier(
    constants: &Constants,
    save_path: Option<&Path>,
) -> Result<PhaseErrorFrontier, FigureError> {
    let frontier = phase_error_frontier(constants, FRONTIER_DISTANCE_M)?;
    if let Some(path) = save_path {
        render(path, |p| draw_phase_error_frontier(p, &frontier))?;
    }
    Ok(frontier)
}

fn draw_phase_error_frontier(path: &Path, frontier: &PhaseErrorFrontier) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = log_bounds(frontier.array_diameters_km.iter().copied());
    let (y_lo, y_hi) = log_bounds(frontier.required_stability_pm.iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption("Phase-error frontier", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), (y_lo..y_hi).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Array diameter (km)")
        .y_desc("Required path-length stability (pm)")
        .y_label_formatter(&|y| format!("{y:.0e}"))
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    let points: Vec<(f64, f64)> = frontier
        .array_diameters_km
        .iter()
        .copied()
        .zip(frontier.required_stability_pm.iter().copied())
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), BLUE.stroke_width(2)))?
        .label(format!(
            "R = {} m, d = {:.0e} m",
            frontier.sail_radius_m, frontier.distance_m
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// PSD used by the example walk-off figure: flat 1e-9 m²/Hz on 1..1000 Hz
pub fn walkoff_figure_psd() -> Result<PsdSamples, PhasingError> {
    PsdSamples::flat(1.0, 1000.0, 100, 1e-9)
}

/// Controller and geometry of the example walk-off figure
pub fn walkoff_figure_params() -> WalkoffParams {
    WalkoffParams {
        controller_bandwidth_hz: 200.0,
        accel_time_s: 10.0,
        baseline_m: 10_000.0,
        distance_m: 1e8,
        sail_radius_m: 1.0,
        n_runs: 1,
    }
}

/// F2-01b: simulated walk-off time series of the example configuration.
pub fn plot_closed_loop_walkoff(save_path: Option<&Path>) -> Result<WalkoffResult, FigureError> {
    let result = closed_loop_walkoff(
        &walkoff_figure_psd()?,
        &walkoff_figure_params(),
        Some(WALKOFF_FIGURE_SEED),
    )?;
    if let Some(path) = save_path {
        render(path, |p| draw_closed_loop_walkoff(p, &result))?;
    }
    Ok(result)
}

fn draw_closed_loop_walkoff(path: &Path, result: &WalkoffResult) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let times = result.time_axis();
    let t_max = times.last().copied().unwrap_or(1.0).max(f64::MIN_POSITIVE);
    let peak = result
        .walkoff_time_series
        .iter()
        .fold(result.five_sigma_m, |acc, v| acc.max(v.abs()));
    let y_limit = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Closed-loop walk-off (RMS {:.3e} m, 5σ {:.3e} m)",
                result.rms_m, result.five_sigma_m
            ),
            ("sans-serif", 26).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..t_max, -y_limit..y_limit)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Lateral walk-off (m)")
        .y_label_formatter(&|y| format!("{y:.1e}"))
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    if let Some(run) = result.walkoff_time_series.outer_iter().next() {
        chart
            .draw_series(LineSeries::new(
                times.iter().copied().zip(run.iter().copied()),
                BLUE.mix(0.7),
            ))?
            .label("run 0")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    }

    for bound in [result.five_sigma_m, -result.five_sigma_m] {
        chart.draw_series(LineSeries::new(
            vec![(0.0, bound), (t_max, bound)],
            RED.stroke_width(2),
        ))?;
    }
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label("±5σ")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// F2-02: storage mass against stored energy for every technology.
pub fn plot_storage_tradeoff(save_path: Option<&Path>) -> Result<Vec<StorageTradeRow>, FigureError> {
    let rows = compare_storage_options(&STORAGE_FIGURE_ENERGIES_TJ)?;
    if let Some(path) = save_path {
        render(path, |p| draw_storage_tradeoff(p, &rows))?;
    }
    Ok(rows)
}

fn draw_storage_tradeoff(path: &Path, rows: &[StorageTradeRow]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let e_max = rows.iter().map(|r| r.energy_tj).fold(1.0, f64::max);
    let (m_lo, m_hi) = log_bounds(rows.iter().map(|r| r.mass_kg));

    let mut chart = ChartBuilder::on(&root)
        .caption("Storage trade", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..e_max * 1.05, (m_lo..m_hi).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Stored energy (TJ)")
        .y_desc("Mass (kg)")
        .y_label_formatter(&|y| format!("{y:.0e}"))
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    let colors = [RED, BLUE, GREEN];
    for (option, color) in StorageTechnology::ALL.iter().zip(colors) {
        let points: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.option == *option)
            .map(|r| (r.energy_tj, r.mass_kg))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(format!("{} (η={})", option, option.efficiency()))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// One heat-map panel of the bits-home figure
#[derive(Debug, Clone)]
pub struct BitsHomePanel {
    pub beta: f64,
    /// Bits returned, rows by receiver diameter, columns by integration time
    pub grid: Array2<f64>,
}

/// F2-03: bits returned against receiver diameter and integration time, one
/// panel per configured Doppler beta.
///
/// Uses the maximum configured squeezing gain and no coding gain.
pub fn plot_bits_home_grid(
    constants: &Constants,
    save_path: Option<&Path>,
) -> Result<Vec<BitsHomePanel>, FigureError> {
    let comms = &constants.comms;
    let link = LinkBudget::from_constants(constants);
    let [_, squeezing_max_db] = comms.quantum_squeezing_gain_db_range;

    let panels = comms
        .doppler_betas
        .iter()
        .map(|&beta| {
            link.bits_home_grid(
                comms.dataset_bits_nominal,
                &comms.lunar_receiver_diameters_m,
                &comms.integration_times_hours,
                beta,
                0.0,
                squeezing_max_db,
            )
            .map(|grid| BitsHomePanel { beta, grid })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = save_path {
        render(path, |p| draw_bits_home_grid(p, constants, &panels))?;
    }
    Ok(panels)
}

fn draw_bits_home_grid(
    path: &Path,
    constants: &Constants,
    panels: &[BitsHomePanel],
) -> Result<(), Box<dyn Error>> {
    let n_panels = panels.len().max(1);
    let root = BitMapBackend::new(path, (PANEL_WIDTH * n_panels as u32, PANEL_HEIGHT))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let titled = root.titled(
        "Bits returned vs aperture & integration",
        ("sans-serif", 26).into_font(),
    )?;
    let areas = titled.split_evenly((1, n_panels));

    let ceiling = constants.comms.dataset_bits_nominal as f64;
    let (color_lo, _) = log_bounds(panels.iter().flat_map(|p| p.grid.iter().copied()));

    for (area, panel) in areas.iter().zip(panels) {
        draw_bits_panel(
            area,
            panel,
            &constants.comms.lunar_receiver_diameters_m,
            &constants.comms.integration_times_hours,
            color_lo,
            ceiling,
        )?;
    }

    root.present()?;
    Ok(())
}

fn draw_bits_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel: &BitsHomePanel,
    diameters_m: &[f64],
    hours: &[f64],
    color_lo: f64,
    ceiling: f64,
) -> Result<(), Box<dyn Error>> {
    let (n_rows, n_cols) = panel.grid.dim();

    let mut chart = ChartBuilder::on(area)
        .caption(format!("beta = {}", panel.beta), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..n_cols, 0..n_rows)?;

    let x_label = |i: &usize| hours.get(*i).map(|h| format!("{h}")).unwrap_or_default();
    let y_label = |i: &usize| diameters_m.get(*i).map(|d| format!("{d}")).unwrap_or_default();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_cols)
        .y_labels(n_rows)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .x_desc("Integration time (h)")
        .y_desc("Receiver diameter (m)")
        .draw()?;

    // log-scaled viridis-like hue sweep from blue (low) to yellow (ceiling)
    let span = (ceiling / color_lo).ln().max(f64::MIN_POSITIVE);
    chart.draw_series(panel.grid.indexed_iter().map(|((row, col), &bits)| {
        let level = if bits > 0.0 {
            ((bits / color_lo).ln() / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let hue = 0.7 - 0.55 * level;
        Rectangle::new(
            [(col, row), (col + 1, row + 1)],
            HSLColor(hue, 0.8, 0.35 + 0.25 * level).filled(),
        )
    }))?;

    chart.draw_series(
        panel
            .grid
            .indexed_iter()
            .filter(|(_, bits)| **bits >= ceiling)
            .map(|((row, col), _)| {
                Rectangle::new([(col, row), (col + 1, row + 1)], RED.stroke_width(2))
            }),
    )?;

    Ok(())
}
