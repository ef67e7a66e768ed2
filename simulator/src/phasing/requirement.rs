//! Path-length stability requirement for a phased transmitter array.
//!
//! A path-length error δL across a baseline B tilts the wavefront by
//! δθ ≈ δL / B, which walks the spot by δx = δθ·d at distance d. Keeping the
//! spot within half the sail radius gives δL ≤ 0.5·R_sail·B / d.

use super::{ensure_positive, PhasingError};
use shared::config::Constants;
use shared::units::{Length, LengthExt};

/// Distance used for the frontier figure (0.1 million km)
pub const FRONTIER_DISTANCE_M: f64 = 1e8;

/// Required RMS path-length stability in meters.
///
/// The wavelength does not enter the geometric requirement; it is validated
/// and accepted so call sites read the same as the rest of the phasing API.
pub fn required_path_length_stability(
    wavelength_m: f64,
    sail_radius_m: f64,
    distance_m: f64,
    baseline_m: f64,
) -> Result<f64, PhasingError> {
    ensure_positive("wavelength_m", wavelength_m)?;
    let sail_radius_m = ensure_positive("sail_radius_m", sail_radius_m)?;
    let distance_m = ensure_positive("distance_m", distance_m)?;
    let baseline_m = ensure_positive("baseline_m", baseline_m)?;

    Ok(0.5 * sail_radius_m * baseline_m / distance_m)
}

/// Required stability across the configured array diameters
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseErrorFrontier {
    pub sail_radius_m: f64,
    pub wavelength_m: f64,
    pub distance_m: f64,
    pub array_diameters_km: Vec<f64>,
    /// Required RMS path-length stability in picometers, one per diameter
    pub required_stability_pm: Vec<f64>,
}

/// Evaluate the requirement for every configured array diameter.
///
/// Uses the smallest configured sail radius and the first configured
/// wavelength.
pub fn phase_error_frontier(
    constants: &Constants,
    distance_m: f64,
) -> Result<PhaseErrorFrontier, PhasingError> {
    let mission = &constants.mission;

    let sail_radius_m = mission
        .sail_radii_m
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or(PhasingError::MissingMissionValue("sail radius"))?;
    let wavelength_nm = *mission
        .wavelengths_nm
        .first()
        .ok_or(PhasingError::MissingMissionValue("wavelength"))?;
    let wavelength_m = Length::from_nanometers(wavelength_nm).as_meters();

    let required_stability_pm = mission
        .array_diameters_km
        .iter()
        .map(|&km| {
            let baseline_m = Length::from_kilometers(km).as_meters();
            required_path_length_stability(wavelength_m, sail_radius_m, distance_m, baseline_m)
                .map(|dl| Length::from_meters(dl).as_picometers())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PhaseErrorFrontier {
        sail_radius_m,
        wavelength_m,
        distance_m,
        array_diameters_km: mission.array_diameters_km.clone(),
        required_stability_pm,
    })
}
