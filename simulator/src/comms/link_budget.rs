//! Photon-counting link budget for the return link.
//!
//! The transmitter is modeled as a diffraction-limited Gaussian beam. The
//! received photon rate follows from the fraction of the beam footprint
//! captured by the receiver aperture at the link range.

use std::f64::consts::PI;

use log::{debug, warn};
use ndarray::Array2;
use shared::config::{Constants, PhysicsConstants};
use shared::units::{Time, TimeExt};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LinkBudgetError {
    #[error("|beta| must be below 1, got {0}")]
    SuperluminalBeta(f64),

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("transmit power must be non-negative, got {0} W")]
    NegativePower(f64),

    #[error("dataset size must be positive")]
    EmptyDataset,

    #[error("integration time must be non-negative, got {0} h")]
    NegativeIntegrationTime(f64),
}

fn ensure_positive(name: &'static str, value: f64) -> Result<f64, LinkBudgetError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LinkBudgetError::NonPositive { name, value })
    }
}

/// Observed frequency of light emitted at `nu_emit_hz` by a source receding
/// at `beta`.
///
/// `nu_obs = nu_emit / (gamma·(1 + beta))`. Negative beta (approach) gives a
/// blueshift.
pub fn doppler_shift_emitted_to_observed(nu_emit_hz: f64, beta: f64) -> Result<f64, LinkBudgetError> {
    if !beta.is_finite() || beta.abs() >= 1.0 {
        return Err(LinkBudgetError::SuperluminalBeta(beta));
    }
    let gamma = 1.0 / (1.0 - beta * beta).sqrt();
    Ok(nu_emit_hz / (gamma * (1.0 + beta)))
}

/// Expected photon rate (photons/s) at the receiver.
///
/// # Arguments
/// * `physics` - Planck constant and speed of light
/// * `transmit_power_w` - Laser power at the transmitter
/// * `wavelength_m` - Wavelength seen by the receiver
/// * `transmit_diameter_m` - Transmit aperture diameter (beam waist = D/2)
/// * `receive_diameter_m` - Receive aperture diameter
/// * `range_m` - Link distance
/// * `system_efficiency` - End-to-end optical efficiency
pub fn photon_count_rx(
    physics: &PhysicsConstants,
    transmit_power_w: f64,
    wavelength_m: f64,
    transmit_diameter_m: f64,
    receive_diameter_m: f64,
    range_m: f64,
    system_efficiency: f64,
) -> Result<f64, LinkBudgetError> {
    ensure_positive("wavelength_m", wavelength_m)?;
    ensure_positive("transmit_diameter_m", transmit_diameter_m)?;
    ensure_positive("receive_diameter_m", receive_diameter_m)?;
    ensure_positive("range_m", range_m)?;
    if transmit_power_w.is_nan() || transmit_power_w < 0.0 {
        return Err(LinkBudgetError::NegativePower(transmit_power_w));
    }

    let waist = transmit_diameter_m / 2.0;
    let divergence = wavelength_m / (PI * waist);
    let beam_radius = divergence * range_m;
    let beam_area = PI * beam_radius * beam_radius;
    let receive_area = PI * (receive_diameter_m / 2.0).powi(2);

    let received_power = transmit_power_w * system_efficiency * receive_area / beam_area;
    let photon_energy = physics.h * physics.c / wavelength_m;
    Ok(received_power / photon_energy)
}

/// Convert a gain in dB to a linear factor
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Transmitter and channel description for the return link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBudget {
    pub physics: PhysicsConstants,
    pub transmit_power_w: f64,
    pub transmit_aperture_m: f64,
    pub system_efficiency: f64,
    /// Optical loss applied to the squeezed channel
    pub quantum_loss_fraction: f64,
    /// Emitted wavelength in meters
    pub wavelength_m: f64,
    pub range_m: f64,
}

impl LinkBudget {
    pub fn from_constants(constants: &Constants) -> Self {
        let link = &constants.link_budget;
        Self {
            physics: constants.physics.clone(),
            transmit_power_w: link.transmit_power_w,
            transmit_aperture_m: link.transmit_aperture_m,
            system_efficiency: link.system_efficiency,
            quantum_loss_fraction: link.quantum_loss_fraction,
            wavelength_m: constants.comms.wavelength_m,
            range_m: link.range_light_years * constants.meters_per_light_year(),
        }
    }

    /// Wavelength received from a source receding at `beta`
    pub fn observed_wavelength(&self, beta: f64) -> Result<f64, LinkBudgetError> {
        let c = self.physics.c;
        let nu_obs = doppler_shift_emitted_to_observed(c / self.wavelength_m, beta)?;
        Ok(c / nu_obs)
    }

    /// Combined coding and squeezing gain after quantum optical loss
    pub fn effective_gain(&self, coding_gain_db: f64, squeezing_gain_db: f64) -> f64 {
        db_to_linear(coding_gain_db)
            * db_to_linear(squeezing_gain_db)
            * (1.0 - self.quantum_loss_fraction)
    }

    /// Photon rate into a receiver of the given diameter at the observed
    /// wavelength
    pub fn photon_rate(&self, receive_diameter_m: f64, wavelength_m: f64) -> Result<f64, LinkBudgetError> {
        photon_count_rx(
            &self.physics,
            self.transmit_power_w,
            wavelength_m,
            self.transmit_aperture_m,
            receive_diameter_m,
            self.range_m,
            self.system_efficiency,
        )
    }

    /// Bits returned for every (receiver diameter, integration time) pair.
    ///
    /// Rows follow `receive_diameters_m`, columns follow
    /// `integration_times_hours`. Every cell is clamped to `dataset_bits`.
    pub fn bits_home_grid(
        &self,
        dataset_bits: u64,
        receive_diameters_m: &[f64],
        integration_times_hours: &[f64],
        beta: f64,
        coding_gain_db: f64,
        squeezing_gain_db: f64,
    ) -> Result<Array2<f64>, LinkBudgetError> {
        if dataset_bits == 0 {
            return Err(LinkBudgetError::EmptyDataset);
        }
        let ceiling = dataset_bits as f64;

        let wavelength_obs = self.observed_wavelength(beta)?;
        let gain = self.effective_gain(coding_gain_db, squeezing_gain_db);
        debug!(
            "bits home: beta={beta}, lambda_obs={wavelength_obs:.4e} m, gain={gain:.3}, range={:.3e} m",
            self.range_m
        );

        let mut grid = Array2::zeros((receive_diameters_m.len(), integration_times_hours.len()));
        for (i, &diameter) in receive_diameters_m.iter().enumerate() {
            let rate = self.photon_rate(diameter, wavelength_obs)?;
            for (j, &hours) in integration_times_hours.iter().enumerate() {
                if hours.is_nan() || hours < 0.0 {
                    return Err(LinkBudgetError::NegativeIntegrationTime(hours));
                }
                let seconds = Time::from_hours(hours).as_seconds();
                grid[[i, j]] = (rate * seconds * gain).min(ceiling);
            }
        }

        if !grid.is_empty() && grid.iter().all(|&bits| bits >= ceiling) {
            warn!("every bits-home cell is clamped to the {dataset_bits}-bit dataset ceiling");
        }

        Ok(grid)
    }
}

/// Bits-returned grid for the link described by `constants`.
///
/// Convenience wrapper over [`LinkBudget::bits_home_grid`].
pub fn bits_home_grid(
    constants: &Constants,
    dataset_bits: u64,
    receive_diameters_m: &[f64],
    integration_times_hours: &[f64],
    beta: f64,
    coding_gain_db: f64,
    squeezing_gain_db: f64,
) -> Result<Array2<f64>, LinkBudgetError> {
    LinkBudget::from_constants(constants).bits_home_grid(
        dataset_bits,
        receive_diameters_m,
        integration_times_hours,
        beta,
        coding_gain_db,
        squeezing_gain_db,
    )
}
