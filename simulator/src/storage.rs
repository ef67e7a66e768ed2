//! WP3 energy storage trade.
//!
//! Mass of storage needed to deliver a given beam energy, for a handful of
//! candidate technologies with fixed specific energy and round-trip
//! efficiency.

use std::fmt;

use thiserror::Error;

/// Rotor tensile strength assumed for the flywheel option, in Pa
pub const FLYWHEEL_TENSILE_STRENGTH_PA: f64 = 1e9;
/// Rotor density assumed for the flywheel option, in kg/m³
pub const FLYWHEEL_DENSITY_KG_M3: f64 = 7800.0;

#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    #[error("specific energy must be positive, got {0} MJ/kg")]
    NonPositiveSpecificEnergy(f64),

    #[error("efficiency must lie in (0, 1], got {0}")]
    InvalidEfficiency(f64),

    #[error("energy must be finite and non-negative, got {0} TJ")]
    InvalidEnergy(f64),

    #[error("density must be positive, got {0} kg/m³")]
    NonPositiveDensity(f64),
}

/// Candidate storage technologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTechnology {
    Flywheel,
    Thermal,
    Smes,
}

impl StorageTechnology {
    pub const ALL: [StorageTechnology; 3] = [Self::Flywheel, Self::Thermal, Self::Smes];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flywheel => "flywheel",
            Self::Thermal => "thermal",
            Self::Smes => "SMES",
        }
    }

    /// Specific energy in MJ/kg
    pub fn specific_energy_mj_per_kg(&self) -> f64 {
        match self {
            Self::Flywheel => 0.5 * FLYWHEEL_TENSILE_STRENGTH_PA / FLYWHEEL_DENSITY_KG_M3 / 1e6,
            Self::Thermal => 1.5,
            Self::Smes => 10.0,
        }
    }

    pub fn efficiency(&self) -> f64 {
        match self {
            Self::Flywheel => 0.9,
            Self::Thermal => 0.85,
            Self::Smes => 0.95,
        }
    }
}

impl fmt::Display for StorageTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One (technology, energy) cell of the trade table
#[derive(Debug, Clone, PartialEq)]
pub struct StorageTradeRow {
    pub option: StorageTechnology,
    pub energy_tj: f64,
    pub efficiency: f64,
    pub mass_kg: f64,
}

/// Specific energy of a thin-rim flywheel, 0.5·σ/ρ, in MJ/kg.
pub fn flywheel_specific_energy_mj_per_kg(
    tensile_strength_pa: f64,
    density_kg_m3: f64,
) -> Result<f64, StorageError> {
    if density_kg_m3.is_nan() || density_kg_m3 <= 0.0 {
        return Err(StorageError::NonPositiveDensity(density_kg_m3));
    }
    Ok(0.5 * tensile_strength_pa / density_kg_m3 / 1e6)
}

/// Storage mass in kg needed to deliver `energy_tj` terajoules.
pub fn total_mass_for_energy(
    energy_tj: f64,
    specific_energy_mj_per_kg: f64,
    efficiency: f64,
) -> Result<f64, StorageError> {
    if specific_energy_mj_per_kg.is_nan() || specific_energy_mj_per_kg <= 0.0 {
        return Err(StorageError::NonPositiveSpecificEnergy(specific_energy_mj_per_kg));
    }
    if efficiency.is_nan() || efficiency <= 0.0 || efficiency > 1.0 {
        return Err(StorageError::InvalidEfficiency(efficiency));
    }
    if !energy_tj.is_finite() || energy_tj < 0.0 {
        return Err(StorageError::InvalidEnergy(energy_tj));
    }
    // TJ -> MJ is 1e6, so mass = E·1e6 / (e·η) kg with e in MJ/kg
    Ok(energy_tj * 1e6 / (specific_energy_mj_per_kg * efficiency))
}

/// Build the trade table: for each energy, one row per technology in
/// [`StorageTechnology::ALL`] order.
pub fn compare_storage_options(energies_tj: &[f64]) -> Result<Vec<StorageTradeRow>, StorageError> {
    let mut rows = Vec::with_capacity(energies_tj.len() * StorageTechnology::ALL.len());
    for &energy_tj in energies_tj {
        for option in StorageTechnology::ALL {
            let mass_kg = total_mass_for_energy(
                energy_tj,
                option.specific_energy_mj_per_kg(),
                option.efficiency(),
            )?;
            rows.push(StorageTradeRow {
                option,
                energy_tj,
                efficiency: option.efficiency(),
                mass_kg,
            });
        }
    }
    Ok(rows)
}

/// Rows meeting an energy floor, an efficiency floor and a mass ceiling.
pub fn viable_options(
    rows: &[StorageTradeRow],
    min_energy_tj: f64,
    min_efficiency: f64,
    max_mass_kg: f64,
) -> Vec<&StorageTradeRow> {
    rows.iter()
        .filter(|r| {
            r.energy_tj >= min_energy_tj && r.efficiency >= min_efficiency && r.mass_kg < max_mass_kg
        })
        .collect()
}
