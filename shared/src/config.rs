//! Mission constants document.
//!
//! A single YAML file carries the physical constants, mission parameters and
//! link-budget parameters. It is loaded once into a [`Constants`] value that
//! callers pass explicitly to every calculation needing it.
//!
//! ```yaml
//! physics:
//!   h: 6.62607015e-34
//!   c: 299792458.0
//! mission:
//!   sail_radii_m: [1.0]
//!   wavelengths_nm: [1064.0]
//!   array_diameters_km: [1.0, 10.0]
//! comms:
//!   wavelength_m: 1.064e-6
//!   lunar_receiver_diameters_m: [1.0, 10.0]
//!   integration_times_hours: [1.0, 10.0]
//!   dataset_bits_nominal: 1000000
//!   quantum_squeezing_gain_dB_range: [0.0, 6.0]
//!   doppler_betas: [0.2]
//! link_budget:
//!   transmit_power_w: 1000.0
//!   transmit_aperture_m: 1.0
//!   system_efficiency: 0.5
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name looked up relative to the working directory
pub const DEFAULT_CONSTANTS_FILE: &str = "constants.yaml";

/// Errors raised while loading the constants document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read constants from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse constants: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("constants document must be a mapping of sections")]
    NotAMapping,

    #[error("missing '{section}' section in constants document")]
    MissingSection { section: &'static str },

    #[error("invalid constant {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn default_meters_per_light_year() -> f64 {
    9.4607e15
}

fn default_quantum_loss_fraction() -> f64 {
    0.1
}

fn default_range_light_years() -> f64 {
    4.0
}

/// Fundamental physical constants (SI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConstants {
    /// Planck constant in J·s
    pub h: f64,
    /// Speed of light in m/s
    pub c: f64,
    #[serde(default = "default_meters_per_light_year")]
    pub meters_per_light_year: f64,
}

/// Phasing study parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionParameters {
    pub sail_radii_m: Vec<f64>,
    pub wavelengths_nm: Vec<f64>,
    pub array_diameters_km: Vec<f64>,
}

/// Communications study parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommsParameters {
    /// Emitted laser wavelength in meters
    pub wavelength_m: f64,
    pub lunar_receiver_diameters_m: Vec<f64>,
    pub integration_times_hours: Vec<f64>,
    /// Size of the dataset to return, in bits
    pub dataset_bits_nominal: u64,
    /// (min, max) squeezing gain in dB
    #[serde(rename = "quantum_squeezing_gain_dB_range")]
    pub quantum_squeezing_gain_db_range: [f64; 2],
    pub doppler_betas: Vec<f64>,
}

/// Transmitter and channel parameters for the optical link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkBudgetParameters {
    pub transmit_power_w: f64,
    /// Transmit aperture diameter in meters
    pub transmit_aperture_m: f64,
    pub system_efficiency: f64,
    /// Fraction of the squeezed channel lost in the optics
    #[serde(default = "default_quantum_loss_fraction")]
    pub quantum_loss_fraction: f64,
    #[serde(default = "default_range_light_years")]
    pub range_light_years: f64,
}

/// The full constants document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub physics: PhysicsConstants,
    pub mission: MissionParameters,
    pub comms: CommsParameters,
    pub link_budget: LinkBudgetParameters,
}

impl Constants {
    /// Top-level sections that must be present, checked in this order
    pub const REQUIRED_SECTIONS: [&'static str; 4] = ["physics", "mission", "comms", "link_budget"];

    /// Load and validate a constants file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded constants from {}", path.display());
        Self::parse(&text)
    }

    /// Parse and validate a constants document.
    ///
    /// Missing sections are reported by name before any field-level
    /// deserialization happens.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let sections = document.as_mapping().ok_or(ConfigError::NotAMapping)?;

        for section in Self::REQUIRED_SECTIONS {
            if !sections.contains_key(section) {
                return Err(ConfigError::MissingSection { section });
            }
        }

        let constants: Constants = serde_yaml::from_value(document)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Check physical plausibility of the loaded values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("physics.h", self.physics.h),
            ("physics.c", self.physics.c),
            (
                "physics.meters_per_light_year",
                self.physics.meters_per_light_year,
            ),
            ("comms.wavelength_m", self.comms.wavelength_m),
            ("link_budget.transmit_aperture_m", self.link_budget.transmit_aperture_m),
            ("link_budget.range_light_years", self.link_budget.range_light_years),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }

        let power = self.link_budget.transmit_power_w;
        if !(power.is_finite() && power >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "link_budget.transmit_power_w",
                reason: format!("must be non-negative and finite, got {power}"),
            });
        }

        let efficiency = self.link_budget.system_efficiency;
        if efficiency.is_nan() || efficiency <= 0.0 || efficiency > 1.0 {
            return Err(ConfigError::Invalid {
                field: "link_budget.system_efficiency",
                reason: format!("must lie in (0, 1], got {efficiency}"),
            });
        }

        let loss = self.link_budget.quantum_loss_fraction;
        if !(0.0..=1.0).contains(&loss) {
            return Err(ConfigError::Invalid {
                field: "link_budget.quantum_loss_fraction",
                reason: format!("must lie in [0, 1], got {loss}"),
            });
        }

        let [sq_min, sq_max] = self.comms.quantum_squeezing_gain_db_range;
        if sq_min > sq_max {
            return Err(ConfigError::Invalid {
                field: "comms.quantum_squeezing_gain_dB_range",
                reason: format!("min {sq_min} exceeds max {sq_max}"),
            });
        }

        let lists = [
            ("mission.sail_radii_m", self.mission.sail_radii_m.len()),
            ("mission.wavelengths_nm", self.mission.wavelengths_nm.len()),
            ("mission.array_diameters_km", self.mission.array_diameters_km.len()),
            (
                "comms.lunar_receiver_diameters_m",
                self.comms.lunar_receiver_diameters_m.len(),
            ),
            (
                "comms.integration_times_hours",
                self.comms.integration_times_hours.len(),
            ),
            ("comms.doppler_betas", self.comms.doppler_betas.len()),
        ];
        for (field, len) in lists {
            if len == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Distance of one light year in meters
    pub fn meters_per_light_year(&self) -> f64 {
        self.physics.meters_per_light_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const FIXTURE: &str = r#"
physics:
  h: 6.62607015e-34
  c: 299792458.0
mission:
  sail_radii_m: [1.0, 2.0]
  wavelengths_nm: [1064.0]
  array_diameters_km: [1.0, 10.0]
comms:
  wavelength_m: 1.064e-6
  lunar_receiver_diameters_m: [1.0, 10.0]
  integration_times_hours: [1.0, 10.0]
  dataset_bits_nominal: 1000000
  quantum_squeezing_gain_dB_range: [0.0, 6.0]
  doppler_betas: [0.2]
link_budget:
  transmit_power_w: 1000.0
  transmit_aperture_m: 1.0
  system_efficiency: 0.5
"#;

    #[test]
    fn test_parse_fixture_with_defaults() {
        let c = Constants::parse(FIXTURE).unwrap();
        assert_relative_eq!(c.physics.c, 299_792_458.0);
        assert_relative_eq!(c.physics.meters_per_light_year, 9.4607e15);
        assert_relative_eq!(c.link_budget.quantum_loss_fraction, 0.1);
        assert_relative_eq!(c.link_budget.range_light_years, 4.0);
        assert_eq!(c.comms.dataset_bits_nominal, 1_000_000);
        assert_eq!(c.comms.quantum_squeezing_gain_db_range, [0.0, 6.0]);
    }

    #[test]
    fn test_missing_section_is_named() {
        let without_comms: String = FIXTURE
            .lines()
            .filter(|l| {
                !(l.starts_with("comms:")
                    || l.starts_with("  wavelength_m")
                    || l.starts_with("  lunar_")
                    || l.starts_with("  integration_")
                    || l.starts_with("  dataset_")
                    || l.starts_with("  quantum_squeezing")
                    || l.starts_with("  doppler_"))
            })
            .collect::<Vec<_>>()
            .join("\n");

        match Constants::parse(&without_comms) {
            Err(ConfigError::MissingSection { section }) => assert_eq!(section, "comms"),
            other => panic!("expected missing comms section, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_section_message() {
        let err = Constants::parse("physics:\n  h: 1.0\n  c: 1.0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing 'mission' section in constants document"
        );
    }

    #[test]
    fn test_non_mapping_document() {
        assert!(matches!(
            Constants::parse("- 1\n- 2\n"),
            Err(ConfigError::NotAMapping)
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad = FIXTURE.replace("c: 299792458.0", "c: 0.0");
        assert!(matches!(
            Constants::parse(&bad),
            Err(ConfigError::Invalid { field: "physics.c", .. })
        ));

        let bad = FIXTURE.replace("[0.0, 6.0]", "[6.0, 0.0]");
        assert!(matches!(
            Constants::parse(&bad),
            Err(ConfigError::Invalid {
                field: "comms.quantum_squeezing_gain_dB_range",
                ..
            })
        ));
    }

    #[test]
    fn test_link_budget_power_and_efficiency_rejected() {
        for power in [".nan", ".inf", "-1.0"] {
            let bad = FIXTURE.replace("transmit_power_w: 1000.0", &format!("transmit_power_w: {power}"));
            assert!(
                matches!(
                    Constants::parse(&bad),
                    Err(ConfigError::Invalid { field: "link_budget.transmit_power_w", .. })
                ),
                "power {power} accepted"
            );
        }
        assert!(Constants::parse(&FIXTURE.replace("transmit_power_w: 1000.0", "transmit_power_w: 0.0")).is_ok());

        for efficiency in [".nan", "0.0", "1.5"] {
            let bad = FIXTURE.replace("system_efficiency: 0.5", &format!("system_efficiency: {efficiency}"));
            assert!(
                matches!(
                    Constants::parse(&bad),
                    Err(ConfigError::Invalid { field: "link_budget.system_efficiency", .. })
                ),
                "efficiency {efficiency} accepted"
            );
        }
        assert!(Constants::parse(&FIXTURE.replace("system_efficiency: 0.5", "system_efficiency: 1.0")).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        let c = Constants::load_from(file.path()).unwrap();
        assert_eq!(c.mission.array_diameters_km, vec![1.0, 10.0]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(
            Constants::load_from(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_repository_constants_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join(DEFAULT_CONSTANTS_FILE);
        let c = Constants::load_from(&path).unwrap();
        assert!(c.comms.dataset_bits_nominal > 0);
    }
}
