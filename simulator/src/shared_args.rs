use std::path::PathBuf;

use clap::Args;
use ephemeris::GeodeticLocation;
use shared::config::{ConfigError, Constants, DEFAULT_CONSTANTS_FILE};

use crate::comms::Site;

/// Parse a site identifier ("earth" or "moon", any case)
pub fn parse_site(s: &str) -> Result<Site, String> {
    s.parse::<Site>().map_err(|e| e.to_string())
}

/// Parse a location string in format "latitude,longitude" (degrees)
pub fn parse_location(s: &str) -> Result<GeodeticLocation, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Location must be in format 'latitude,longitude'".to_string());
    }

    let latitude = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid latitude value".to_string())?;
    let longitude = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid longitude value".to_string())?;

    GeodeticLocation::from_degrees(latitude, longitude, 0.0).map_err(|e| e.to_string())
}

/// Constants file argument shared by the study binaries
#[derive(Args, Debug, Clone)]
pub struct ConstantsArgs {
    /// Path to the mission constants YAML file
    #[arg(long, default_value = DEFAULT_CONSTANTS_FILE)]
    pub constants: PathBuf,
}

impl ConstantsArgs {
    pub fn load(&self) -> Result<Constants, ConfigError> {
        Constants::load_from(&self.constants)
    }
}
