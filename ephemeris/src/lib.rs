//! Ephemeris calculation library for astronomical bodies
//!
//! This crate provides the sky geometry needed to decide when a receiver
//! site can see a target: time scales (Julian date, sidereal time), a
//! low-precision solar position, and the equatorial to horizontal transform
//! for a geodetic site.

use thiserror::Error;
use time::OffsetDateTime;

pub mod celestial;
pub mod coordinates;
pub mod time_utils;

pub use celestial::{FixedTarget, Sun};
pub use coordinates::{equatorial_to_horizontal, GeodeticLocation, HorizontalCoordinate};

/// Represents a point in the celestial sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialCoordinate {
    /// Right ascension in radians
    pub ra: f64,
    /// Declination in radians
    pub dec: f64,
}

impl CelestialCoordinate {
    /// Build a coordinate from right ascension and declination in degrees.
    ///
    /// Right ascension is wrapped into [0, 360). Declination must lie in
    /// [-90, 90].
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Result<Self> {
        if !ra_deg.is_finite() || !dec_deg.is_finite() {
            return Err(EphemerisError::InvalidCoordinate(format!(
                "non-finite ra/dec: ({ra_deg}, {dec_deg})"
            )));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(EphemerisError::InvalidCoordinate(format!(
                "declination {dec_deg} outside [-90, 90] degrees"
            )));
        }
        Ok(Self {
            ra: ra_deg.rem_euclid(360.0).to_radians(),
            dec: dec_deg.to_radians(),
        })
    }

    /// Right ascension in degrees
    pub fn ra_degrees(&self) -> f64 {
        self.ra.to_degrees()
    }

    /// Declination in degrees
    pub fn dec_degrees(&self) -> f64 {
        self.dec.to_degrees()
    }
}

/// Error types for ephemeris calculations
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

pub type Result<T> = std::result::Result<T, EphemerisError>;

/// Trait for objects that have a position in the sky
pub trait CelestialObject {
    /// Get the position of the object at a specific time
    fn position_at(&self, time: OffsetDateTime) -> Result<CelestialCoordinate>;
}
