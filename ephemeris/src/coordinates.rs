//! Equatorial to horizontal coordinate transforms for a receiver site.

use crate::time_utils::local_sidereal_time;
use crate::{CelestialCoordinate, EphemerisError, Result};
use time::OffsetDateTime;

/// Geodetic position of an observing site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticLocation {
    /// Latitude in radians, north positive
    pub latitude: f64,
    /// Longitude in radians, east positive
    pub longitude: f64,
    /// Height above the reference surface in meters
    pub height_m: f64,
}

impl GeodeticLocation {
    /// Create a location from degrees, validating the latitude range.
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> Result<Self> {
        if !latitude_deg.is_finite() || !longitude_deg.is_finite() || !height_m.is_finite() {
            return Err(EphemerisError::InvalidLocation(format!(
                "non-finite location: ({latitude_deg}, {longitude_deg}, {height_m})"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(EphemerisError::InvalidLocation(format!(
                "latitude {latitude_deg} outside [-90, 90] degrees"
            )));
        }
        Ok(Self {
            latitude: latitude_deg.to_radians(),
            longitude: longitude_deg.to_radians(),
            height_m,
        })
    }

    /// Equator, prime meridian, zero height
    pub fn equatorial_origin() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            height_m: 0.0,
        }
    }
}

impl Default for GeodeticLocation {
    fn default() -> Self {
        Self::equatorial_origin()
    }
}

/// Local horizontal coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinate {
    /// Altitude above the geometric horizon in radians
    pub altitude: f64,
    /// Azimuth in radians, measured from north through east, in [0, 2π)
    pub azimuth: f64,
}

impl HorizontalCoordinate {
    pub fn altitude_degrees(&self) -> f64 {
        self.altitude.to_degrees()
    }
}

/// Transform an equatorial position to altitude/azimuth at a site.
///
/// Geometric only: no refraction, aberration or diurnal parallax.
pub fn equatorial_to_horizontal(
    position: &CelestialCoordinate,
    location: &GeodeticLocation,
    instant: OffsetDateTime,
) -> HorizontalCoordinate {
    let hour_angle = local_sidereal_time(instant, location.longitude) - position.ra;
    let (sin_h, cos_h) = hour_angle.sin_cos();
    let (sin_dec, cos_dec) = position.dec.sin_cos();
    let (sin_lat, cos_lat) = location.latitude.sin_cos();

    let sin_alt = (sin_lat * sin_dec + cos_lat * cos_dec * cos_h).clamp(-1.0, 1.0);
    let altitude = sin_alt.asin();

    let azimuth = (-cos_dec * sin_h)
        .atan2(sin_dec * cos_lat - cos_dec * sin_lat * cos_h)
        .rem_euclid(std::f64::consts::TAU);

    HorizontalCoordinate { altitude, azimuth }
}
