//! Positions of celestial bodies.

use crate::time_utils::days_since_j2000;
use crate::{CelestialCoordinate, CelestialObject, Result};
use time::OffsetDateTime;

/// The Sun, using the Astronomical Almanac low-precision formulae.
///
/// Good to about 0.01 degree between 1950 and 2050, which is ample for
/// deciding whether the Sun is above the horizon.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sun;

impl Sun {
    /// Apparent geocentric ecliptic longitude and obliquity, both in radians
    fn ecliptic_longitude_and_obliquity(instant: OffsetDateTime) -> (f64, f64) {
        let n = days_since_j2000(instant);

        let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
        let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();

        let lambda = mean_longitude
            + 1.915 * mean_anomaly.sin()
            + 0.020 * (2.0 * mean_anomaly).sin();
        let epsilon = 23.439 - 4.0e-7 * n;

        (lambda.to_radians(), epsilon.to_radians())
    }
}

impl CelestialObject for Sun {
    fn position_at(&self, time: OffsetDateTime) -> Result<CelestialCoordinate> {
        let (lambda, epsilon) = Self::ecliptic_longitude_and_obliquity(time);

        let ra = (epsilon.cos() * lambda.sin())
            .atan2(lambda.cos())
            .rem_euclid(std::f64::consts::TAU);
        let dec = (epsilon.sin() * lambda.sin()).asin();

        Ok(CelestialCoordinate { ra, dec })
    }
}

/// A target with a fixed equatorial position (no proper motion or parallax)
#[derive(Debug, Clone, Copy)]
pub struct FixedTarget {
    pub coordinate: CelestialCoordinate,
}

impl FixedTarget {
    pub fn new(coordinate: CelestialCoordinate) -> Self {
        Self { coordinate }
    }
}

impl CelestialObject for FixedTarget {
    fn position_at(&self, _time: OffsetDateTime) -> Result<CelestialCoordinate> {
        Ok(self.coordinate)
    }
}
