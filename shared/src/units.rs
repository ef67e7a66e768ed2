//! Type-safe physical units for the study calculators
//!
//! Thin extension traits over `uom` so configuration values given in
//! convenient units (nm, km, hours) convert to SI without hand-written
//! scale factors.

use uom::si::length::{kilometer, meter, nanometer, picometer};
use uom::si::time::{hour, second};

/// Type alias for length measurements
pub type Length = uom::si::f64::Length;

/// Type alias for time intervals
pub type Time = uom::si::f64::Time;

/// Extension trait for length conversions used by the phasing and link models
pub trait LengthExt {
    /// Create length from nanometers (wavelengths)
    fn from_nanometers(nm: f64) -> Self;

    /// Create length from kilometers (array baselines)
    fn from_kilometers(km: f64) -> Self;

    /// Get length in picometers (path-length stability)
    fn as_picometers(&self) -> f64;

    /// Create length from meters
    fn from_meters(m: f64) -> Self;

    /// Get length in meters
    fn as_meters(&self) -> f64;
}

/// Extension trait for integration-time conversions
pub trait TimeExt {
    /// Create a time interval from hours
    fn from_hours(hours: f64) -> Self;

    /// Get the interval in seconds
    fn as_seconds(&self) -> f64;
}

impl LengthExt for Length {
    fn from_nanometers(nm: f64) -> Self {
        Length::new::<nanometer>(nm)
    }

    fn from_kilometers(km: f64) -> Self {
        Length::new::<kilometer>(km)
    }

    fn as_picometers(&self) -> f64 {
        self.get::<picometer>()
    }

    fn from_meters(m: f64) -> Self {
        Length::new::<meter>(m)
    }

    fn as_meters(&self) -> f64 {
        self.get::<meter>()
    }
}

impl TimeExt for Time {
    fn from_hours(hours: f64) -> Self {
        Time::new::<hour>(hours)
    }

    fn as_seconds(&self) -> f64 {
        self.get::<second>()
    }
}
