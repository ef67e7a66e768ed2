//! Daily coherent integration windows for a return-link receiver.
//!
//! Visibility is sampled on a 10-minute grid across the observation period
//! and bucketed into UTC days starting at the flyby date.
//!
//! The two sites use different models on purpose:
//! - Earth: each step needs the target above the elevation mask and the Sun
//!   below the horizon.
//! - Moon: the target's visibility at the start instant holds for the whole
//!   period (a lunar day is about a month long), and the accumulated time is
//!   discounted by [`MOON_INTEGRATION_REDUCTION_FACTOR`] for Earth occlusion
//!   and local topography.

use std::fmt;
use std::str::FromStr;

use ephemeris::time_utils::{parse_utc, SECONDS_PER_DAY};
use ephemeris::{
    equatorial_to_horizontal, CelestialCoordinate, CelestialObject, EphemerisError, FixedTarget,
    GeodeticLocation, Sun,
};
use log::debug;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Fraction of lunar visible time usable for integration
pub const MOON_INTEGRATION_REDUCTION_FACTOR: f64 = 0.9;

/// Visibility sampling cadence in seconds
pub const STEP_SECONDS: i64 = 600;

const STEPS_PER_DAY: usize = (SECONDS_PER_DAY as i64 / STEP_SECONDS) as usize;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("site must be 'earth' or 'moon', got '{0}'")]
    UnknownSite(String),

    #[error("|beta| must be below 1, got {0}")]
    SuperluminalBeta(f64),

    #[error("minimum elevation must lie in [-90, 90] degrees, got {0}")]
    InvalidElevation(f64),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

/// Receiver site class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Earth,
    Moon,
}

impl FromStr for Site {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earth" => Ok(Site::Earth),
            "moon" => Ok(Site::Moon),
            _ => Err(WindowError::UnknownSite(s.to_string())),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Earth => f.write_str("earth"),
            Site::Moon => f.write_str("moon"),
        }
    }
}

/// Per-day integration windows; all three vectors have one entry per day
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationWindows {
    /// ISO calendar date of each day (`YYYY-MM-DD`)
    pub days: Vec<String>,
    pub integration_seconds: Vec<f64>,
    /// Integration seconds over 86400
    pub duty_cycle: Vec<f64>,
}

impl IntegrationWindows {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn mean_duty_cycle(&self) -> Option<f64> {
        shared::algo::mean(&self.duty_cycle)
    }
}

fn is_target_visible(
    target: &FixedTarget,
    location: &GeodeticLocation,
    instant: OffsetDateTime,
    min_elevation_deg: f64,
) -> Result<bool, WindowError> {
    let position = target.position_at(instant)?;
    let horizontal = equatorial_to_horizontal(&position, location, instant);
    Ok(horizontal.altitude_degrees() >= min_elevation_deg)
}

fn is_night(location: &GeodeticLocation, instant: OffsetDateTime) -> Result<bool, WindowError> {
    let sun = Sun.position_at(instant)?;
    Ok(equatorial_to_horizontal(&sun, location, instant).altitude < 0.0)
}

/// Daily coherent integration time for a receiver at `site`.
///
/// # Arguments
/// * `site` - Earth or Moon receiver
/// * `beta` - Source speed as a fraction of c; checked but does not alter
///   the geometry
/// * `flyby_date` - Start of the period, `YYYY-MM-DD` (midnight UTC) or RFC 3339
/// * `target_ra_dec` - Target right ascension and declination in degrees
/// * `duration_days` - Number of days to report
/// * `min_elevation_deg` - Elevation mask
/// * `location` - Receiver position; defaults to latitude 0, longitude 0
pub fn coherent_integration_time(
    site: Site,
    beta: f64,
    flyby_date: &str,
    target_ra_dec: (f64, f64),
    duration_days: u32,
    min_elevation_deg: f64,
    location: Option<GeodeticLocation>,
) -> Result<IntegrationWindows, WindowError> {
    if !beta.is_finite() || beta.abs() >= 1.0 {
        return Err(WindowError::SuperluminalBeta(beta));
    }
    if !(-90.0..=90.0).contains(&min_elevation_deg) {
        return Err(WindowError::InvalidElevation(min_elevation_deg));
    }

    let start = parse_utc(flyby_date)?;
    let target = FixedTarget::new(CelestialCoordinate::from_degrees(
        target_ra_dec.0,
        target_ra_dec.1,
    )?);
    let location = location.unwrap_or_default();

    debug!(
        "integration windows: site={site}, start={start}, days={duration_days}, ra={}, dec={}, min_el={min_elevation_deg}",
        target_ra_dec.0, target_ra_dec.1
    );

    let visible_at_start = match site {
        Site::Moon => is_target_visible(&target, &location, start, min_elevation_deg)?,
        Site::Earth => false,
    };

    let days_count = duration_days as usize;
    let mut days = Vec::with_capacity(days_count);
    let mut integration_seconds = Vec::with_capacity(days_count);

    for day in 0..days_count {
        let day_start = start + Duration::days(day as i64);

        let visible_steps = match site {
            Site::Earth => {
                let mut count = 0usize;
                for step in 0..STEPS_PER_DAY {
                    let instant = day_start + Duration::seconds(step as i64 * STEP_SECONDS);
                    if is_target_visible(&target, &location, instant, min_elevation_deg)?
                        && is_night(&location, instant)?
                    {
                        count += 1;
                    }
                }
                count
            }
            Site::Moon if visible_at_start => STEPS_PER_DAY,
            Site::Moon => 0,
        };

        let mut seconds = (visible_steps as i64 * STEP_SECONDS) as f64;
        if site == Site::Moon {
            seconds *= MOON_INTEGRATION_REDUCTION_FACTOR;
        }

        days.push(day_start.date().to_string());
        integration_seconds.push(seconds);
    }

    let duty_cycle = integration_seconds
        .iter()
        .map(|&s| s / SECONDS_PER_DAY)
        .collect();

    Ok(IntegrationWindows {
        days,
        integration_seconds,
        duty_cycle,
    })
}
