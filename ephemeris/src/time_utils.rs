//! Time scale conversions.
//!
//! UTC is treated as UT1 throughout; the sub-second difference is far below
//! the ten-minute sampling used by the visibility calculators.

use crate::{EphemerisError, Result};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian date of the J2000.0 epoch
pub const J2000_JD: f64 = 2_451_545.0;

/// Seconds in a civil day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse a start instant from either a calendar date (`YYYY-MM-DD`, taken as
/// midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_utc(text: &str) -> Result<OffsetDateTime> {
    let trimmed = text.trim();
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(|dt| dt.to_offset(time::UtcOffset::UTC))
        .map_err(|e| EphemerisError::InvalidTime(format!("'{trimmed}': {e}")))
}

/// Julian date for an instant
pub fn julian_date(instant: OffsetDateTime) -> f64 {
    let unix_seconds = instant.unix_timestamp_nanos() as f64 / 1e9;
    unix_seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

/// Days elapsed since J2000.0
pub fn days_since_j2000(instant: OffsetDateTime) -> f64 {
    julian_date(instant) - J2000_JD
}

/// Greenwich mean sidereal time in radians, normalized to [0, 2π).
///
/// IAU 1982 expression in Julian centuries from J2000.0.
pub fn gmst(instant: OffsetDateTime) -> f64 {
    let t = days_since_j2000(instant) / 36_525.0;

    let gmst_sec = 67_310.548_41 + (876_600.0 * 3600.0 + 8_640_184.812_866) * t + 0.093_104 * t * t
        - 6.2e-6 * t * t * t;

    // 240 seconds of sidereal time per degree
    (gmst_sec / 240.0).to_radians().rem_euclid(std::f64::consts::TAU)
}

/// Local mean sidereal time in radians for an east-positive longitude.
pub fn local_sidereal_time(instant: OffsetDateTime, longitude_rad: f64) -> f64 {
    (gmst(instant) + longitude_rad).rem_euclid(std::f64::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use time::macros::datetime;

    #[test]
    fn test_julian_date_at_j2000() {
        let j2000 = datetime!(2000-01-01 12:00 UTC);
        assert_relative_eq!(julian_date(j2000), J2000_JD, epsilon = 1e-9);
        assert_relative_eq!(days_since_j2000(j2000), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gmst_at_j2000() {
        // 18h 41m 50.548s at J2000.0
        let expected_deg = (18.0 + 41.0 / 60.0 + 50.548_41 / 3600.0) * 15.0;
        let gmst_deg = gmst(datetime!(2000-01-01 12:00 UTC)).to_degrees();
        assert_relative_eq!(gmst_deg, expected_deg, epsilon = 1e-6);
    }

    #[test]
    fn test_sidereal_day_is_shorter_than_solar_day() {
        let t0 = datetime!(2038-04-03 00:00 UTC);
        let t1 = t0 + time::Duration::days(1);
        // Sidereal time advances ~3m56s (0.9856 deg) more than a full turn per solar day
        let advance = (gmst(t1) - gmst(t0)).rem_euclid(std::f64::consts::TAU).to_degrees();
        assert_relative_eq!(advance, 0.9856, epsilon = 1e-3);
    }

    #[test]
    fn test_local_sidereal_time_offsets_by_longitude() {
        let t = datetime!(2038-04-03 00:00 UTC);
        let lst = local_sidereal_time(t, 90.0_f64.to_radians());
        let expected = (gmst(t) + 90.0_f64.to_radians()).rem_euclid(std::f64::consts::TAU);
        assert_relative_eq!(lst, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_utc_formats() {
        let date_only = parse_utc("2038-04-03").unwrap();
        assert_eq!(date_only, datetime!(2038-04-03 00:00 UTC));

        let full = parse_utc("2038-04-03T06:30:00+02:00").unwrap();
        assert_eq!(full, datetime!(2038-04-03 04:30 UTC));
        assert_eq!(full.offset(), time::UtcOffset::UTC);

        assert!(matches!(
            parse_utc("April third"),
            Err(EphemerisError::InvalidTime(_))
        ));
    }
}
