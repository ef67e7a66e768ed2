//! Integration window scenarios around the 2038 flyby

use approx::assert_abs_diff_eq;
use ephemeris::GeodeticLocation;
use simulator::comms::{coherent_integration_time, IntegrationWindows, Site};

fn scenario(site: &str) -> IntegrationWindows {
    let site: Site = site.parse().unwrap();
    coherent_integration_time(site, 0.2, "2038-04-03", (180.0, 0.0), 7, 20.0, None).unwrap()
}

#[test]
fn test_sequences_have_one_entry_per_day() {
    for site in ["earth", "moon"] {
        let w = scenario(site);
        assert_eq!(w.days.len(), 7);
        assert_eq!(w.integration_seconds.len(), 7);
        assert_eq!(w.duty_cycle.len(), 7);
        assert_eq!(w.days[0], "2038-04-03");
        assert_eq!(w.days[6], "2038-04-09");
    }
}

#[test]
fn test_duty_cycle_is_seconds_over_a_day() {
    for site in ["earth", "moon"] {
        let w = scenario(site);
        for (duty, seconds) in w.duty_cycle.iter().zip(&w.integration_seconds) {
            assert_abs_diff_eq!(*duty, seconds / 86_400.0, epsilon = 1e-6);
            assert!((0.0..=1.0).contains(duty));
        }
    }
}

#[test]
fn test_lunar_site_beats_terrestrial_site() {
    let earth = scenario("earth").mean_duty_cycle().unwrap();
    let moon = scenario("moon").mean_duty_cycle().unwrap();
    assert!(moon > earth, "moon {moon} vs earth {earth}");
}

#[test]
fn test_unknown_site_is_rejected() {
    assert!("mars".parse::<Site>().is_err());
}

#[test]
fn test_polar_site_never_sees_southern_target() {
    let north_pole = GeodeticLocation::from_degrees(89.0, 0.0, 0.0).unwrap();
    let w = coherent_integration_time(
        Site::Earth,
        0.2,
        "2038-04-03",
        (180.0, -45.0),
        2,
        20.0,
        Some(north_pole),
    )
    .unwrap();
    assert!(w.integration_seconds.iter().all(|&s| s == 0.0));
}
