//! Print daily coherent integration windows for a return-link receiver
//!
//! Usage:
//! ```
//! cargo run --bin integration_windows -- --site moon --days 7
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ephemeris::GeodeticLocation;
use simulator::comms::{coherent_integration_time, Site};
use simulator::shared_args::{parse_location, parse_site};

/// Compute coherent integration windows
#[derive(Parser, Debug)]
#[command(name = "integration_windows")]
struct Cli {
    /// Receiver site: earth or moon
    #[arg(long, value_parser = parse_site)]
    site: Site,

    /// Source speed as a fraction of c
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    beta: f64,

    /// First day of the observation period (YYYY-MM-DD, UTC)
    #[arg(long, default_value = "2038-04-03")]
    flyby_date: String,

    /// Target right ascension in degrees
    #[arg(long, default_value_t = 180.0, allow_negative_numbers = true)]
    ra: f64,

    /// Target declination in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    dec: f64,

    /// Number of days to report
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Minimum target elevation in degrees
    #[arg(long = "min-el", default_value_t = 20.0, allow_negative_numbers = true)]
    min_el: f64,

    /// Receiver location as "latitude,longitude" in degrees (default 0,0)
    #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
    location: Option<GeodeticLocation>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let windows = coherent_integration_time(
        cli.site,
        cli.beta,
        &cli.flyby_date,
        (cli.ra, cli.dec),
        cli.days,
        cli.min_el,
        cli.location,
    )
    .with_context(|| format!("computing integration windows for site {}", cli.site))?;

    for (day, seconds) in windows.days.iter().zip(&windows.integration_seconds) {
        println!("{day}: {:.2} h of integration", seconds / 3600.0);
    }

    Ok(())
}
