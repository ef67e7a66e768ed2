//! Closed-loop phasing control simulation.
//!
//! Path-length jitter described by a PSD is approximated as white noise
//! sampled at the Nyquist rate of the highest PSD frequency. A single-pole
//! low-pass controller tracks the jitter; whatever it fails to track is the
//! residual path error, which tilts the beam across the baseline and walks
//! the spot at the target distance.

use super::{ensure_positive, PhasingError};
use std::mem::size_of;

use log::debug;
use ndarray::Array2;
use rand_distr::{Distribution, Normal};
use shared::algo::{process_rows_in_parallel, rms, OnePoleLowPass};

/// Paired frequency / PSD magnitude samples describing path-length jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct PsdSamples {
    /// Frequencies in Hz
    frequencies: Vec<f64>,
    /// Power spectral density in m²/Hz
    magnitudes: Vec<f64>,
}

impl PsdSamples {
    /// Validate and wrap PSD samples.
    ///
    /// Frequencies must be finite and non-negative with a positive maximum;
    /// magnitudes must be finite and non-negative. Ordering is not required.
    pub fn new(frequencies: Vec<f64>, magnitudes: Vec<f64>) -> Result<Self, PhasingError> {
        if frequencies.len() != magnitudes.len() {
            return Err(PhasingError::PsdLengthMismatch {
                frequencies: frequencies.len(),
                magnitudes: magnitudes.len(),
            });
        }
        if frequencies.is_empty() {
            return Err(PhasingError::EmptyPsd);
        }

        for (index, (&f, &m)) in frequencies.iter().zip(magnitudes.iter()).enumerate() {
            if !f.is_finite() || f < 0.0 {
                return Err(PhasingError::InvalidPsdSample {
                    index,
                    reason: format!("frequency {f} Hz is not a finite non-negative value"),
                });
            }
            if !m.is_finite() || m < 0.0 {
                return Err(PhasingError::InvalidPsdSample {
                    index,
                    reason: format!("magnitude {m} m²/Hz is not a finite non-negative value"),
                });
            }
        }

        let samples = Self {
            frequencies,
            magnitudes,
        };
        ensure_positive("max PSD frequency", samples.max_frequency())?;
        let noise_std = samples.white_noise_std();
        if !noise_std.is_finite() {
            return Err(PhasingError::NonFiniteNoise(noise_std));
        }
        Ok(samples)
    }

    /// A flat PSD at `level` m²/Hz over `n` frequencies linearly spaced on
    /// `[f_min, f_max]`.
    pub fn flat(f_min: f64, f_max: f64, n: usize, level: f64) -> Result<Self, PhasingError> {
        let frequencies = match n {
            0 => Vec::new(),
            1 => vec![f_min],
            _ => {
                let step = (f_max - f_min) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { f_max } else { f_min + step * i as f64 })
                    .collect()
            }
        };
        let magnitudes = vec![level; frequencies.len()];
        Self::new(frequencies, magnitudes)
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn max_frequency(&self) -> f64 {
        self.frequencies.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_frequency(&self) -> f64 {
        self.frequencies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Nyquist-rate sample interval for the highest PSD frequency
    pub fn sample_interval(&self) -> f64 {
        1.0 / (2.0 * self.max_frequency())
    }

    /// Standard deviation of the equivalent white noise.
    ///
    /// Treats the mean density as flat across the PSD's frequency span:
    /// variance = mean(PSD) × (f_max − f_min).
    pub fn white_noise_std(&self) -> f64 {
        let mean_density = self.magnitudes.iter().sum::<f64>() / self.magnitudes.len() as f64;
        let bandwidth = self.max_frequency() - self.min_frequency();
        (mean_density * bandwidth).sqrt()
    }
}

/// Controller and geometry parameters for a walk-off simulation
#[derive(Debug, Clone, PartialEq)]
pub struct WalkoffParams {
    /// Controller 3 dB bandwidth in Hz
    pub controller_bandwidth_hz: f64,
    /// Duration of the acceleration phase in seconds
    pub accel_time_s: f64,
    /// Array baseline in meters
    pub baseline_m: f64,
    /// Distance to the sail in meters
    pub distance_m: f64,
    /// Sail radius in meters
    pub sail_radius_m: f64,
    /// Number of independent Monte Carlo runs
    pub n_runs: usize,
}

impl WalkoffParams {
    fn validate(&self) -> Result<(), PhasingError> {
        ensure_positive("controller_bandwidth_hz", self.controller_bandwidth_hz)?;
        ensure_positive("accel_time_s", self.accel_time_s)?;
        ensure_positive("baseline_m", self.baseline_m)?;
        ensure_positive("distance_m", self.distance_m)?;
        ensure_positive("sail_radius_m", self.sail_radius_m)?;
        if self.n_runs == 0 {
            return Err(PhasingError::NoRuns);
        }
        Ok(())
    }
}

/// Output of [`closed_loop_walkoff`]
#[derive(Debug, Clone)]
pub struct WalkoffResult {
    /// RMS lateral walk-off over all runs and samples, in meters
    pub rms_m: f64,
    /// Five times the RMS (Gaussian bound, not a measured percentile)
    pub five_sigma_m: f64,
    /// Sample interval of the time series in seconds
    pub sample_interval_s: f64,
    /// Sail radius the walk-off is judged against, in meters
    pub sail_radius_m: f64,
    /// Lateral walk-off in meters, shape (runs, samples)
    pub walkoff_time_series: Array2<f64>,
}

impl WalkoffResult {
    pub fn n_runs(&self) -> usize {
        self.walkoff_time_series.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.walkoff_time_series.ncols()
    }

    /// Sample times in seconds, k·dt
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.n_samples())
            .map(|k| k as f64 * self.sample_interval_s)
            .collect()
    }

    /// Whether the five-sigma walk-off keeps the spot within half the sail radius
    pub fn within_requirement(&self) -> bool {
        self.five_sigma_m <= 0.5 * self.sail_radius_m
    }
}

/// Largest number of f64 samples a single time-series allocation can hold
const MAX_SERIES_ELEMENTS: usize = isize::MAX as usize / size_of::<f64>();

/// Sample count per run for a duration, checked against the allocation limit.
fn samples_per_run(accel_time_s: f64, sample_interval_s: f64, n_runs: usize) -> Result<usize, PhasingError> {
    let ratio = accel_time_s / sample_interval_s;
    if !ratio.is_finite() || ratio >= MAX_SERIES_ELEMENTS as f64 {
        return Err(PhasingError::TooManySamples {
            runs: n_runs,
            samples: ratio,
        });
    }

    let n_samples = ratio as usize;
    if n_samples == 0 {
        return Err(PhasingError::NoSamples {
            accel_time_s,
            sample_interval_s,
        });
    }

    match n_runs.checked_mul(n_samples) {
        Some(total) if total <= MAX_SERIES_ELEMENTS => Ok(n_samples),
        _ => Err(PhasingError::TooManySamples {
            runs: n_runs,
            samples: n_samples as f64,
        }),
    }
}

/// Expected residual walk-off RMS for white input noise.
///
/// The residual transfer function of the loop is
/// `a(1 − z⁻¹) / (1 − a·z⁻¹)`, whose white-noise power gain is `2a² / (1 + a)`.
pub fn analytic_residual_rms(noise_std: f64, pole: f64, baseline_m: f64, distance_m: f64) -> f64 {
    let gain = (2.0 * pole * pole / (1.0 + pole)).sqrt();
    noise_std * gain / baseline_m * distance_m
}

/// Simulate phase noise rejection by a single-pole controller.
///
/// Each run draws its own Gaussian path-length noise from an independent
/// sub-stream of `seed`, filters it causally through the controller, and
/// converts the residual to lateral walk-off. Runs execute in parallel; the
/// result does not depend on scheduling. With `seed = None` a fresh seed is
/// drawn from the thread RNG.
///
/// # Errors
/// Any non-positive geometry, bandwidth or duration, a zero run count, a
/// duration shorter than one sample interval, or more samples than can be
/// allocated.
pub fn closed_loop_walkoff(
    psd: &PsdSamples,
    params: &WalkoffParams,
    seed: Option<u64>,
) -> Result<WalkoffResult, PhasingError> {
    params.validate()?;

    let sample_interval_s = psd.sample_interval();
    let n_samples = samples_per_run(params.accel_time_s, sample_interval_s, params.n_runs)?;

    let noise_std = psd.white_noise_std();
    let controller = OnePoleLowPass::from_bandwidth(params.controller_bandwidth_hz, sample_interval_s);
    let pole = controller.pole();
    let seed = seed.unwrap_or_else(rand::random);

    debug!(
        "walk-off: dt={sample_interval_s:.3e} s, n={n_samples}, sigma={noise_std:.3e} m, alpha={pole:.6}, runs={}, seed={seed}",
        params.n_runs
    );

    let normal = Normal::new(0.0, noise_std).map_err(|_| PhasingError::NonFiniteNoise(noise_std))?;
    let scale = params.distance_m / params.baseline_m;

    let series = process_rows_in_parallel(
        Array2::zeros((params.n_runs, n_samples)),
        seed,
        |_, mut row, rng| {
            let mut controller = controller.clone();
            for walkoff in row.iter_mut() {
                let path_error = normal.sample(rng);
                let tracked = controller.process_sample(path_error);
                // residual path error / baseline = tilt; tilt * distance = walk-off
                *walkoff = (path_error - tracked) * scale;
            }
        },
    );

    let rms_m = rms(series.iter()).unwrap_or(0.0);

    Ok(WalkoffResult {
        rms_m,
        five_sigma_m: 5.0 * rms_m,
        sample_interval_s,
        sail_radius_m: params.sail_radius_m,
        walkoff_time_series: series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::algo::stream_seed;

    fn flat_psd() -> PsdSamples {
        PsdSamples::flat(1.0, 1000.0, 100, 1e-9).unwrap()
    }

    fn params(bandwidth: f64, n_runs: usize) -> WalkoffParams {
        WalkoffParams {
            controller_bandwidth_hz: bandwidth,
            accel_time_s: 0.5,
            baseline_m: 1000.0,
            distance_m: 1e8,
            sail_radius_m: 1.0,
            n_runs,
        }
    }

    #[test]
    fn test_psd_derived_quantities() {
        let psd = flat_psd();
        assert_eq!(psd.frequencies().len(), 100);
        assert_relative_eq!(psd.max_frequency(), 1000.0, epsilon = 1e-9);
        assert_relative_eq!(psd.min_frequency(), 1.0);
        assert_relative_eq!(psd.sample_interval(), 5e-4, epsilon = 1e-15);
        // sqrt(1e-9 * 999)
        assert_relative_eq!(psd.white_noise_std(), (999e-9_f64).sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_psd_validation() {
        assert_eq!(PsdSamples::new(vec![], vec![]), Err(PhasingError::EmptyPsd));
        assert_eq!(
            PsdSamples::new(vec![1.0, 2.0], vec![1.0]),
            Err(PhasingError::PsdLengthMismatch {
                frequencies: 2,
                magnitudes: 1
            })
        );
        assert!(matches!(
            PsdSamples::new(vec![1.0, f64::NAN], vec![1.0, 1.0]),
            Err(PhasingError::InvalidPsdSample { index: 1, .. })
        ));
        assert!(matches!(
            PsdSamples::new(vec![1.0, 2.0], vec![1.0, -1.0]),
            Err(PhasingError::InvalidPsdSample { index: 1, .. })
        ));
        assert!(matches!(
            PsdSamples::new(vec![0.0], vec![1.0]),
            Err(PhasingError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_output_shape_and_time_axis() {
        let result = closed_loop_walkoff(&flat_psd(), &params(200.0, 3), Some(7)).unwrap();
        assert_eq!(result.n_runs(), 3);
        // 0.5 s / 5e-4 s, truncated
        let expected = (0.5 / flat_psd().sample_interval()) as usize;
        assert_eq!(result.n_samples(), expected);
        let t = result.time_axis();
        assert_eq!(t.len(), expected);
        assert_relative_eq!(t[0], 0.0);
        assert_relative_eq!(t[1], 5e-4, epsilon = 1e-15);
    }

    #[test]
    fn test_five_sigma_is_five_times_rms() {
        let result = closed_loop_walkoff(&flat_psd(), &params(200.0, 2), Some(3)).unwrap();
        assert!(result.rms_m > 0.0);
        assert_relative_eq!(result.five_sigma_m, 5.0 * result.rms_m);
        let direct = rms(result.walkoff_time_series.iter()).unwrap();
        assert_relative_eq!(result.rms_m, direct);
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let a = closed_loop_walkoff(&flat_psd(), &params(100.0, 4), Some(11)).unwrap();
        let b = closed_loop_walkoff(&flat_psd(), &params(100.0, 4), Some(11)).unwrap();
        assert_eq!(a.walkoff_time_series, b.walkoff_time_series);
        assert_eq!(a.rms_m.to_bits(), b.rms_m.to_bits());

        let c = closed_loop_walkoff(&flat_psd(), &params(100.0, 4), Some(12)).unwrap();
        assert_ne!(a.walkoff_time_series, c.walkoff_time_series);
    }

    #[test]
    fn test_run_reproduces_exact_iir_recursion() {
        let psd = flat_psd();
        let p = params(150.0, 2);
        let seed = 2024;
        let result = closed_loop_walkoff(&psd, &p, Some(seed)).unwrap();

        let n = result.n_samples();
        let dt = psd.sample_interval();
        let pole = (-2.0 * std::f64::consts::PI * p.controller_bandwidth_hz * dt).exp();

        // Regenerate run 1's noise from its sub-stream and apply
        // y[k] = (1-a) x[k] + a y[k-1], y[-1] = 0 by hand.
        let normal = Normal::new(0.0, psd.white_noise_std()).unwrap();
        let mut rng = StdRng::seed_from_u64(stream_seed(seed, 1));
        let noise: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();

        let mut y_prev = 0.0;
        for (k, &x) in noise.iter().enumerate() {
            let y = (1.0 - pole) * x + pole * y_prev;
            y_prev = y;
            let expected = (x - y) / p.baseline_m * p.distance_m;
            assert_relative_eq!(
                result.walkoff_time_series[[1, k]],
                expected,
                max_relative = 1e-12
            );
        }

        // And the shared filter agrees with the hand recursion
        let mut filter = OnePoleLowPass::new(pole);
        let last = noise.iter().fold(0.0, |_, &x| filter.process_sample(x));
        assert_relative_eq!(last, y_prev, max_relative = 1e-12);
    }

    #[test]
    fn test_rms_matches_analytic_gain() {
        let psd = flat_psd();
        let p = WalkoffParams {
            accel_time_s: 2.0,
            ..params(100.0, 8)
        };
        let result = closed_loop_walkoff(&psd, &p, Some(5)).unwrap();
        let pole = OnePoleLowPass::pole_for_bandwidth(p.controller_bandwidth_hz, psd.sample_interval());
        let expected = analytic_residual_rms(psd.white_noise_std(), pole, p.baseline_m, p.distance_m);
        // 8 runs x 4000 samples: statistical error well under 5%
        assert_relative_eq!(result.rms_m, expected, max_relative = 0.05);
    }

    #[test]
    fn test_degenerate_inputs_fail_fast() {
        let psd = flat_psd();
        for (bad, name) in [
            (WalkoffParams { baseline_m: 0.0, ..params(100.0, 1) }, "baseline_m"),
            (WalkoffParams { distance_m: 0.0, ..params(100.0, 1) }, "distance_m"),
            (WalkoffParams { controller_bandwidth_hz: -1.0, ..params(100.0, 1) }, "controller_bandwidth_hz"),
            (WalkoffParams { accel_time_s: f64::NAN, ..params(100.0, 1) }, "accel_time_s"),
        ] {
            match closed_loop_walkoff(&psd, &bad, Some(0)) {
                Err(PhasingError::NonPositive { name: got, .. }) => assert_eq!(got, name),
                other => panic!("expected NonPositive({name}), got {other:?}"),
            }
        }

        assert_eq!(
            closed_loop_walkoff(&psd, &params(100.0, 0), Some(0)).unwrap_err(),
            PhasingError::NoRuns
        );

        let too_short = WalkoffParams {
            accel_time_s: 1e-5,
            ..params(100.0, 1)
        };
        assert!(matches!(
            closed_loop_walkoff(&psd, &too_short, Some(0)),
            Err(PhasingError::NoSamples { .. })
        ));
    }

    #[test]
    fn test_oversized_series_is_an_error() {
        // Accepted by validation, but the Nyquist interval is ~5e-301 s
        let psd = PsdSamples::new(vec![1.0, 1e300], vec![1e-9, 1e-9]).unwrap();
        assert!(matches!(
            closed_loop_walkoff(&psd, &params(100.0, 1), Some(1)),
            Err(PhasingError::TooManySamples { runs: 1, .. })
        ));

        // Each run fits, but the run count pushes the total past the limit
        let psd = PsdSamples::flat(1.0, 1000.0, 10, 1e-9).unwrap();
        let wide = WalkoffParams {
            accel_time_s: 1e6,
            n_runs: usize::MAX / 2,
            ..params(100.0, 1)
        };
        assert!(matches!(
            closed_loop_walkoff(&psd, &wide, Some(1)),
            Err(PhasingError::TooManySamples { .. })
        ));
    }

    #[test]
    fn test_overflowing_psd_level_is_rejected() {
        assert!(matches!(
            PsdSamples::new(vec![1.0, 1000.0], vec![1e308, 1e308]),
            Err(PhasingError::NonFiniteNoise(_))
        ));
    }

    #[test]
    fn test_within_requirement() {
        let mut result = closed_loop_walkoff(&flat_psd(), &params(100.0, 1), Some(1)).unwrap();
        result.five_sigma_m = 0.4;
        assert!(result.within_requirement());
        result.five_sigma_m = 0.6;
        assert!(!result.within_requirement());
    }
}
