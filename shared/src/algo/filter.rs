//! Single-pole IIR low-pass filter.
//!
//! `y[k] = (1 - a)·x[k] + a·y[k-1]` with `y[-1] = 0`, where `a` is the pole.
//! Unlike an exponential moving average that primes its state with the first
//! input, the state starts at zero so the recursion is strictly causal.

use std::f64::consts::PI;

/// Real-valued one-pole low-pass filter.
#[derive(Debug, Clone)]
pub struct OnePoleLowPass {
    /// Feedback coefficient (pole location), 0 <= pole < 1
    pole: f64,
    /// Previous output y[k-1]
    state: f64,
}

impl OnePoleLowPass {
    /// Create a filter with the given pole.
    pub fn new(pole: f64) -> Self {
        Self { pole, state: 0.0 }
    }

    /// Pole for a 3 dB bandwidth at the given sample interval.
    ///
    /// `pole = exp(-2π·f_3dB·dt)`
    pub fn pole_for_bandwidth(bandwidth_hz: f64, sample_interval_s: f64) -> f64 {
        (-2.0 * PI * bandwidth_hz * sample_interval_s).exp()
    }

    /// Create from a 3 dB bandwidth and sample interval.
    pub fn from_bandwidth(bandwidth_hz: f64, sample_interval_s: f64) -> Self {
        Self::new(Self::pole_for_bandwidth(bandwidth_hz, sample_interval_s))
    }

    pub fn pole(&self) -> f64 {
        self.pole
    }

    /// Process a single sample.
    #[inline]
    pub fn process_sample(&mut self, x: f64) -> f64 {
        self.state = (1.0 - self.pole) * x + self.pole * self.state;
        self.state
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn filter_from_rest(input: &[f64], pole: f64) -> Vec<f64> {
        let mut filter = OnePoleLowPass::new(pole);
        input.iter().map(|&x| filter.process_sample(x)).collect()
    }

    #[test]
    fn test_recursion_by_hand() {
        let a = 0.5;
        let x = [1.0, 0.0, 2.0, -1.0];
        let y = filter_from_rest(&x, a);

        // y0 = 0.5*1 = 0.5
        // y1 = 0.5*0 + 0.5*0.5 = 0.25
        // y2 = 0.5*2 + 0.5*0.25 = 1.125
        // y3 = 0.5*-1 + 0.5*1.125 = 0.0625
        let expected = [0.5, 0.25, 1.125, 0.0625];
        for (got, want) in y.iter().zip(expected.iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_state_starts_at_zero() {
        // An EMA primed with the first sample would return 3.0 here
        let y = filter_from_rest(&[3.0], 0.9);
        assert_relative_eq!(y[0], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_step_response_converges() {
        let y = filter_from_rest(&vec![1.0; 200], 0.9);
        // 1 - 0.9^200
        assert_relative_eq!(y[199], 1.0 - 0.9_f64.powi(200), epsilon = 1e-12);
        assert!(y.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_zero_pole_passes_input() {
        let x = [0.3, -1.2, 4.0];
        assert_eq!(filter_from_rest(&x, 0.0), x.to_vec());
    }

    #[test]
    fn test_pole_for_bandwidth() {
        let pole = OnePoleLowPass::pole_for_bandwidth(200.0, 1.0 / 2000.0);
        assert_relative_eq!(pole, (-2.0 * PI * 0.1).exp(), epsilon = 1e-15);
        assert!(OnePoleLowPass::pole_for_bandwidth(500.0, 1e-3) < pole);
    }

    #[test]
    fn test_from_bandwidth_sets_pole() {
        let filter = OnePoleLowPass::from_bandwidth(10.0, 0.01);
        assert_relative_eq!(filter.pole(), OnePoleLowPass::pole_for_bandwidth(10.0, 0.01));
    }
}
