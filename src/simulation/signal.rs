use std::f64::consts::{LN_2, PI};

use super::noise::{NoiseConfig, add_noise};

/// Span of the synthetic signal after the seed: three periods
pub const SIGNAL_DURATION: f64 = 6.0 * PI;

/// Exponentially damped oscillation with closed-form first and second
/// derivatives
///
/// The decay rate halves the amplitude every two periods.
#[derive(Debug, Clone, Copy)]
pub struct DampedOscillation {
    rate: f64,
    offset: f64,
}

impl Default for DampedOscillation {
    fn default() -> Self {
        let rate = LN_2 / 2.0 / (2.0 * PI);
        Self {
            rate,
            offset: (-1.0f64).exp() / (1.0 + rate * rate),
        }
    }
}

impl DampedOscillation {
    pub fn value(&self, t: f64) -> f64 {
        let r = self.rate;
        -(-r * t).exp() * (t.cos() + r * t.sin()) / (1.0 + r * r) + self.offset
    }

    pub fn first_derivative(&self, t: f64) -> f64 {
        (-self.rate * t).exp() * t.sin()
    }

    pub fn second_derivative(&self, t: f64) -> f64 {
        let r = self.rate;
        (-r * t).exp() * (t.cos() - r * t.sin())
    }
}

/// `length + updates` sample times ending at [`SIGNAL_DURATION`]
///
/// The times are evenly spaced from `-(length - 1) * SIGNAL_DURATION / length`
/// to `SIGNAL_DURATION`; the first `length` of them form the seed. The seed
/// ends at `t = 0` only when `updates == length`.
pub fn sample_times(length: usize, updates: usize) -> Vec<f64> {
    let dt = SIGNAL_DURATION / length as f64;
    let start = -((length as f64) - 1.0) * dt;
    let count = length + updates;
    if count < 2 {
        return vec![start; count];
    }
    let step = (SIGNAL_DURATION - start) / (count - 1) as f64;
    (0..count).map(|i| start + i as f64 * step).collect()
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Number of streaming samples after the seed
    pub updates: usize,
    pub noise: NoiseConfig,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            updates: 256,
            noise: NoiseConfig::default(),
        }
    }
}

/// Noisy seed and input streams plus the clean reference derivatives
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub times: Vec<f64>,
    pub seed: Vec<f32>,
    pub input: Vec<f32>,
    pub clean: Vec<f32>,
    pub first_derivative: Vec<f32>,
    pub second_derivative: Vec<f32>,
}

pub fn generate_synthetic_data(length: usize, config: &SyntheticConfig) -> SyntheticData {
    let signal = DampedOscillation::default();
    let times = sample_times(length, config.updates);

    let clean: Vec<f32> = times.iter().map(|&t| signal.value(t) as f32).collect();
    let first_derivative = times
        .iter()
        .map(|&t| signal.first_derivative(t) as f32)
        .collect();
    let second_derivative = times
        .iter()
        .map(|&t| signal.second_derivative(t) as f32)
        .collect();

    let mut noisy = clean.clone();
    add_noise(&mut noisy, &config.noise);
    let input = noisy.split_off(length.min(noisy.len()));

    SyntheticData {
        times,
        seed: noisy,
        input,
        clean,
        first_derivative,
        second_derivative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_signal_at_origin() {
        let signal = DampedOscillation::default();
        let r = signal.rate;
        let expected = ((-1.0f64).exp() - 1.0) / (1.0 + r * r);
        assert_abs_diff_eq!(signal.value(0.0), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.first_derivative(0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.second_derivative(0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let signal = DampedOscillation::default();
        let h = 1e-5;
        for t in [-3.0, 0.4, 2.0, 7.5, 15.0] {
            let d1 = (signal.value(t + h) - signal.value(t - h)) / (2.0 * h);
            let d2 = (signal.first_derivative(t + h) - signal.first_derivative(t - h)) / (2.0 * h);
            assert_abs_diff_eq!(d1, signal.first_derivative(t), epsilon = 1e-6);
            assert_abs_diff_eq!(d2, signal.second_derivative(t), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_amplitude_halves_every_two_periods() {
        let signal = DampedOscillation::default();
        let t = PI / 2.0;
        let ratio = signal.first_derivative(t + 4.0 * PI) / signal.first_derivative(t);
        assert_abs_diff_eq!(ratio, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_times_span() {
        let times = sample_times(8, 0);
        assert_eq!(times.len(), 8);
        assert_abs_diff_eq!(times[7], SIGNAL_DURATION, epsilon = 1e-12);
        assert_abs_diff_eq!(times[0], -7.0 * SIGNAL_DURATION / 8.0, epsilon = 1e-12);

        let times = sample_times(8, 24);
        assert_eq!(times.len(), 32);
        assert_abs_diff_eq!(times[31], SIGNAL_DURATION, epsilon = 1e-12);
        assert!(times[7] < 0.0);

        let times = sample_times(8, 8);
        assert_abs_diff_eq!(times[7], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_synthetic_data_splits_seed_and_input() {
        let config = SyntheticConfig {
            updates: 10,
            noise: NoiseConfig::default().with_seed(1),
        };
        let data = generate_synthetic_data(16, &config);
        assert_eq!(data.seed.len(), 16);
        assert_eq!(data.input.len(), 10);
        assert_eq!(data.clean.len(), 26);
        assert_eq!(data.first_derivative.len(), 26);

        let noiseless = SyntheticConfig {
            updates: 10,
            noise: NoiseConfig::default().with_std_dev(0.0),
        };
        let data = generate_synthetic_data(16, &noiseless);
        assert_eq!(data.seed, data.clean[..16]);
        assert_eq!(data.input, data.clean[16..]);
    }
}
