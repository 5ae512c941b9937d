use log::{debug, info};

use super::kernel::{hull_weights, minimal_kernel, tau_grid};
use super::math::{delay, dot};
use crate::config::{ChannelKey, FilterSpec};
use crate::error::{Result, ZdfError};

/// Immutable bank of normalized minimal-delay FIR filters
///
/// One channel per (derivative order, timescale) pair, in the order given by
/// [`FilterSpec::channel_index`]. Coefficients are stored column-major: the
/// `N` taps of channel `fx` are contiguous, tap `0` weighting the oldest
/// sample and tap `N-1` the newest.
#[derive(Debug, Clone)]
pub struct FilterBank {
    length: usize,
    keys: Vec<ChannelKey>,
    taps: Vec<f64>,
    normalization: Vec<f64>,
    k_delay: usize,
}

impl FilterBank {
    /// Build every channel of the bank
    ///
    /// # Errors
    /// Returns `ZdfError::LinearSolve` if a hull Gram system is singular and
    /// `ZdfError::FilterDesign` if a channel cannot be normalized. No partial
    /// bank is produced.
    pub fn build(spec: &FilterSpec) -> Result<Self> {
        let length = spec.length();
        let kappa = u32::from(spec.kappa());
        let q = u32::from(spec.hull_order());
        let tau = tau_grid(length);

        let keys: Vec<ChannelKey> = spec.channels().collect();
        let mut taps = vec![0.0f64; length * keys.len()];
        let mut normalization = Vec::with_capacity(keys.len());

        for (key, firx) in keys.iter().zip(taps.chunks_exact_mut(length)) {
            let scale = build_channel(*key, kappa, q, &tau, firx)?;
            debug!("Channel {}: normalization {:.6e}", key, scale);
            normalization.push(scale);
        }

        let d0 = u32::from(spec.min_derivative());
        let mu_min = u32::from(spec.mu_range().start);
        let k_delay = (length as f64 * delay(d0, kappa, mu_min)).floor() as usize;

        info!(
            "Built filter bank {} ({} channels, delay {} samples)",
            spec,
            keys.len(),
            k_delay
        );

        Ok(Self {
            length,
            keys,
            taps,
            normalization,
            k_delay,
        })
    }

    /// Number of taps per channel
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn num_channels(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    pub fn key(&self, fx: usize) -> ChannelKey {
        self.keys[fx]
    }

    /// Coefficients of channel `fx`, oldest tap first
    pub fn channel(&self, fx: usize) -> &[f64] {
        &self.taps[fx * self.length..(fx + 1) * self.length]
    }

    /// Tap `i` of channel `fx`
    pub fn tap(&self, i: usize, fx: usize) -> f64 {
        debug_assert!(i < self.length, "tap {} out of {}", i, self.length);
        debug_assert!(fx < self.keys.len(), "channel {} out of {}", fx, self.keys.len());
        self.taps[i + self.length * fx]
    }

    /// Scale folded into the coefficients of channel `fx`
    pub fn normalization(&self, fx: usize) -> f64 {
        self.normalization[fx]
    }

    /// Output delay in samples of the lowest requested derivative order
    ///
    /// Consumers shift their timeline by this many samples to align the
    /// estimates with real time.
    pub fn k_delay(&self) -> usize {
        self.k_delay
    }

    /// Apply every channel to `samples` in chronological order
    pub fn apply(&self, samples: &[f32], out: &mut [f32]) {
        debug_assert_eq!(samples.len(), self.length);
        debug_assert_eq!(out.len(), self.keys.len());
        for (fx, o) in out.iter_mut().enumerate() {
            *o = dot(self.channel(fx), samples) as f32;
        }
    }
}

fn build_channel(key: ChannelKey, kappa: u32, q: u32, tau: &[f64], firx: &mut [f64]) -> Result<f64> {
    let n = u32::from(key.derivative);
    let mu = u32::from(key.mu);

    minimal_kernel(n, kappa, mu, 1.0, tau, firx);
    let norm = normalization_sum(n, firx);

    let scale = if q == 0 {
        1.0 / norm
    } else {
        let weights = hull_weights(n, kappa, mu, q)?;
        firx.fill(0.0);
        for (ix, &lambda) in weights.iter().enumerate() {
            let ix = ix as u32;
            minimal_kernel(n, kappa + q - ix, mu + ix, lambda, tau, firx);
        }
        norm / normalization_sum(n, firx)
    };

    if !scale.is_finite() || scale == 0.0 {
        return Err(ZdfError::FilterDesign(format!(
            "channel {} has degenerate normalization {}",
            key, scale
        )));
    }

    firx.iter_mut().for_each(|h| *h *= scale);
    Ok(scale)
}

/// Remove the mean of derivative filters and return the sum that normalizes
/// them: absolute sum for derivatives, plain sum for smoothing
fn normalization_sum(n: u32, firx: &mut [f64]) -> f64 {
    if n > 0 {
        let mean = firx.iter().sum::<f64>() / firx.len() as f64;
        firx.iter_mut().for_each(|h| *h -= mean);
        firx.iter().map(|h| h.abs()).sum()
    } else {
        firx.iter().sum()
    }
}
