use std::sync::Arc;

use log::debug;

use crate::error::{Result, ZdfError};
use crate::signal_processing::math::dot;
use crate::signal_processing::{CircularBuffer, FilterBank};

/// Streaming estimator applying a [`FilterBank`] to a rolling sample history
///
/// The engine owns its history exclusively. The bank is shared read-only, so
/// several engines on independent streams can use one bank.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use zdf::{FilterBank, FilterSpec, ZdfEngine};
///
/// let spec = FilterSpec::new(4, &[0], 0, 0..1, 0).unwrap();
/// let bank = Arc::new(FilterBank::build(&spec).unwrap());
/// let mut engine = ZdfEngine::new(bank, &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert!((engine.filtered()[0] - 2.5).abs() < 1e-6);
/// assert!((engine.update(5.0)[0] - 3.5).abs() < 1e-6);
/// ```
pub struct ZdfEngine {
    bank: Arc<FilterBank>,
    buffer: CircularBuffer,
    filtered: Vec<f32>,
}

impl ZdfEngine {
    /// Create an engine seeded with the first `N` samples of `seed`, oldest
    /// first, and apply the bank to them
    ///
    /// # Errors
    /// Returns `ZdfError::SeedShortage` if fewer than `N` samples are given
    pub fn new(bank: Arc<FilterBank>, seed: &[f32]) -> Result<Self> {
        let needed = bank.len();
        check_seed(needed, seed)?;

        let buffer = CircularBuffer::from_seed(seed[..needed].to_vec());
        let mut filtered = vec![0.0f32; bank.num_channels()];
        bank.apply(buffer.as_slice(), &mut filtered);
        debug!("Seeded engine with {} samples", needed);

        Ok(Self {
            bank,
            buffer,
            filtered,
        })
    }

    /// Consume one sample and return one estimate per channel
    pub fn update(&mut self, x: f32) -> &[f32] {
        let len = self.buffer.len();
        let written = self.buffer.push(x);
        let (newest, oldest) = self.buffer.as_slice().split_at(written);

        for (fx, out) in self.filtered.iter_mut().enumerate() {
            let taps = self.bank.channel(fx);
            let (early_taps, late_taps) = taps.split_at(len - written);
            *out = (dot(late_taps, newest) + dot(early_taps, oldest)) as f32;
        }

        &self.filtered
    }

    /// Estimates for the most recent sample (or the seed)
    pub fn filtered(&self) -> &[f32] {
        &self.filtered
    }

    pub fn bank(&self) -> &Arc<FilterBank> {
        &self.bank
    }

    /// Output delay in samples; see [`FilterBank::k_delay`]
    pub fn k_delay(&self) -> usize {
        self.bank.k_delay()
    }

    /// Next write slot of the history
    pub fn head(&self) -> usize {
        self.buffer.head()
    }

    /// History in chronological order without realigning it
    pub fn chronological(&self) -> Vec<f32> {
        self.buffer.chronological()
    }

    /// Realign the history in place and return it in chronological order
    pub fn canonical(&mut self) -> &[f32] {
        self.buffer.rectify()
    }

    /// Replace the history with a snapshot and recompute the estimates
    ///
    /// # Errors
    /// Returns `ZdfError::SeedShortage` if fewer than `N` samples are given
    pub fn reseed(&mut self, seed: &[f32]) -> Result<()> {
        let needed = self.bank.len();
        check_seed(needed, seed)?;
        self.buffer.reseed(&seed[..needed]);
        self.bank.apply(self.buffer.as_slice(), &mut self.filtered);
        Ok(())
    }
}

fn check_seed(needed: usize, seed: &[f32]) -> Result<()> {
    if seed.len() < needed {
        return Err(ZdfError::SeedShortage {
            needed,
            available: seed.len(),
        });
    }
    Ok(())
}
