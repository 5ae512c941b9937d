//! Configuration for the minimal-delay filter bank.
//!
//! A [`FilterSpec`] is validated once at startup and never changes afterwards.
//! It can be constructed directly, loaded from a TOML file, or decoded from its
//! compact identifier:
//!
//! ```toml
//! length = 512
//! derivatives = [0, 1, 2]
//! kappa = 0
//! mu_min = 1
//! mu_max = 2
//! hull_order = 2
//! ```

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LENGTH, MAX_ORDER};
use crate::error::{Result, ZdfError};

// Compact identifier layout (bit offsets and field masks).
const LENGTH_SHIFT: u32 = 0;
const LENGTH_MASK: u64 = 0xFFFF;
const DERIVATIVE_SHIFT: u32 = 16;
const DERIVATIVE_MASK: u64 = 0xFFFF;
const HULL_SHIFT: u32 = 32;
const KAPPA_SHIFT: u32 = 36;
const MU_MIN_SHIFT: u32 = 40;
const MU_MAX_SHIFT: u32 = 44;
const NIBBLE_MASK: u64 = 0xF;
const IDENTIFIER_BITS: u32 = 48;

/// One (derivative order, timescale) pair of the filter bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub derivative: u8,
    pub mu: u8,
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}_mu{}", self.derivative, self.mu)
    }
}

/// Validated, immutable filter bank configuration
///
/// # Example
/// ```
/// use zdf::config::FilterSpec;
///
/// let spec = FilterSpec::new(64, &[0, 1, 2], 0, 1..3, 1).unwrap();
/// assert_eq!(spec.num_channels(), 6);
/// assert_eq!(spec.channel_index(2, 1), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    length: usize,
    derivatives: Vec<u8>,
    kappa: u8,
    mu_min: u8,
    mu_max: u8,
    hull_order: u8,
}

impl FilterSpec {
    /// Create a validated configuration
    ///
    /// # Arguments
    /// * `length` - Number of taps per channel (1..=65535)
    /// * `derivatives` - Distinct derivative orders (0..=15), any order
    /// * `kappa` - Baseline filter order (0..=15)
    /// * `mu_range` - Half-open timescale range, non-empty, end at most 15
    /// * `hull_order` - Extra minimal filters combined per channel (0..=15)
    ///
    /// # Errors
    /// Returns `ZdfError::Config` if any field is out of range
    pub fn new(
        length: usize,
        derivatives: &[u8],
        kappa: u8,
        mu_range: Range<u8>,
        hull_order: u8,
    ) -> Result<Self> {
        if length == 0 || length > MAX_LENGTH {
            return Err(ZdfError::Config(format!(
                "length must be in 1..={}, got {}",
                MAX_LENGTH, length
            )));
        }

        if derivatives.is_empty() {
            return Err(ZdfError::Config(
                "at least one derivative order is required".to_string(),
            ));
        }
        let mut sorted = derivatives.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(ZdfError::Config(format!(
                "duplicate derivative order {}",
                w[0]
            )));
        }
        if let Some(&d) = sorted.last()
            && d > MAX_ORDER
        {
            return Err(ZdfError::Config(format!(
                "derivative order {} exceeds {}",
                d, MAX_ORDER
            )));
        }

        check_order("kappa", kappa)?;
        check_order("hull_order", hull_order)?;

        if mu_range.start >= mu_range.end {
            return Err(ZdfError::Config(format!(
                "mu range {}..{} is empty",
                mu_range.start, mu_range.end
            )));
        }
        check_order("mu_max", mu_range.end)?;

        if length < 2 && sorted.iter().any(|&d| d > 0) {
            return Err(ZdfError::Config(
                "derivative channels need a length of at least 2".to_string(),
            ));
        }

        Ok(Self {
            length,
            derivatives: sorted,
            kappa,
            mu_min: mu_range.start,
            mu_max: mu_range.end,
            hull_order,
        })
    }

    /// Parse a specification from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: FilterSpecConfig = toml::from_str(s)?;
        Self::try_from(config)
    }

    /// Load a specification from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Decode a specification from its compact identifier
    ///
    /// # Errors
    /// Returns `ZdfError::Config` if bits beyond the layout are set or the
    /// decoded fields do not form a valid specification
    pub fn from_identifier(id: u64) -> Result<Self> {
        if id >> IDENTIFIER_BITS != 0 {
            return Err(ZdfError::Config(format!(
                "identifier {} has bits set above bit {}",
                id,
                IDENTIFIER_BITS - 1
            )));
        }

        let nibble = |shift: u32| ((id >> shift) & NIBBLE_MASK) as u8;
        let mask = ((id >> DERIVATIVE_SHIFT) & DERIVATIVE_MASK) as u16;
        let derivatives: Vec<u8> = (0..16u8).filter(|d| (mask >> d) & 1 == 1).collect();

        Self::new(
            ((id >> LENGTH_SHIFT) & LENGTH_MASK) as usize,
            &derivatives,
            nibble(KAPPA_SHIFT),
            nibble(MU_MIN_SHIFT)..nibble(MU_MAX_SHIFT),
            nibble(HULL_SHIFT),
        )
    }

    /// Compact identifier used for file naming and logging
    pub fn identifier(&self) -> u64 {
        ((self.length as u64) << LENGTH_SHIFT)
            | (u64::from(self.derivative_mask()) << DERIVATIVE_SHIFT)
            | (u64::from(self.hull_order) << HULL_SHIFT)
            | (u64::from(self.kappa) << KAPPA_SHIFT)
            | (u64::from(self.mu_min) << MU_MIN_SHIFT)
            | (u64::from(self.mu_max) << MU_MAX_SHIFT)
    }

    /// Bit mask with bit `d` set for every requested derivative order `d`
    pub fn derivative_mask(&self) -> u16 {
        self.derivatives.iter().fold(0u16, |acc, &d| acc | (1 << d))
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Requested derivative orders, ascending
    pub fn derivatives(&self) -> &[u8] {
        &self.derivatives
    }

    pub fn kappa(&self) -> u8 {
        self.kappa
    }

    pub fn mu_range(&self) -> Range<u8> {
        self.mu_min..self.mu_max
    }

    pub fn hull_order(&self) -> u8 {
        self.hull_order
    }

    /// Smallest requested derivative order
    pub fn min_derivative(&self) -> u8 {
        self.derivatives[0]
    }

    pub fn num_derivatives(&self) -> usize {
        self.derivatives.len()
    }

    pub fn num_timescales(&self) -> usize {
        usize::from(self.mu_max - self.mu_min)
    }

    pub fn num_channels(&self) -> usize {
        self.num_derivatives() * self.num_timescales()
    }

    /// Channel index of `(derivative, mu)`, timescale varying fastest
    pub fn channel_index(&self, derivative: u8, mu: u8) -> Option<usize> {
        if !self.mu_range().contains(&mu) {
            return None;
        }
        let rank = self.derivatives.binary_search(&derivative).ok()?;
        Some(usize::from(mu - self.mu_min) + self.num_timescales() * rank)
    }

    /// All channel keys in channel-index order
    pub fn channels(&self) -> impl Iterator<Item = ChannelKey> + '_ {
        self.derivatives.iter().flat_map(move |&derivative| {
            self.mu_range()
                .map(move |mu| ChannelKey { derivative, mu })
        })
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let derivatives: Vec<String> = self.derivatives.iter().map(|d| d.to_string()).collect();
        write!(
            f,
            "N={} D={{{}}} kappa={} mu=[{},{}) q={}",
            self.length,
            derivatives.join(","),
            self.kappa,
            self.mu_min,
            self.mu_max,
            self.hull_order
        )
    }
}

fn check_order(name: &str, value: u8) -> Result<()> {
    if value > MAX_ORDER {
        return Err(ZdfError::Config(format!(
            "{} must be at most {}, got {}",
            name, MAX_ORDER, value
        )));
    }
    Ok(())
}

/// Serialized form of a [`FilterSpec`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpecConfig {
    pub length: usize,
    pub derivatives: Vec<u8>,
    pub kappa: u8,
    pub mu_min: u8,
    pub mu_max: u8,
    pub hull_order: u8,
}

impl Default for FilterSpecConfig {
    fn default() -> Self {
        Self {
            length: 512,
            derivatives: vec![0, 1, 2],
            kappa: 0,
            mu_min: 1,
            mu_max: 2,
            hull_order: 2,
        }
    }
}

impl TryFrom<FilterSpecConfig> for FilterSpec {
    type Error = ZdfError;

    fn try_from(config: FilterSpecConfig) -> Result<Self> {
        Self::new(
            config.length,
            &config.derivatives,
            config.kappa,
            config.mu_min..config.mu_max,
            config.hull_order,
        )
    }
}

impl From<&FilterSpec> for FilterSpecConfig {
    fn from(spec: &FilterSpec) -> Self {
        Self {
            length: spec.length,
            derivatives: spec.derivatives.clone(),
            kappa: spec.kappa,
            mu_min: spec.mu_min,
            mu_max: spec.mu_max,
            hull_order: spec.hull_order,
        }
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        // The default configuration is in range by construction.
        let config = FilterSpecConfig::default();
        Self {
            length: config.length,
            derivatives: config.derivatives,
            kappa: config.kappa,
            mu_min: config.mu_min,
            mu_max: config.mu_max,
            hull_order: config.hull_order,
        }
    }
}

/// Bit mask of a derivative list, as accepted by the identifier layout
pub fn derivative_mask(derivatives: &[u8]) -> Result<u16> {
    derivatives.iter().try_fold(0u16, |acc, &d| {
        if d > MAX_ORDER {
            return Err(ZdfError::Config(format!(
                "derivative order {} exceeds {}",
                d, MAX_ORDER
            )));
        }
        Ok(acc | (1 << d))
    })
}

/// Inputs of the minimum-length heuristic
///
/// # Parsing format
/// `SNR,SIMILARITY`, e.g. `10,0.9`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthQuery {
    pub snr: f64,
    pub similarity: f64,
}

impl FromStr for LengthQuery {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (snr, similarity) = s
            .split_once(',')
            .ok_or_else(|| format!("expected SNR,SIMILARITY, got {}", s))?;
        let snr: f64 = snr
            .trim()
            .parse()
            .map_err(|_| format!("invalid snr: {}", snr))?;
        let similarity: f64 = similarity
            .trim()
            .parse()
            .map_err(|_| format!("invalid similarity: {}", similarity))?;
        Ok(Self { snr, similarity })
    }
}
