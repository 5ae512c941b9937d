//! Persistence of seed samples, streaming input, estimates and snapshots
//!
//! All streams are flat native-endian `f32` values without headers.

mod file;
mod memory;

use std::fs;
use std::path::Path;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::constants::SAMPLE_BYTES;
use crate::error::Result;

/// Source of seed and input samples and sink of estimates and snapshots
pub trait SampleStore {
    /// Read exactly `len` seed samples in chronological order
    ///
    /// Returns `ZdfError::SeedShortage` if fewer are available.
    fn read_seed(&mut self, len: usize) -> Result<Vec<f32>>;

    /// Next input sample, or `None` once the input is exhausted
    fn next_sample(&mut self) -> Result<Option<f32>>;

    /// Start a fresh output stream, discarding records of earlier runs
    fn begin_output(&mut self) -> Result<()>;

    /// Append one record of per-channel estimates
    fn write_output(&mut self, record: &[f32]) -> Result<()>;

    /// Persist the history in chronological order
    fn write_snapshot(&mut self, samples: &[f32]) -> Result<()>;

    /// Commit buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Serialize samples to native-endian bytes
pub fn encode_samples(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|x| x.to_ne_bytes()).collect()
}

/// Deserialize native-endian bytes; a trailing partial value is dropped
pub fn decode_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Read a whole sample file
pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<f32>> {
    Ok(decode_samples(&fs::read(path)?))
}

/// Write a whole sample file, replacing any previous content
pub fn write_samples<P: AsRef<Path>>(path: P, samples: &[f32]) -> Result<()> {
    fs::write(path, encode_samples(samples))?;
    Ok(())
}
