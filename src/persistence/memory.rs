use std::collections::VecDeque;

use super::SampleStore;
use crate::error::{Result, ZdfError};

/// In-memory [`SampleStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub seed: Vec<f32>,
    pub input: VecDeque<f32>,
    pub outputs: Vec<Vec<f32>>,
    pub snapshot: Option<Vec<f32>>,
}

impl MemoryStore {
    pub fn new(seed: Vec<f32>, input: impl IntoIterator<Item = f32>) -> Self {
        Self {
            seed,
            input: input.into_iter().collect(),
            outputs: Vec::new(),
            snapshot: None,
        }
    }
}

impl SampleStore for MemoryStore {
    fn read_seed(&mut self, len: usize) -> Result<Vec<f32>> {
        if self.seed.len() < len {
            return Err(ZdfError::SeedShortage {
                needed: len,
                available: self.seed.len(),
            });
        }
        Ok(self.seed[..len].to_vec())
    }

    fn next_sample(&mut self) -> Result<Option<f32>> {
        Ok(self.input.pop_front())
    }

    fn begin_output(&mut self) -> Result<()> {
        self.outputs.clear();
        Ok(())
    }

    fn write_output(&mut self, record: &[f32]) -> Result<()> {
        self.outputs.push(record.to_vec());
        Ok(())
    }

    fn write_snapshot(&mut self, samples: &[f32]) -> Result<()> {
        self.snapshot = Some(samples.to_vec());
        Ok(())
    }
}
