use std::sync::Arc;

use log::info;

use crate::config::FilterSpec;
use crate::engine::ZdfEngine;
use crate::error::Result;
use crate::persistence::SampleStore;
use crate::signal_processing::FilterBank;

/// Batch driver: seeds an engine from a store, streams the store's input
/// through it and writes estimates and snapshots back
pub struct ZdfProcessor<S: SampleStore> {
    engine: ZdfEngine,
    store: S,
}

impl<S: SampleStore> ZdfProcessor<S> {
    /// Build the bank for `spec` and seed it from `store`
    pub fn new(spec: &FilterSpec, store: S) -> Result<Self> {
        let bank = Arc::new(FilterBank::build(spec)?);
        Self::with_bank(bank, store)
    }

    /// Seed an engine on an existing bank from `store`
    pub fn with_bank(bank: Arc<FilterBank>, mut store: S) -> Result<Self> {
        let seed = store.read_seed(bank.len())?;
        let engine = ZdfEngine::new(bank, &seed)?;
        Ok(Self { engine, store })
    }

    /// Process input until it is exhausted, writing one record per sample
    /// into a fresh output stream
    ///
    /// Returns the number of samples processed.
    pub fn run(&mut self) -> Result<usize> {
        self.store.begin_output()?;
        let mut count = 0;
        while let Some(x) = self.store.next_sample()? {
            let record = self.engine.update(x);
            self.store.write_output(record)?;
            count += 1;
        }
        self.store.flush()?;
        info!(
            "Processed {} samples into {} channels",
            count,
            self.engine.bank().num_channels()
        );
        Ok(count)
    }

    /// Realign the history and persist it as a snapshot
    pub fn checkpoint(&mut self) -> Result<()> {
        let snapshot = self.engine.canonical();
        self.store.write_snapshot(snapshot)?;
        info!("Wrote snapshot of {} samples", snapshot.len());
        Ok(())
    }

    pub fn engine(&self) -> &ZdfEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
