pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod output;
pub mod persistence;
pub mod processing;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{ChannelKey, FilterSpec, FilterSpecConfig, LengthQuery};
pub use engine::ZdfEngine;
pub use error::{Result, ZdfError};
pub use persistence::{FileStore, MemoryStore, SampleStore};
pub use processing::ZdfProcessor;
pub use signal_processing::FilterBank;
