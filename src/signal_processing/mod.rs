pub mod filter_bank;
pub mod kernel;
pub mod math;
pub mod ring;

pub use filter_bank::FilterBank;
pub use math::{binomial, delay, required_length};
pub use ring::{CircularBuffer, rectify};
