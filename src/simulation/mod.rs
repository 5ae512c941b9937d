mod noise;
mod signal;

pub use noise::{NoiseConfig, add_noise, create_rng, noise_sequence};
pub use signal::{
    DampedOscillation, SIGNAL_DURATION, SyntheticConfig, SyntheticData, generate_synthetic_data,
    sample_times,
};
