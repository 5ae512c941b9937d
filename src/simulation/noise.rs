use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    /// Standard deviation of the additive Gaussian noise
    pub std_dev: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: None,
            std_dev: 0.2,
        }
    }
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_std_dev(mut self, std_dev: f32) -> Self {
        self.std_dev = std_dev;
        self
    }
}

pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Add white Gaussian noise to `samples` in place
pub fn add_noise(samples: &mut [f32], config: &NoiseConfig) {
    if config.std_dev <= 0.0 {
        return;
    }
    let Ok(normal) = Normal::new(0.0, config.std_dev) else {
        return;
    };
    let mut rng = create_rng(config.seed);
    for s in samples.iter_mut() {
        *s += normal.sample(&mut rng);
    }
}

/// `len` samples of zero-mean Gaussian noise
pub fn noise_sequence(len: usize, std_dev: f32, seed: u64) -> Vec<f32> {
    let mut samples = vec![0.0f32; len];
    add_noise(
        &mut samples,
        &NoiseConfig::default().with_seed(seed).with_std_dev(std_dev),
    );
    samples
}
