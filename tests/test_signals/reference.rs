use zdf::FilterBank;
use zdf::simulation::noise_sequence;

/// Reproducible noisy stream of `len` samples
pub fn random_stream(len: usize, seed: u64) -> Vec<f32> {
    noise_sequence(len, 1.0, seed)
}

/// The `length` most recent samples after `consumed` inputs, oldest first
pub fn sliding_window(seed: &[f32], inputs: &[f32], consumed: usize, length: usize) -> Vec<f32> {
    let history: Vec<f32> = seed[..length]
        .iter()
        .chain(&inputs[..consumed])
        .copied()
        .collect();
    history[history.len() - length..].to_vec()
}

/// Every channel applied to a chronological window, without any ring logic
pub fn direct_convolution(bank: &FilterBank, window: &[f32]) -> Vec<f64> {
    (0..bank.num_channels())
        .map(|fx| {
            (0..bank.len())
                .map(|i| bank.tap(i, fx) * f64::from(window[i]))
                .sum()
        })
        .collect()
}
