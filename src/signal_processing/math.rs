use crate::constants::{MAX_LENGTH, REQUIRED_LENGTH_COEFS};
use crate::error::{Result, ZdfError};

/// Binomial coefficient `C(n, r)` via the multiplicative product
///
/// Every intermediate quotient is exact, so the result is exact for the
/// orders used by the filter bank. Returns 0 when `r > n`.
pub fn binomial(n: u32, r: u32) -> f64 {
    if r > n {
        return 0.0;
    }
    let r = r.max(n - r);
    let mut x: u128 = 1;
    for ix in 1..=u128::from(n - r) {
        x = x * (u128::from(r) + ix) / ix;
    }
    x as f64
}

/// Dot product of filter taps with raw samples, accumulated in `f64`
pub fn dot(taps: &[f64], samples: &[f32]) -> f64 {
    debug_assert_eq!(taps.len(), samples.len());
    taps.iter()
        .zip(samples)
        .map(|(&h, &x)| h * f64::from(x))
        .sum()
}

/// Fractional-of-window delay of the minimal filter of derivative order `n`
///
/// Always in `[0, 1)`.
pub fn delay(n: u32, kappa: u32, mu: u32) -> f64 {
    f64::from(kappa + n + 1) / f64::from(mu + kappa + 2 * (n + 1))
}

/// Recommended minimum filter length for a signal-to-noise ratio and a target
/// shape similarity of the second-derivative estimate
///
/// The signal-to-noise ratio is the RMS of the signal over the standard
/// deviation of the noise. Advisory only; the result is clamped to the
/// supported lengths `1..=65535`.
///
/// # Errors
/// Returns `ZdfError::Config` unless `snr > 0`, `snr != 1` and
/// `0 < similarity < 1`
pub fn required_length(snr: f64, similarity: f64) -> Result<usize> {
    if !snr.is_finite() || snr <= 0.0 || snr == 1.0 {
        return Err(ZdfError::Config(format!(
            "snr must be positive and not 1, got {}",
            snr
        )));
    }
    if similarity.is_nan() || similarity <= 0.0 || similarity >= 1.0 {
        return Err(ZdfError::Config(format!(
            "similarity must be in (0, 1), got {}",
            similarity
        )));
    }

    let [c0, c1, c2] = REQUIRED_LENGTH_COEFS;
    let ilsnr = 1.0 / snr.ln();
    let exponent = c0 + c1 * ilsnr + c2 * (1.0 - similarity).ln() * ilsnr;
    let length = 2f64.powf(exponent);
    Ok((length as usize).clamp(1, MAX_LENGTH))
}
