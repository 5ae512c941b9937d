//! Closed-form minimal-delay kernels and the hull-weight solve
//!
//! The minimal kernel of derivative order `n` is, up to a scale, the `n`-th
//! derivative of `tau^(kappa+n) * (1-tau)^(mu+n)` sampled on the grid
//! `tau[i] = (N-1-i)/N`, expanded with the Leibniz rule.

use nalgebra::{DMatrix, DVector};

use super::math::binomial;
use crate::error::{Result, ZdfError};

/// Time-before-present grid `tau[i] = (N-1-i)/N`; tap `N-1` is the newest
pub fn tau_grid(length: usize) -> Vec<f64> {
    let n = length as f64;
    (0..length).map(|i| (length - 1 - i) as f64 / n).collect()
}

/// Accumulate `lambda` times the minimal kernel `h(n, kappa, mu)` into `out`
pub fn minimal_kernel(n: u32, kappa: u32, mu: u32, lambda: f64, tau: &[f64], out: &mut [f64]) {
    debug_assert_eq!(tau.len(), out.len());

    let gamma = lambda * f64::from(mu + n + 1) * binomial(kappa + mu + 2 * n + 1, kappa + n)
        / tau.len() as f64;
    let mut w: f64 = (1..=n).map(|i| f64::from(kappa + i)).product();

    for ix in 0..=n {
        let sign = if ix % 2 == 1 { -1.0 } else { 1.0 };
        let coeff = sign * w * binomial(n, ix) * gamma;
        let tau_power = (kappa + ix) as i32;
        let rest_power = (mu + n - ix) as i32;
        for (o, &t) in out.iter_mut().zip(tau) {
            *o += coeff * t.powi(tau_power) * (1.0 - t).powi(rest_power);
        }
        w *= f64::from(mu + n - ix) / f64::from(kappa + ix + 1);
    }
}

/// Gram matrix whose solution against the last unit vector gives the weights
/// of the `q + 1` minimal filters combined into one hull filter
pub fn gram_matrix(n: u32, kappa: u32, mu: u32, q: u32) -> DMatrix<f64> {
    let c = 1.0 / binomial(mu + kappa + 2 * (n + q) + 1, q);
    let size = q as usize + 1;
    DMatrix::from_fn(size, size, |i, j| {
        let (i, j) = (i as u32, j as u32);
        c * binomial(mu + n + i + j, mu + n + j)
            * binomial(kappa + n + 2 * q - i - j, kappa + n + q - j)
    })
}

/// Solve `gram * lambda = e_last`
///
/// # Errors
/// Returns `ZdfError::LinearSolve` if the system is singular or the solution
/// is not finite
pub fn solve_hull_weights(gram: DMatrix<f64>) -> Result<DVector<f64>> {
    let size = gram.nrows();
    let mut rhs = DVector::<f64>::zeros(size);
    rhs[size - 1] = 1.0;

    let weights = gram.lu().solve(&rhs).ok_or_else(|| {
        ZdfError::LinearSolve(format!("singular {}x{} Gram system", size, size))
    })?;

    if weights.iter().any(|w| !w.is_finite()) {
        return Err(ZdfError::LinearSolve(format!(
            "non-finite hull weights for {}x{} Gram system",
            size, size
        )));
    }
    Ok(weights)
}

/// Hull weights `lambda[0..=q]` for derivative order `n` at `(kappa, mu)`
pub fn hull_weights(n: u32, kappa: u32, mu: u32, q: u32) -> Result<DVector<f64>> {
    solve_hull_weights(gram_matrix(n, kappa, mu, q))
}
