//! Uniform and Gaussian variates drawn from an explicit random source.
//!
//! Every function takes the generator as a parameter, so a seeded
//! [`ChaCha8Rng`] makes a whole run reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::{PI, TAU};

use crate::error::DomainError;

/// Deterministic generator for the given seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A fresh seed taken from the thread-local entropy source.
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// `n` angles uniformly distributed in (-π, π].
pub fn uniform_angle<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    // u in [0, 1) maps onto (-π, π]
    (0..n).map(|_| PI - TAU * rng.random::<f64>()).collect()
}

/// One standard-normal draw, `sqrt(-2 ln u1) cos(2π u2)`.
///
/// `u1 = 0` would take the log of zero, so such draws are rejected and redrawn.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = loop {
        let u: f64 = rng.random();
        if u > 0.0 {
            break u;
        }
    };
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// `n` samples of Normal(mean, std_dev²) by the inverse-transform
/// (Box–Muller) closed form.
pub fn gaussian_inverse_transform<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    std_dev: f64,
    n: usize,
) -> Result<Vec<f64>, DomainError> {
    if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
        return Err(DomainError::InvalidGaussian { mean, std_dev });
    }
    Ok((0..n).map(|_| mean + std_dev * standard_normal(rng)).collect())
}
