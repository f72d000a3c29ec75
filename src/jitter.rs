//! Jitter generator
//!
//! Draws per-sample timing offsets from a zero-mean normal distribution.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{ensure_len, JitterError, Result};
use crate::params::JitterSpec;

/// Draw `n` independent offsets (seconds) from `Normal(0, spec.std_secs())`.
pub fn generate_jitter<R: Rng + ?Sized>(n: usize, spec: JitterSpec, rng: &mut R) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(JitterError::DegenerateInput { len: n });
    }

    let dist = Normal::new(0.0, spec.std_secs()).map_err(|_| JitterError::InvalidParameter {
        name: "jitter_std",
        value: spec.std_secs(),
        constraint: "must be a finite value greater than zero",
    })?;

    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

/// Perturb a nominal grid: `t_i + e_i`.
pub fn jittered_times(nominal: &[f64], jitter: &[f64]) -> Result<Vec<f64>> {
    ensure_len("jitter", nominal.len(), jitter.len())?;
    Ok(nominal.iter().zip(jitter).map(|(&t, &e)| t + e).collect())
}
