//! Resampler
//!
//! Reconstructs a channel at its jittered read times from the samples on
//! the nominal grid.

use crate::error::{ensure_len, JitterError, Result};
use crate::params::InterpolationMethod;

/// Nominal sample times `t_i = i / sample_rate` for `i in 0..n`.
pub fn nominal_times(n: usize, sample_rate: u32) -> Result<Vec<f64>> {
    if sample_rate == 0 {
        return Err(JitterError::InvalidParameter {
            name: "sample_rate",
            value: 0.0,
            constraint: "must be greater than zero",
        });
    }

    let sr = f64::from(sample_rate);
    Ok((0..n).map(|i| i as f64 / sr).collect())
}

/// Evaluate the `method` interpolant of `(nominal_times, original)` at every
/// `jittered_times[i]`. Output index `i` is nominal sample `i` read back at
/// its jittered time.
pub fn resample(
    original: &[f64],
    nominal_times: &[f64],
    jittered_times: &[f64],
    method: InterpolationMethod,
) -> Result<Vec<f64>> {
    if original.len() < 2 {
        return Err(JitterError::DegenerateInput {
            len: original.len(),
        });
    }
    ensure_len("nominal times", original.len(), nominal_times.len())?;
    ensure_len("jittered times", original.len(), jittered_times.len())?;

    let interpolant = method.build(nominal_times, original)?;
    Ok(interpolant.evaluate_many(jittered_times))
}

/// Reconstruction step used by the channel coordinator.
pub trait Resampler {
    fn resample(&self, original: &[f64], nominal: &[f64], jittered: &[f64]) -> Result<Vec<f64>>;
}

/// [`Resampler`] backed by one of the built-in interpolation kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelResampler {
    pub method: InterpolationMethod,
}

impl KernelResampler {
    pub fn new(method: InterpolationMethod) -> Self {
        Self { method }
    }
}

impl Resampler for KernelResampler {
    fn resample(&self, original: &[f64], nominal: &[f64], jittered: &[f64]) -> Result<Vec<f64>> {
        resample(original, nominal, jittered, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_times_grid() {
        let times = nominal_times(4, 8).unwrap();
        assert_eq!(times, vec![0.0, 0.125, 0.25, 0.375]);
        assert!(nominal_times(4, 0).is_err());
    }

    #[test]
    fn test_nearest_unit_rate_identity() {
        let original = [0.3, -0.1, 0.8, 0.0, -0.5];
        let grid = [0.0, 1.0, 2.0, 3.0, 4.0];
        let out = resample(&original, &grid, &grid, InterpolationMethod::Nearest).unwrap();
        assert_eq!(out, original.to_vec());
    }

    #[test]
    fn test_resample_keeps_index_order_for_out_of_order_times() {
        let original = [0.0, 10.0, 20.0, 30.0];
        let grid = [0.0, 1.0, 2.0, 3.0];
        let jittered = [0.0, 2.2, 0.9, 3.0];
        let out = resample(&original, &grid, &jittered, InterpolationMethod::Linear).unwrap();
        assert!((out[1] - 22.0).abs() < 1e-12);
        assert!((out[2] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_resample_extrapolates_past_edges() {
        let original = [0.0, 1.0, 2.0];
        let grid = [0.0, 1.0, 2.0];
        let jittered = [-0.5, 1.0, 2.5];

        let linear = resample(&original, &grid, &jittered, InterpolationMethod::Linear).unwrap();
        assert_eq!(linear, vec![-0.5, 1.0, 2.5]);

        let held = resample(&original, &grid, &jittered, InterpolationMethod::Zero).unwrap();
        assert_eq!(held, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_resample_degenerate_input() {
        let err = resample(&[1.0], &[0.0], &[0.0], InterpolationMethod::Cubic).unwrap_err();
        assert_eq!(err, JitterError::DegenerateInput { len: 1 });
    }

    #[test]
    fn test_resample_length_checks() {
        let err = resample(&[1.0, 2.0], &[0.0, 1.0], &[0.0], InterpolationMethod::Cubic)
            .unwrap_err();
        assert!(matches!(
            err,
            JitterError::LengthMismatch {
                context: "jittered times",
                ..
            }
        ));
    }
}
