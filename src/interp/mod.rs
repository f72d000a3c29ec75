//! Interpolation kernels
//!
//! Each [`InterpolationMethod`] builds an [`Interpolant`] from samples on a
//! strictly increasing time grid. Every interpolant can be evaluated at any
//! query time: outside the sampled domain it extrapolates with the kernel's
//! own boundary behaviour (value hold for the step kernels, continuation of
//! the end segment or polynomial piece for the others).

mod bspline;
mod linear;
mod step;

pub use bspline::BSpline;
pub use linear::PiecewiseLinear;
pub use step::{NearestStep, ZeroHold};

use std::cmp::Ordering;

use crate::error::{ensure_len, JitterError, Result};
use crate::params::InterpolationMethod;

/// A continuous function fit to `(time, value)` pairs.
#[derive(Debug, Clone)]
pub enum Interpolant {
    Nearest(NearestStep),
    Zero(ZeroHold),
    Linear(PiecewiseLinear),
    Spline(BSpline),
}

impl Interpolant {
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Nearest(kernel) => kernel.evaluate(t),
            Self::Zero(kernel) => kernel.evaluate(t),
            Self::Linear(kernel) => kernel.evaluate(t),
            Self::Spline(kernel) => kernel.evaluate(t),
        }
    }

    pub fn evaluate_many(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }
}

impl InterpolationMethod {
    /// Fit this kernel to `values` sampled at `times`.
    ///
    /// `times` must be strictly increasing and hold at least two points.
    /// Spline orders that need more points than are available are reduced
    /// to `times.len() - 1`.
    pub fn build(&self, times: &[f64], values: &[f64]) -> Result<Interpolant> {
        validate_grid(times, values)?;

        let interpolant = match self {
            Self::Nearest => Interpolant::Nearest(NearestStep::new(times, values)),
            Self::Zero => Interpolant::Zero(ZeroHold::new(times, values)),
            Self::Linear => Interpolant::Linear(PiecewiseLinear::new(times, values)),
            Self::Slinear | Self::Quadratic | Self::Cubic => {
                let degree = self.spline_degree().unwrap_or(1).min(times.len() - 1);
                Interpolant::Spline(BSpline::interpolate(times, values, degree))
            }
        };

        Ok(interpolant)
    }
}

fn validate_grid(times: &[f64], values: &[f64]) -> Result<()> {
    ensure_len("interpolation values", times.len(), values.len())?;

    if times.len() < 2 {
        return Err(JitterError::DegenerateInput { len: times.len() });
    }

    if let Some(index) = times
        .windows(2)
        .position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater))
    {
        return Err(JitterError::UnsortedTimes { index: index + 1 });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    const VALUES: [f64; 6] = [0.0, 1.0, 4.0, 9.0, 16.0, 25.0];

    #[test]
    fn test_every_method_passes_through_samples() {
        for method in InterpolationMethod::ALL {
            let interp = method.build(&TIMES, &VALUES).unwrap();
            for (&t, &v) in TIMES.iter().zip(VALUES.iter()) {
                assert!(
                    (interp.evaluate(t) - v).abs() < 1e-9,
                    "{method} at t={t}: {} != {v}",
                    interp.evaluate(t)
                );
            }
        }
    }

    #[test]
    fn test_build_rejects_single_point() {
        let err = InterpolationMethod::Cubic.build(&[0.0], &[1.0]).unwrap_err();
        assert_eq!(err, JitterError::DegenerateInput { len: 1 });
    }

    #[test]
    fn test_build_rejects_unsorted_grid() {
        let err = InterpolationMethod::Linear
            .build(&[0.0, 2.0, 1.0], &[0.0, 0.0, 0.0])
            .unwrap_err();
        assert_eq!(err, JitterError::UnsortedTimes { index: 2 });

        let err = InterpolationMethod::Linear
            .build(&[0.0, 0.0], &[0.0, 0.0])
            .unwrap_err();
        assert_eq!(err, JitterError::UnsortedTimes { index: 1 });
    }

    #[test]
    fn test_build_rejects_length_mismatch() {
        let err = InterpolationMethod::Zero
            .build(&[0.0, 1.0, 2.0], &[0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, JitterError::LengthMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn test_quadratic_reproduces_parabola_with_extrapolation() {
        let interp = InterpolationMethod::Quadratic.build(&TIMES, &VALUES).unwrap();
        for t in [-1.0, 0.5, 2.25, 4.75, 6.0] {
            assert!((interp.evaluate(t) - t * t).abs() < 1e-9, "t={t}");
        }
    }

    #[test]
    fn test_cubic_reproduces_cubic_with_extrapolation() {
        let values: Vec<f64> = TIMES.iter().map(|t| t * t * t - 2.0 * t).collect();
        let interp = InterpolationMethod::Cubic.build(&TIMES, &values).unwrap();
        for t in [-0.5, 0.3, 2.5, 4.9, 5.5] {
            let expected = t * t * t - 2.0 * t;
            assert!((interp.evaluate(t) - expected).abs() < 1e-8, "t={t}");
        }
    }

    #[test]
    fn test_cubic_order_reduced_for_short_input() {
        let two = InterpolationMethod::Cubic.build(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
        assert!((two.evaluate(0.5) - 2.0).abs() < 1e-12);
        assert!((two.evaluate(2.0) - 5.0).abs() < 1e-12);

        let three = InterpolationMethod::Cubic
            .build(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0])
            .unwrap();
        assert!((three.evaluate(1.5) - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_linear_and_slinear_agree() {
        let linear = InterpolationMethod::Linear.build(&TIMES, &VALUES).unwrap();
        let slinear = InterpolationMethod::Slinear.build(&TIMES, &VALUES).unwrap();
        for t in [-2.0, 0.1, 1.5, 3.7, 5.0, 7.5] {
            assert!((linear.evaluate(t) - slinear.evaluate(t)).abs() < 1e-9, "t={t}");
        }
    }

    #[test]
    fn test_evaluate_many_keeps_order() {
        let interp = InterpolationMethod::Linear.build(&TIMES, &VALUES).unwrap();
        assert_eq!(interp.evaluate_many(&[2.0, 0.0, 1.0]), vec![4.0, 0.0, 1.0]);
    }
}
