//! Jitter parameters
//!
//! Validated timing-noise magnitude and the interpolation method selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{JitterError, Result};

/// Standard deviation of the zero-mean Gaussian timing offset, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JitterSpec {
    jitter_std: f64,
}

impl JitterSpec {
    /// Create a jitter specification; `jitter_std` must be finite and > 0.
    pub fn new(jitter_std: f64) -> Result<Self> {
        if !jitter_std.is_finite() || jitter_std <= 0.0 {
            return Err(JitterError::InvalidParameter {
                name: "jitter_std",
                value: jitter_std,
                constraint: "must be a finite value greater than zero",
            });
        }

        Ok(Self { jitter_std })
    }

    /// Standard deviation in seconds
    pub fn std_secs(&self) -> f64 {
        self.jitter_std
    }

    /// Scale the deviation, re-validating the result.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        Self::new(self.jitter_std * factor)
    }
}

impl<'de> Deserialize<'de> for JitterSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        JitterSpec::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Reconstruction kernel used when reading samples back at jittered times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Step to the closest nominal sample
    Nearest,
    /// Piecewise linear
    Linear,
    /// First-order spline
    Slinear,
    /// Second-order spline
    Quadratic,
    /// Third-order not-a-knot spline
    #[default]
    Cubic,
    /// Hold the previous sample
    Zero,
}

impl InterpolationMethod {
    pub const ALL: [InterpolationMethod; 6] = [
        InterpolationMethod::Nearest,
        InterpolationMethod::Linear,
        InterpolationMethod::Slinear,
        InterpolationMethod::Quadratic,
        InterpolationMethod::Cubic,
        InterpolationMethod::Zero,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Slinear => "slinear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Zero => "zero",
        }
    }

    /// Polynomial degree of the spline kernels, `None` for the others.
    pub fn spline_degree(&self) -> Option<usize> {
        match self {
            Self::Slinear => Some(1),
            Self::Quadratic => Some(2),
            Self::Cubic => Some(3),
            Self::Nearest | Self::Linear | Self::Zero => None,
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationMethod {
    type Err = JitterError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == wanted)
            .ok_or_else(|| JitterError::UnsupportedMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_spec_rejects_non_positive() {
        assert!(JitterSpec::new(1e-6).is_ok());
        for bad in [0.0, -1e-6, f64::NAN, f64::INFINITY] {
            let err = JitterSpec::new(bad).unwrap_err();
            assert!(matches!(
                err,
                JitterError::InvalidParameter {
                    name: "jitter_std",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_scaled_jitter_std() {
        let spec = JitterSpec::new(1e-6).unwrap().scaled(2.5).unwrap();
        assert!((spec.std_secs() - 2.5e-6).abs() < 1e-18);
        assert!(JitterSpec::new(1e-6).unwrap().scaled(0.0).is_err());
    }

    #[test]
    fn test_method_parse_round_trip() {
        for method in InterpolationMethod::ALL {
            assert_eq!(method.as_str().parse::<InterpolationMethod>(), Ok(method));
        }
        assert_eq!(" Cubic ".parse::<InterpolationMethod>(), Ok(InterpolationMethod::Cubic));
    }

    #[test]
    fn test_unknown_method() {
        let err = "sinc".parse::<InterpolationMethod>().unwrap_err();
        assert_eq!(err, JitterError::UnsupportedMethod("sinc".to_string()));
    }

    #[test]
    fn test_default_method_is_cubic() {
        assert_eq!(InterpolationMethod::default(), InterpolationMethod::Cubic);
    }
}
