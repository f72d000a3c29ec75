//! Hardware presets
//!
//! Typical clock-jitter magnitudes for classes of converter hardware, and
//! the setting that turns a preset (or a manual value) into a
//! [`JitterSpec`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{JitterError, Result};
use crate::params::JitterSpec;

pub const MULTIPLIER_MIN: f64 = 0.5;
pub const MULTIPLIER_MAX: f64 = 5.0;
pub const DEFAULT_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_MANUAL_JITTER_STD: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardwarePreset {
    HighEndDac,
    #[default]
    ConsumerGrade,
    VintageGear,
}

impl HardwarePreset {
    pub const ALL: [HardwarePreset; 3] = [
        HardwarePreset::HighEndDac,
        HardwarePreset::ConsumerGrade,
        HardwarePreset::VintageGear,
    ];

    /// Nominal jitter standard deviation in seconds
    pub fn jitter_std(&self) -> f64 {
        match self {
            Self::HighEndDac => 1e-7,
            Self::ConsumerGrade => 1e-6,
            Self::VintageGear => 5e-6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HighEndDac => "High-End DAC",
            Self::ConsumerGrade => "Consumer Grade",
            Self::VintageGear => "Vintage Gear",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::HighEndDac => "high-end-dac",
            Self::ConsumerGrade => "consumer-grade",
            Self::VintageGear => "vintage-gear",
        }
    }
}

impl fmt::Display for HardwarePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HardwarePreset {
    type Err = JitterError;

    /// Accepts the kebab-case key or the display label, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(wanted) || p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| JitterError::UnknownPreset(s.to_string()))
    }
}

/// Where the jitter magnitude comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum JitterSetting {
    Preset {
        preset: HardwarePreset,
        multiplier: f64,
    },
    Manual {
        jitter_std: f64,
    },
}

impl Default for JitterSetting {
    fn default() -> Self {
        Self::Preset {
            preset: HardwarePreset::default(),
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl JitterSetting {
    pub fn resolve(&self) -> Result<JitterSpec> {
        match *self {
            Self::Preset { preset, multiplier } => {
                validate_multiplier(multiplier)?;
                JitterSpec::new(preset.jitter_std() * multiplier)
            }
            Self::Manual { jitter_std } => JitterSpec::new(jitter_std),
        }
    }
}

pub fn validate_multiplier(multiplier: f64) -> Result<()> {
    if !(MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&multiplier) {
        return Err(JitterError::InvalidParameter {
            name: "multiplier",
            value: multiplier,
            constraint: "must be within [0.5, 5.0]",
        });
    }
    Ok(())
}
