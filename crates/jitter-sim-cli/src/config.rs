use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use jitter_sim::preset::DEFAULT_MULTIPLIER;
use jitter_sim::{HardwarePreset, InterpolationMethod, JitterSetting, JitterSpec};

pub const DEFAULT_SNIPPET_SAMPLES: usize = 500;
pub const DEFAULT_HISTOGRAM_BINS: usize = 100;
pub const DEFAULT_SPECTROGRAM_FRAMES: usize = 512;

/// Run configuration, loaded from TOML and overridden from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub preset: HardwarePreset,
    pub multiplier: f64,
    /// When set, replaces the preset with a fixed standard deviation [s]
    pub manual_jitter_std: Option<JitterSpec>,
    pub method: InterpolationMethod,
    pub seed: Option<u64>,
    /// Samples of the left channel written to the waveform comparison
    pub snippet_samples: usize,
    pub histogram_bins: usize,
    /// Frames of the left channel written to the spectrogram comparison
    pub spectrogram_frames: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            preset: HardwarePreset::default(),
            multiplier: DEFAULT_MULTIPLIER,
            manual_jitter_std: None,
            method: InterpolationMethod::default(),
            seed: None,
            snippet_samples: DEFAULT_SNIPPET_SAMPLES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            spectrogram_frames: DEFAULT_SPECTROGRAM_FRAMES,
        }
    }
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: RunConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.jitter_setting()
            .resolve()
            .context("invalid jitter setting")?;
        if self.snippet_samples == 0 {
            bail!("snippet_samples must be > 0");
        }
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be > 0");
        }
        if self.spectrogram_frames == 0 {
            bail!("spectrogram_frames must be > 0");
        }
        Ok(())
    }

    pub fn jitter_setting(&self) -> JitterSetting {
        match self.manual_jitter_std {
            Some(spec) => JitterSetting::Manual {
                jitter_std: spec.std_secs(),
            },
            None => JitterSetting::Preset {
                preset: self.preset,
                multiplier: self.multiplier,
            },
        }
    }

    /// Layer command-line values over the file. A preset or multiplier
    /// given on the command line switches back to preset mode, and a
    /// manual value switches to manual mode.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(preset) = overrides.preset {
            self.preset = preset;
            self.manual_jitter_std = None;
        }
        if let Some(multiplier) = overrides.multiplier {
            self.multiplier = multiplier;
            self.manual_jitter_std = None;
        }
        if let Some(manual) = overrides.manual_jitter_std {
            let spec = JitterSpec::new(manual).context("invalid --manual value")?;
            self.manual_jitter_std = Some(spec);
        }
        if let Some(method) = overrides.method {
            self.method = method;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        Ok(())
    }
}

/// Values taken from command-line flags; `None` keeps the file's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub preset: Option<HardwarePreset>,
    pub multiplier: Option<f64>,
    pub manual_jitter_std: Option<f64>,
    pub method: Option<InterpolationMethod>,
    pub seed: Option<u64>,
}
