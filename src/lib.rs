//! jitter-sim - sample-clock jitter simulation
//!
//! Perturbs each sample's read time by a Gaussian offset and reconstructs
//! the waveform at the perturbed times with a selectable interpolation
//! kernel, independently per channel for mono and stereo audio.

pub mod buffer;
pub mod channel;
pub mod error;
pub mod interp;
pub mod jitter;
pub mod params;
pub mod preset;
pub mod resample;

// Re-export main types
pub use buffer::SampleBuffer;
pub use channel::{apply, pad_to_common_length, ChannelCoordinator, ChannelLayout, JitterOutcome};
pub use error::{JitterError, Result};
pub use interp::Interpolant;
pub use jitter::{generate_jitter, jittered_times};
pub use params::{InterpolationMethod, JitterSpec};
pub use preset::{HardwarePreset, JitterSetting};
pub use resample::{nominal_times, resample, KernelResampler, Resampler};
