//! Command-line front end for `jitter-sim`: WAV decoding and encoding,
//! TOML run configuration, spectrogram analysis and CSV/JSON report data.

pub mod config;
pub mod report;
pub mod run;
pub mod spectrogram;
pub mod wav;

pub use config::{ConfigOverrides, RunConfig};
pub use run::{execute, RunRequest, RunSummary};
