//! Sample buffers
//!
//! Channel-major audio: one `Vec<f64>` per channel, all of equal length.

use crate::error::{ensure_len, JitterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer; every channel must have the length of the first.
    pub fn new(channels: Vec<Vec<f64>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(JitterError::InvalidParameter {
                name: "sample_rate",
                value: 0.0,
                constraint: "must be greater than zero",
            });
        }

        if let Some(first) = channels.first() {
            for channel in &channels[1..] {
                ensure_len("channel", first.len(), channel.len())?;
            }
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    pub fn stereo(left: Vec<f64>, right: Vec<f64>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![left, right], sample_rate)
    }

    /// De-interleave sample-major frames (`L R L R ...`).
    pub fn from_interleaved(samples: &[f64], channel_count: usize, sample_rate: u32) -> Result<Self> {
        if channel_count == 0 {
            return Err(JitterError::UnsupportedFormat { channels: 0 });
        }
        let frames = samples.len() / channel_count;
        ensure_len("interleaved samples", frames * channel_count, samples.len())?;

        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &value) in channels.iter_mut().zip(frame) {
                channel.push(value);
            }
        }

        Self::new(channels, sample_rate)
    }

    /// Interleave back into sample-major frames.
    pub fn to_interleaved(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len() * self.channel_count());
        for frame in 0..self.len() {
            out.extend(self.channels.iter().map(|channel| channel[frame]));
        }
        out
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }

    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / f64::from(self.sample_rate)
    }
}
