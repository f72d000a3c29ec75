//! Channel coordinator
//!
//! Applies jitter and resampling to each channel of a mono or stereo
//! buffer, then reconciles the channel lengths and recombines them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::buffer::SampleBuffer;
use crate::error::{JitterError, Result};
use crate::jitter::{generate_jitter, jittered_times};
use crate::params::{InterpolationMethod, JitterSpec};
use crate::resample::{nominal_times, KernelResampler, Resampler};

/// Channel layouts accepted by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub fn classify(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            other => Err(JitterError::UnsupportedFormat { channels: other }),
        }
    }

    pub fn channel_count(&self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Resampled audio plus the raw offsets drawn for every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct JitterOutcome {
    pub buffer: SampleBuffer,
    /// Per-channel jitter in seconds, in channel order
    pub jitter: Vec<Vec<f64>>,
}

impl JitterOutcome {
    /// Jitter of channel 0 (the left channel for stereo)
    pub fn primary_jitter(&self) -> &[f64] {
        self.jitter.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

pub struct ChannelCoordinator<R> {
    resampler: R,
}

impl<R: Resampler> ChannelCoordinator<R> {
    pub fn new(resampler: R) -> Self {
        Self { resampler }
    }

    /// Jitter and resample every channel of `buffer`.
    ///
    /// One seed is drawn from `rng`; channel `c` then uses stream `c` of a
    /// ChaCha generator with that seed, so channels never share offsets.
    /// Nothing is returned unless every channel succeeds.
    pub fn run<G: Rng + ?Sized>(
        &self,
        buffer: &SampleBuffer,
        spec: JitterSpec,
        rng: &mut G,
    ) -> Result<JitterOutcome> {
        let layout = ChannelLayout::classify(buffer.channel_count())?;
        let nominal = nominal_times(buffer.len(), buffer.sample_rate())?;
        let seed: u64 = rng.gen();

        let mut outputs = Vec::with_capacity(layout.channel_count());
        let mut jitter = Vec::with_capacity(layout.channel_count());
        for (index, samples) in buffer.channels().iter().enumerate() {
            let mut stream = channel_stream(seed, index);
            let offsets = generate_jitter(samples.len(), spec, &mut stream)?;
            let times = jittered_times(&nominal, &offsets)?;
            outputs.push(self.resampler.resample(samples, &nominal, &times)?);
            jitter.push(offsets);
        }

        pad_to_common_length(&mut outputs)?;

        Ok(JitterOutcome {
            buffer: SampleBuffer::new(outputs, buffer.sample_rate())?,
            jitter,
        })
    }
}

/// Jitter a mono or stereo buffer with one of the built-in kernels.
pub fn apply<G: Rng + ?Sized>(
    buffer: &SampleBuffer,
    spec: JitterSpec,
    method: InterpolationMethod,
    rng: &mut G,
) -> Result<JitterOutcome> {
    ChannelCoordinator::new(KernelResampler::new(method)).run(buffer, spec, rng)
}

fn channel_stream(seed: u64, index: usize) -> ChaCha8Rng {
    let mut stream = ChaCha8Rng::seed_from_u64(seed);
    stream.set_stream(index as u64);
    stream
}

/// Extend shorter channels to the longest length by repeating their last
/// value. Returns the common length.
pub fn pad_to_common_length(channels: &mut [Vec<f64>]) -> Result<usize> {
    let target = channels.iter().map(Vec::len).max().unwrap_or(0);

    for channel in channels.iter_mut() {
        if channel.len() == target {
            continue;
        }
        let edge = *channel
            .last()
            .ok_or(JitterError::DegenerateInput { len: 0 })?;
        channel.resize(target, edge);
    }

    Ok(target)
}
