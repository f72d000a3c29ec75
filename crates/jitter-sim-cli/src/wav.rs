//! WAV decoding and encoding
//!
//! Samples are carried as `f64` in [-1, 1). The source `WavSpec` is kept so
//! the output is written with the same bit depth and sample format.

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

use jitter_sim::SampleBuffer;

#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub buffer: SampleBuffer,
    pub spec: WavSpec,
}

pub fn read_wav(path: &Path) -> Result<DecodedAudio> {
    let reader = WavReader::open(path)
        .with_context(|| format!("failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("failed to read samples: {}", path.display()))?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample)?;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / scale))
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("failed to read samples: {}", path.display()))?
        }
    };

    let buffer = SampleBuffer::from_interleaved(
        &interleaved,
        usize::from(spec.channels),
        spec.sample_rate,
    )?;

    Ok(DecodedAudio { buffer, spec })
}

/// Write `buffer` using the encoding described by `spec`.
pub fn write_wav(path: &Path, buffer: &SampleBuffer, spec: WavSpec) -> Result<()> {
    if usize::from(spec.channels) != buffer.channel_count() {
        bail!(
            "channel count mismatch: format has {}, buffer has {}",
            spec.channels,
            buffer.channel_count()
        );
    }
    let spec = WavSpec {
        sample_rate: buffer.sample_rate(),
        ..spec
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create WAV file: {}", path.display()))?;

    match spec.sample_format {
        SampleFormat::Float => {
            for v in buffer.to_interleaved() {
                writer.write_sample(v as f32)?;
            }
        }
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample)?;
            for v in buffer.to_interleaved() {
                writer.write_sample(quantize(v, scale))?;
            }
        }
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}

/// `<stem>_jittered.wav` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_jittered.wav"))
}

fn int_scale(bits: u16) -> Result<f64> {
    if !(8..=32).contains(&bits) {
        bail!("unsupported integer bit depth: {bits}");
    }
    Ok((1_i64 << (bits - 1)) as f64)
}

fn quantize(value: f64, scale: f64) -> i32 {
    (value * scale).round().clamp(-scale, scale - 1.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(channels: u16, bits: u16, format: SampleFormat) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44_100,
            bits_per_sample: bits,
            sample_format: format,
        }
    }

    #[test]
    fn test_default_output_path() {
        let out = default_output_path(Path::new("/tmp/song.wav"));
        assert_eq!(out, PathBuf::from("/tmp/song_jittered.wav"));
    }

    #[test]
    fn test_quantize_clamps() {
        let scale = int_scale(16).unwrap();
        assert_eq!(quantize(1.5, scale), 32_767);
        assert_eq!(quantize(-1.5, scale), -32_768);
        assert_eq!(quantize(0.5, scale), 16_384);
    }

    #[test]
    fn test_int16_stereo_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let left: Vec<f64> = (0..64).map(|i| i as f64 / 128.0).collect();
        let right: Vec<f64> = left.iter().map(|v| -v).collect();
        let buffer = SampleBuffer::stereo(left.clone(), right, 44_100).unwrap();

        write_wav(&path, &buffer, spec(2, 16, SampleFormat::Int)).unwrap();
        let decoded = read_wav(&path).unwrap();

        assert_eq!(decoded.spec.bits_per_sample, 16);
        assert_eq!(decoded.spec.sample_format, SampleFormat::Int);
        assert_eq!(decoded.buffer.channel_count(), 2);
        assert_eq!(decoded.buffer.len(), 64);
        for (a, b) in decoded.buffer.channel(0).unwrap().iter().zip(&left) {
            assert!((a - b).abs() < 1.0 / 32_768.0);
        }
    }

    #[test]
    fn test_float_mono_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let samples = vec![0.25, -0.5, 0.125, 0.0];
        let buffer = SampleBuffer::mono(samples.clone(), 48_000).unwrap();

        write_wav(&path, &buffer, spec(1, 32, SampleFormat::Float)).unwrap();
        let decoded = read_wav(&path).unwrap();

        assert_eq!(decoded.spec.sample_rate, 48_000);
        assert_eq!(decoded.buffer.channel(0).unwrap(), samples.as_slice());
    }

    #[test]
    fn test_write_rejects_channel_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = SampleBuffer::mono(vec![0.0; 4], 44_100).unwrap();
        let result = write_wav(&dir.path().join("x.wav"), &buffer, spec(2, 16, SampleFormat::Int));
        assert!(result.is_err());
    }
}
