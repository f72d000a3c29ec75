//! Short-time power spectra of a channel, for comparing the original and
//! jittered signal over time.
//!
//! Frames are Hann-windowed and the one-sided power spectral density is
//! reported in dB, scaled by `1 / (fs * sum(w^2))`. A signal shorter than one
//! frame is zero-padded to a single frame.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Default FFT size
pub const FFT_SIZE: usize = 1024;
/// Samples shared by consecutive frames
pub const OVERLAP: usize = 512;
/// Power below this is reported as the floor (-200 dB)
const POWER_FLOOR: f64 = 1e-20;

/// Power in dB per frame (outer) and frequency bin (inner).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Frame centre times in seconds
    pub times: Vec<f64>,
    /// Bin frequencies in Hz, `0 ..= fs / 2`
    pub frequencies: Vec<f64>,
    pub power_db: Vec<Vec<f64>>,
}

impl Spectrogram {
    pub fn frame_count(&self) -> usize {
        self.times.len()
    }
}

pub struct SpectrogramAnalyzer {
    fft_size: usize,
    hop_size: usize,
    window: Vec<f64>,
    window_power: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl Default for SpectrogramAnalyzer {
    fn default() -> Self {
        Self::with_params(FFT_SIZE, FFT_SIZE - OVERLAP)
    }
}

impl SpectrogramAnalyzer {
    /// `fft_size` is raised to at least 2 and `hop_size` to at least 1.
    pub fn with_params(fft_size: usize, hop_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let window = hann_window(fft_size);
        let window_power = window.iter().map(|w| w * w).sum();
        let fft = FftPlanner::<f64>::new().plan_fft_forward(fft_size);

        Self {
            fft_size,
            hop_size: hop_size.max(1),
            window,
            window_power,
            fft,
        }
    }

    /// Number of full frames in `len` samples; one padded frame when `len`
    /// is shorter than the FFT.
    pub fn frame_count(&self, len: usize) -> usize {
        match len {
            0 => 0,
            n if n <= self.fft_size => 1,
            n => 1 + (n - self.fft_size) / self.hop_size,
        }
    }

    /// Analyse at most `max_frames` frames from the start of `signal`.
    pub fn analyze(&self, signal: &[f64], sample_rate: u32, max_frames: usize) -> Spectrogram {
        let sr = f64::from(sample_rate);
        let bins = self.fft_size / 2 + 1;
        let frames = self.frame_count(signal.len()).min(max_frames);

        let frequencies = (0..bins)
            .map(|k| k as f64 * sr / self.fft_size as f64)
            .collect();
        let times = (0..frames)
            .map(|f| (f * self.hop_size) as f64 / sr + self.fft_size as f64 / (2.0 * sr))
            .collect();
        let power_db = (0..frames)
            .map(|f| {
                let start = f * self.hop_size;
                let end = (start + self.fft_size).min(signal.len());
                self.frame_power_db(&signal[start..end], sr)
            })
            .collect();

        Spectrogram {
            times,
            frequencies,
            power_db,
        }
    }

    fn frame_power_db(&self, frame: &[f64], sr: f64) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .copied()
            .chain(std::iter::repeat(0.0))
            .zip(self.window.iter())
            .map(|(s, w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let nyquist = self.fft_size / 2;
        let scale = 1.0 / (sr * self.window_power);
        buffer[..=nyquist]
            .iter()
            .enumerate()
            .map(|(k, c)| {
                // one-sided: fold the negative frequencies in, except DC and
                // Nyquist which have no mirror
                let fold = if k == 0 || (k == nyquist && self.fft_size % 2 == 0) {
                    1.0
                } else {
                    2.0
                };
                let power = c.norm_sqr() * scale * fold;
                10.0 * power.max(POWER_FLOOR).log10()
            })
            .collect()
    }
}

fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64;
            0.5 * (1.0 - angle.cos())
        })
        .collect()
}
