use anyhow::{bail, Context, Result};
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use jitter_sim::{InterpolationMethod, JitterSetting, JitterSpec};

use crate::spectrogram::Spectrogram;

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JitterStats {
    pub mean_s: f64,
    pub std_s: f64,
    pub min_s: f64,
    pub max_s: f64,
}

impl JitterStats {
    pub fn from_samples(jitter: &[f64]) -> Self {
        if jitter.is_empty() {
            return Self {
                mean_s: 0.0,
                std_s: 0.0,
                min_s: 0.0,
                max_s: 0.0,
            };
        }

        let n = jitter.len() as f64;
        let mean = jitter.iter().sum::<f64>() / n;
        let var = jitter.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean_s: mean,
            std_s: var.sqrt(),
            min_s: jitter.iter().copied().fold(f64::INFINITY, f64::min),
            max_s: jitter.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub bin_start_us: f64,
    pub bin_end_us: f64,
    pub count: usize,
}

/// Equal-width histogram of the jitter in microseconds over `[min, max]`.
/// The last bin is closed on the right.
pub fn jitter_histogram(jitter: &[f64], bins: usize) -> Vec<HistogramBin> {
    if jitter.is_empty() || bins == 0 {
        return Vec::new();
    }

    let micros: Vec<f64> = jitter.iter().map(|e| e * 1e6).collect();
    let lo = micros.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = micros.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        return vec![HistogramBin {
            bin_start_us: lo,
            bin_end_us: hi,
            count: micros.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0_usize; bins];
    for v in &micros {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            bin_start_us: lo + width * i as f64,
            bin_end_us: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

pub fn rms_deviation(original: &[f64], jittered: &[f64]) -> f64 {
    let n = original.len().min(jittered.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = original
        .iter()
        .zip(jittered)
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    (sum_sq / n as f64).sqrt()
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub channel: usize,
    pub jitter: JitterStats,
    pub rms_deviation: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub schema_version: String,
    pub tool_version: String,
    pub input: String,
    pub output: String,
    pub method: InterpolationMethod,
    pub setting: JitterSetting,
    pub jitter_std_s: JitterSpec,
    pub seed: u64,
    pub channels: usize,
    pub samples_per_channel: usize,
    pub sample_rate: u32,
    pub channel_summaries: Vec<ChannelSummary>,
}

/// File locations for one run's report data.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub waveform: PathBuf,
    pub spectrogram: PathBuf,
    pub histogram: PathBuf,
    pub jitter: PathBuf,
    pub manifest: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path, stem: &str, method: InterpolationMethod) -> Self {
        Self {
            waveform: dir.join(format!("{stem}_waveform_{method}.csv")),
            spectrogram: dir.join(format!("{stem}_spectrogram_{method}.csv")),
            histogram: dir.join(format!("{stem}_jitter_histogram_{method}.csv")),
            jitter: dir.join(format!("{stem}_jitter_{method}.csv")),
            manifest: dir.join(format!("{stem}_manifest_{method}.json")),
        }
    }
}

fn fmt_f64(v: f64) -> String {
    format!("{v:.10e}")
}

pub fn ensure_outdir(outdir: &Path) -> Result<()> {
    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory: {}", outdir.display()))
}

/// First `snippet` samples of the original and jittered channel.
pub fn write_waveform_csv(
    path: &Path,
    sample_rate: u32,
    original: &[f64],
    jittered: &[f64],
    snippet: usize,
) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("failed to open waveform csv: {}", path.display()))?;
    wtr.write_record(["time", "original", "jittered"])?;

    let sr = f64::from(sample_rate);
    for (i, (o, j)) in original.iter().zip(jittered).take(snippet).enumerate() {
        wtr.write_record([fmt_f64(i as f64 / sr), fmt_f64(*o), fmt_f64(*j)])?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per frame and frequency bin of the two spectrograms, which must
/// come from the same analyzer and signal length.
pub fn write_spectrogram_csv(
    path: &Path,
    original: &Spectrogram,
    jittered: &Spectrogram,
) -> Result<()> {
    if original.frame_count() != jittered.frame_count()
        || original.frequencies.len() != jittered.frequencies.len()
    {
        bail!(
            "spectrogram shapes differ: {}x{} vs {}x{}",
            original.frame_count(),
            original.frequencies.len(),
            jittered.frame_count(),
            jittered.frequencies.len()
        );
    }

    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("failed to open spectrogram csv: {}", path.display()))?;
    wtr.write_record(["time", "frequency", "original_db", "jittered_db"])?;

    let frames = original.power_db.iter().zip(&jittered.power_db);
    for (&time, (before, after)) in original.times.iter().zip(frames) {
        for ((&freq, o), j) in original.frequencies.iter().zip(before).zip(after) {
            wtr.write_record([fmt_f64(time), fmt_f64(freq), fmt_f64(*o), fmt_f64(*j)])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_histogram_csv(path: &Path, bins: &[HistogramBin]) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("failed to open histogram csv: {}", path.display()))?;
    for bin in bins {
        wtr.serialize(bin)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_jitter_csv(path: &Path, jitter: &[Vec<f64>]) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("failed to open jitter csv: {}", path.display()))?;
    wtr.write_record(["index", "channel", "jitter_s"])?;

    for (channel, offsets) in jitter.iter().enumerate() {
        for (index, e) in offsets.iter().enumerate() {
            wtr.write_record([index.to_string(), channel.to_string(), fmt_f64(*e)])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_manifest_json(path: &Path, manifest: &Manifest) -> Result<()> {
    let payload = serde_json::to_string_pretty(manifest).context("failed to serialize manifest")?;
    fs::write(path, payload)
        .with_context(|| format!("failed to write manifest: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrogram::SpectrogramAnalyzer;

    #[test]
    fn test_stats() {
        let stats = JitterStats::from_samples(&[-2e-6, 0.0, 2e-6]);
        assert!(stats.mean_s.abs() < 1e-18);
        assert_eq!(stats.min_s, -2e-6);
        assert_eq!(stats.max_s, 2e-6);
        assert!((stats.std_s - (8e-12_f64 / 3.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_histogram_counts_everything() {
        let jitter: Vec<f64> = (0..1000).map(|i| (i as f64 - 500.0) * 1e-9).collect();
        let bins = jitter_histogram(&jitter, 100);
        assert_eq!(bins.len(), 100);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1000);
        assert!((bins[0].bin_start_us - -0.5).abs() < 1e-9);
        assert!((bins[99].bin_end_us - 0.499).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_constant_input() {
        let bins = jitter_histogram(&[1e-6; 10], 100);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 10);
    }

    #[test]
    fn test_rms_deviation() {
        assert_eq!(rms_deviation(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
        assert!((rms_deviation(&[0.0, 0.0], &[1.0, -1.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_paths_use_stem_and_method() {
        let paths = ReportPaths::new(Path::new("out"), "song", InterpolationMethod::Cubic);
        assert_eq!(paths.waveform, PathBuf::from("out/song_waveform_cubic.csv"));
        assert_eq!(paths.spectrogram, PathBuf::from("out/song_spectrogram_cubic.csv"));
        assert_eq!(paths.histogram, PathBuf::from("out/song_jitter_histogram_cubic.csv"));
        assert_eq!(paths.manifest, PathBuf::from("out/song_manifest_cubic.json"));
    }

    #[test]
    fn test_write_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ReportPaths::new(dir.path(), "t", InterpolationMethod::Linear);

        write_waveform_csv(&paths.waveform, 4, &[0.0, 1.0, 2.0], &[0.0, 1.5, 2.5], 2).unwrap();
        let waveform = fs::read_to_string(&paths.waveform).unwrap();
        assert_eq!(waveform.lines().count(), 3);
        assert!(waveform.starts_with("time,original,jittered"));

        write_jitter_csv(&paths.jitter, &[vec![1e-6, -1e-6], vec![2e-6, 0.0]]).unwrap();
        let jitter = fs::read_to_string(&paths.jitter).unwrap();
        assert_eq!(jitter.lines().count(), 5);

        let analyzer = SpectrogramAnalyzer::with_params(4, 2);
        let before = analyzer.analyze(&[0.0, 1.0, 0.0, -1.0, 0.0, 1.0], 4, usize::MAX);
        let after = analyzer.analyze(&[0.0, 0.9, 0.1, -1.0, 0.0, 1.0], 4, usize::MAX);
        write_spectrogram_csv(&paths.spectrogram, &before, &after).unwrap();
        let spectrogram = fs::read_to_string(&paths.spectrogram).unwrap();
        assert!(spectrogram.starts_with("time,frequency,original_db,jittered_db"));
        // 2 frames x 3 bins plus the header
        assert_eq!(spectrogram.lines().count(), 7);

        let short = analyzer.analyze(&[0.0, 1.0], 4, usize::MAX);
        assert!(write_spectrogram_csv(&paths.spectrogram, &before, &short).is_err());

        write_histogram_csv(&paths.histogram, &jitter_histogram(&[1e-6, 2e-6], 4)).unwrap();
        let histogram = fs::read_to_string(&paths.histogram).unwrap();
        assert!(histogram.starts_with("bin_start_us,bin_end_us,count"));
    }
}
