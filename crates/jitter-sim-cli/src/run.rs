use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use jitter_sim::{apply, JitterOutcome, SampleBuffer};

use crate::config::RunConfig;
use crate::report::{
    ensure_outdir, jitter_histogram, rms_deviation, write_histogram_csv, write_jitter_csv,
    write_manifest_json, write_spectrogram_csv, write_waveform_csv, ChannelSummary, JitterStats,
    Manifest, ReportPaths, MANIFEST_SCHEMA_VERSION,
};
use crate::spectrogram::SpectrogramAnalyzer;
use crate::wav::{read_wav, write_wav};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` skips the report files
    pub report_dir: Option<PathBuf>,
    pub config: RunConfig,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub report: Option<ReportPaths>,
    pub seed: u64,
    pub jitter_std: f64,
}

/// Decode, jitter, encode, then write the report data.
///
/// The output file is only created once the whole transform succeeded.
pub fn execute(request: &RunRequest) -> Result<RunSummary> {
    let cfg = &request.config;
    cfg.validate()?;
    let setting = cfg.jitter_setting();
    let spec = setting.resolve().context("invalid jitter setting")?;

    let decoded = read_wav(&request.input)?;
    info!(
        input = %request.input.display(),
        channels = decoded.buffer.channel_count(),
        samples = decoded.buffer.len(),
        sample_rate = decoded.buffer.sample_rate(),
        "decoded input"
    );

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(
        jitter_std_s = spec.std_secs(),
        method = %cfg.method,
        seed,
        "applying jitter"
    );

    let outcome = apply(&decoded.buffer, spec, cfg.method, &mut rng)
        .with_context(|| format!("failed to jitter {}", request.input.display()))?;

    write_wav(&request.output, &outcome.buffer, decoded.spec)?;
    info!(output = %request.output.display(), "saved jittered file");

    let report = match &request.report_dir {
        Some(dir) => {
            let manifest = Manifest {
                schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                input: request.input.display().to_string(),
                output: request.output.display().to_string(),
                method: cfg.method,
                setting,
                jitter_std_s: spec,
                seed,
                channels: outcome.buffer.channel_count(),
                samples_per_channel: outcome.buffer.len(),
                sample_rate: outcome.buffer.sample_rate(),
                channel_summaries: channel_summaries(&decoded.buffer, &outcome),
            };
            Some(write_reports(dir, &request.input, cfg, &decoded.buffer, &outcome, &manifest)?)
        }
        None => None,
    };

    Ok(RunSummary {
        output: request.output.clone(),
        report,
        seed,
        jitter_std: spec.std_secs(),
    })
}

fn channel_summaries(original: &SampleBuffer, outcome: &JitterOutcome) -> Vec<ChannelSummary> {
    original
        .channels()
        .iter()
        .zip(outcome.buffer.channels())
        .zip(&outcome.jitter)
        .enumerate()
        .map(|(channel, ((before, after), jitter))| ChannelSummary {
            channel,
            jitter: JitterStats::from_samples(jitter),
            rms_deviation: rms_deviation(before, after),
        })
        .collect()
}

fn write_reports(
    dir: &Path,
    input: &Path,
    cfg: &RunConfig,
    original: &SampleBuffer,
    outcome: &JitterOutcome,
    manifest: &Manifest,
) -> Result<ReportPaths> {
    ensure_outdir(dir)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let paths = ReportPaths::new(dir, &stem, cfg.method);

    // every comparison and the histogram follow the left channel
    let before = original.channel(0).unwrap_or(&[]);
    let after = outcome.buffer.channel(0).unwrap_or(&[]);
    write_waveform_csv(
        &paths.waveform,
        original.sample_rate(),
        before,
        after,
        cfg.snippet_samples,
    )?;
    info!(path = %paths.waveform.display(), "saved waveform comparison");

    let analyzer = SpectrogramAnalyzer::default();
    let sample_rate = original.sample_rate();
    write_spectrogram_csv(
        &paths.spectrogram,
        &analyzer.analyze(before, sample_rate, cfg.spectrogram_frames),
        &analyzer.analyze(after, sample_rate, cfg.spectrogram_frames),
    )?;
    info!(path = %paths.spectrogram.display(), "saved spectrogram comparison");

    let bins = jitter_histogram(outcome.primary_jitter(), cfg.histogram_bins);
    write_histogram_csv(&paths.histogram, &bins)?;
    info!(path = %paths.histogram.display(), "saved jitter histogram");

    write_jitter_csv(&paths.jitter, &outcome.jitter)?;
    debug!(path = %paths.jitter.display(), "saved raw jitter sequences");

    write_manifest_json(&paths.manifest, manifest)?;
    info!(path = %paths.manifest.display(), "saved manifest");

    Ok(paths)
}
