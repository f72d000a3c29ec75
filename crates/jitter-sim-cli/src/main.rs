use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jitter_sim::preset::{MULTIPLIER_MAX, MULTIPLIER_MIN};
use jitter_sim::{HardwarePreset, InterpolationMethod};
use jitter_sim_cli::wav::default_output_path;
use jitter_sim_cli::{execute, ConfigOverrides, RunConfig, RunRequest};

#[derive(Debug, Parser)]
#[command(name = "jitter-sim")]
#[command(version, about = "Simulate DAC clock jitter on a mono or stereo WAV file")]
struct Cli {
    /// Input WAV file (mono or stereo)
    #[arg(short, long, required_unless_present = "list_presets")]
    input: Option<PathBuf>,

    /// Output WAV file [default: <input>_jittered.wav]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hardware preset: high-end-dac, consumer-grade, vintage-gear
    #[arg(long, conflicts_with = "manual")]
    preset: Option<HardwarePreset>,

    /// Scales the preset jitter (0.5 to 5.0)
    #[arg(long, conflicts_with = "manual")]
    multiplier: Option<f64>,

    /// Manual jitter standard deviation in seconds, replaces the preset
    #[arg(long, value_name = "SECONDS")]
    manual: Option<f64>,

    /// nearest, linear, slinear, quadratic, cubic or zero
    #[arg(long)]
    method: Option<InterpolationMethod>,

    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the waveform/histogram/jitter CSVs and the manifest
    /// [default: next to the output file]
    #[arg(long)]
    report_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    no_report: bool,

    #[arg(long, default_value_t = false)]
    list_presets: bool,
}

fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let mut cfg = match &cli.config {
        Some(path) => RunConfig::from_toml_file(path)?,
        None => RunConfig::default(),
    };

    cfg.apply_overrides(&ConfigOverrides {
        preset: cli.preset,
        multiplier: cli.multiplier,
        manual_jitter_std: cli.manual,
        method: cli.method,
        seed: cli.seed,
    })?;

    cfg.validate()?;
    Ok(cfg)
}

fn print_presets() {
    println!("Hardware presets (jitter std):");
    for preset in HardwarePreset::ALL {
        println!(
            "  {:<16} {:<16} {:e} s",
            preset.key(),
            preset.label(),
            preset.jitter_std()
        );
    }
    println!("Multiplier range: [{MULTIPLIER_MIN}, {MULTIPLIER_MAX}]");
    let methods: Vec<&str> = InterpolationMethod::ALL.iter().map(|m| m.as_str()).collect();
    println!("Interpolation methods: {}", methods.join(", "));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.list_presets {
        print_presets();
        return Ok(());
    }

    let Some(input) = cli.input.clone() else {
        bail!("--input is required");
    };
    let config = resolve_config(&cli)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&input));
    if output == input {
        bail!("output path must differ from the input path");
    }

    let report_dir = if cli.no_report {
        None
    } else {
        Some(cli.report_dir.clone().unwrap_or_else(|| {
            output
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        }))
    };

    let summary = execute(&RunRequest {
        input,
        output,
        report_dir,
        config,
    })?;

    info!(
        output = %summary.output.display(),
        seed = summary.seed,
        jitter_std_s = summary.jitter_std,
        "done"
    );
    Ok(())
}
