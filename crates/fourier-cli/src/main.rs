//! Fourier series command-line interface.

mod report;

use std::f64::consts::TAU;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fourier_engine::{
    CoefficientOptions, HarmonicMask, MAX_HARMONICS, QuadratureConfig, compute_coefficients_with,
    export_analysis,
};
use fourier_signal::{ExtraParams, PeriodicFunction, Signal, WaveformKind, period_grid};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "fourier")]
#[command(about = "Fourier series analysis of periodic waveforms", long_about = None)]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute coefficients, spectrum and convergence for a waveform
    Analyze(AnalyzeArgs),
    /// List the available waveform families
    List,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Waveform family: square, triangle, sawtooth, half_wave, pulse_train, custom
    #[arg(short, long, default_value = "square")]
    waveform: WaveformKind,

    /// Period T
    #[arg(short, long, default_value_t = TAU)]
    period: f64,

    /// Amplitude A, applied before integration
    #[arg(short, long, default_value_t = 1.0)]
    amplitude: f64,

    /// Number of harmonics N
    #[arg(short = 'n', long, default_value_t = 10)]
    harmonics: usize,

    /// Duty cycle for pulse_train, in (0, 1)
    #[arg(long)]
    duty: Option<f64>,

    /// Expression in t for custom waveforms, e.g. "sin(2*pi*t)^3"
    #[arg(short, long)]
    expr: Option<String>,

    /// Quadrature panels per period
    #[arg(long, default_value_t = QuadratureConfig::default().samples_per_period)]
    samples: usize,

    /// Points of the comparison grid over one period
    #[arg(long, default_value_t = 1000)]
    points: usize,

    /// Harmonics to switch off, comma separated
    #[arg(long, value_delimiter = ',')]
    disable: Vec<usize>,

    /// Write the full analysis as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::List => {
            report::print_waveforms();
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let extra = ExtraParams {
        duty_cycle: args.duty,
        expression: args.expr.clone(),
    };
    let signal = Signal::new(args.waveform, args.period, args.amplitude, &extra)
        .context("invalid waveform parameters")?;
    log::info!("analyzing {}", signal.describe());

    let options =
        CoefficientOptions::default().with_quadrature(QuadratureConfig::with_samples(args.samples));
    let coefficients = compute_coefficients_with(&signal, args.period, args.harmonics, &options)
        .with_context(|| {
            format!(
                "failed to compute {} harmonics (1..={} supported) of {}",
                args.harmonics,
                MAX_HARMONICS,
                signal.describe()
            )
        })?;

    let mask = build_mask(args.harmonics, &args.disable)?;

    let grid = period_grid(args.period, args.points).context("invalid comparison grid")?;
    let original = signal
        .sample(&grid)
        .context("failed to sample the original waveform")?;
    let export = export_analysis(&original, &coefficients, &mask, &grid, args.period)
        .context("failed to analyze the reconstruction")?;

    println!("{}", signal.describe());
    println!();
    report::print_coefficients(&coefficients, &mask);
    report::print_spectrum(&export.spectrum);
    report::print_convergence(&export.metrics);

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&export).context("failed to serialize analysis")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Analysis written to {}", path.display());
    }
    Ok(())
}

fn build_mask(harmonics: usize, disabled: &[usize]) -> Result<HarmonicMask> {
    let mut mask = HarmonicMask::all(harmonics);
    for &k in disabled {
        mask.disable(k)
            .with_context(|| format!("cannot disable harmonic {}", k))?;
    }
    Ok(mask)
}
