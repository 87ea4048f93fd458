//! Experiment Runner for a single spectral experiment.
//!
//! Runs one named preset, optionally with individual fields overridden on the
//! command line, and writes the per-zero comparison to a CSV file. The error
//! summary, tolerance counts and the best match are reported through the log.
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use prime_spectrum::{
    comparison::best_match,
    experiment::{ExperimentConfig, OperatorConfig, Preset, run_experiment},
    utils::{data_loader::load_zero_heights, perf::get_peak_rss_kb},
    zeta::reference_zero_heights,
};
use serde::Serialize;
use std::path::PathBuf;

/// The named experiment configurations.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PresetArg {
    CoreDefault,
    Hamiltonian,
    HamiltonianFixed,
    Debug,
    RadialCheck,
    RadialRigorous,
    RadialUltra,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::CoreDefault => Preset::CoreDefault,
            PresetArg::Hamiltonian => Preset::Hamiltonian,
            PresetArg::HamiltonianFixed => Preset::HamiltonianFixed,
            PresetArg::Debug => Preset::Debug,
            PresetArg::RadialCheck => Preset::RadialCheck,
            PresetArg::RadialRigorous => Preset::RadialRigorous,
            PresetArg::RadialUltra => Preset::RadialUltra,
        }
    }
}

/// Command-line arguments for the spectrum runner.
#[derive(Parser, Debug)]
#[clap(
    name = "spectrum-runner",
    about = "Computes an operator spectrum and compares it against zeta zero heights."
)]
struct SpectrumArgs {
    #[clap(long, value_enum, default_value = "radial-check")]
    preset: PresetArg,

    /// Path to the output CSV file where the comparison rows will be written.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,

    /// Optional reference table, one zero height per line.
    #[clap(long, value_name = "PATH")]
    zeros_file: Option<PathBuf>,

    #[clap(long)]
    num_zeros: Option<usize>,
    #[clap(long)]
    eigen_count: Option<usize>,
    #[clap(long)]
    tolerance: Option<f64>,

    // Prime potential overrides.
    #[clap(long)]
    grid_size: Option<usize>,
    #[clap(long, allow_negative_numbers = true)]
    y_min: Option<f64>,
    #[clap(long, allow_negative_numbers = true)]
    y_max: Option<f64>,
    #[clap(long, allow_negative_numbers = true)]
    coupling: Option<f64>,
    #[clap(long)]
    prime_limit: Option<usize>,

    // Radial overrides.
    #[clap(long)]
    grid_points: Option<usize>,
    #[clap(long)]
    epsilon: Option<f64>,
    #[clap(long, allow_negative_numbers = true)]
    t_max: Option<f64>,
}

impl SpectrumArgs {
    /// Applies the command-line overrides on top of the preset.
    fn to_config(&self) -> Result<ExperimentConfig> {
        let mut config = Preset::from(self.preset).config();
        if let Some(n) = self.num_zeros {
            config.num_zeros = n;
        }
        if let Some(k) = self.eigen_count {
            config.eigen_count = Some(k);
        }
        if let Some(tol) = self.tolerance {
            config.tolerance = tol;
        }

        let prime_overrides = self.grid_size.is_some()
            || self.y_min.is_some()
            || self.y_max.is_some()
            || self.coupling.is_some()
            || self.prime_limit.is_some();
        let radial_overrides =
            self.grid_points.is_some() || self.epsilon.is_some() || self.t_max.is_some();

        match &mut config.operator {
            OperatorConfig::PrimePotential(c) => {
                if radial_overrides {
                    bail!("--grid-points, --epsilon and --t-max only apply to radial presets");
                }
                c.grid_size = self.grid_size.unwrap_or(c.grid_size);
                c.y_min = self.y_min.unwrap_or(c.y_min);
                c.y_max = self.y_max.unwrap_or(c.y_max);
                c.coupling = self.coupling.unwrap_or(c.coupling);
                c.prime_limit = self.prime_limit.or(c.prime_limit);
            }
            OperatorConfig::Radial(c) => {
                if prime_overrides {
                    bail!("prime potential overrides do not apply to radial presets");
                }
                c.grid_points = self.grid_points.unwrap_or(c.grid_points);
                c.epsilon = self.epsilon.unwrap_or(c.epsilon);
                c.t_max = self.t_max.unwrap_or(c.t_max);
            }
        }
        Ok(config)
    }
}

/// A single row of the output CSV.
#[derive(Debug, Serialize)]
struct ComparisonRow {
    zero_index: usize,
    target: f64,
    computed: f64,
    absolute_error: f64,
    relative_error_percent: f64,
    within_tolerance: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = SpectrumArgs::parse();
    let config = args.to_config()?;
    log::info!("Running preset {:?} with configuration {:?}", args.preset, config);

    let reference = match &args.zeros_file {
        Some(path) => load_zero_heights(path)
            .with_context(|| format!("Failed to load zero heights from {path:?}"))?,
        None => reference_zero_heights().to_vec(),
    };

    let report = run_experiment(&config, &reference)?;
    log::info!(
        "Operator dimension {}, step {:.6e}, {} eigenvalues ({} positive) in {:.3}s",
        report.dimension,
        report.step,
        report.eigenvalues.len(),
        report.zero_heights.len(),
        report.elapsed_s
    );

    if let Some(potential) = &report.potential {
        let p = &potential.partition;
        log::info!(
            "Primes up to {}: {} euclidean, {} hyperbolic, {} anchor",
            potential.prime_limit,
            p.euclidean_count,
            p.hyperbolic_count,
            p.anchor_count
        );
        log::info!("Primes placed on the grid: {:?}", potential.placement);
        if let Some(stats) = &potential.statistics {
            log::info!("Potential statistics: {stats:?}");
        }
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create output file {:?}", args.output))?;
    for m in &report.matches {
        writer.serialize(ComparisonRow {
            zero_index: m.target_index,
            target: m.target,
            computed: m.computed,
            absolute_error: m.absolute_error,
            relative_error_percent: 100.0 * m.relative_error()?,
            within_tolerance: m.absolute_error < config.tolerance,
        })?;
    }
    writer.flush()?;

    if let Some(summary) = &report.absolute_errors {
        log::info!(
            "Absolute error: mean {:.6}, std {:.6}, max {:.6}, min {:.6}",
            summary.mean,
            summary.std_dev,
            summary.max,
            summary.min
        );
    }
    if let Some(summary) = &report.relative_errors_percent {
        log::info!("Mean relative error: {:.4}%", summary.mean);
    }
    if let Some(within) = &report.within_tolerance {
        log::info!(
            "{}/{} matches within {} ({:.1}%)",
            within.count,
            within.total,
            within.tolerance,
            within.percentage
        );
    }
    for count in &report.tolerance_counts {
        log::info!(
            "  error < {:<6}: {}/{} ({:.1}%)",
            count.tolerance,
            count.count,
            count.total,
            count.percentage
        );
    }
    if let Some(best) = best_match(&report.matches) {
        log::info!(
            "Best match: zero #{} target {:.6} computed {:.6} error {:.3e}",
            best.target_index,
            best.target,
            best.computed,
            best.absolute_error
        );
    }

    log::info!("Peak RSS: {} KB", get_peak_rss_kb());
    log::info!("Successfully wrote {} rows to {:?}", report.matches.len(), args.output);
    Ok(())
}
