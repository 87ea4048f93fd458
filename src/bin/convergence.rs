//! Experiment Runner for the radial convergence study.
//!
//! Solves the radial operator `-d²/dt² + 3/4` at a sequence of grid sizes,
//! tracks the nearest-match error of each reference zero, and fits the
//! empirical order of convergence of that error.
use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use prime_spectrum::{
    experiment::{OperatorConfig, Preset, RadialConfig, run_convergence_study},
    utils::{data_loader::load_zero_heights, perf::get_peak_rss_kb},
    zeta::reference_zero_heights,
};
use std::path::PathBuf;

/// Command-line arguments for the convergence study.
#[derive(Parser, Debug)]
#[clap(
    name = "convergence-runner",
    about = "Runs the radial operator convergence study against zeta zero heights."
)]
struct ConvergenceArgs {
    /// Grid sizes, comma separated. Defaults to the rigorous preset's grid.
    #[clap(long, value_delimiter = ',')]
    grid_points: Vec<usize>,

    /// Left boundary is `ln(epsilon)`.
    #[clap(long)]
    epsilon: Option<f64>,

    #[clap(long, allow_negative_numbers = true)]
    t_max: Option<f64>,

    #[clap(long)]
    num_zeros: Option<usize>,

    /// Optional reference table, one zero height per line.
    #[clap(long, value_name = "PATH")]
    zeros_file: Option<PathBuf>,

    /// Path to the CSV file receiving one row per (grid size, zero).
    #[clap(long, value_name = "PATH")]
    output: PathBuf,

    /// Path to the CSV file receiving the fitted convergence order per zero.
    #[clap(long, value_name = "PATH")]
    fits_output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = ConvergenceArgs::parse();
    let preset = Preset::RadialRigorous;
    let preset_config = preset.config();
    let OperatorConfig::Radial(mut base) = preset_config.operator else {
        return Err(anyhow!("Preset {preset:?} is not a radial configuration"));
    };
    base = RadialConfig {
        epsilon: args.epsilon.unwrap_or(base.epsilon),
        t_max: args.t_max.unwrap_or(base.t_max),
        ..base
    };

    let grid_points = if args.grid_points.is_empty() {
        preset
            .convergence_grid()
            .ok_or_else(|| anyhow!("Preset {preset:?} defines no convergence grid"))?
    } else {
        args.grid_points.clone()
    };
    ensure!(
        grid_points.len() >= 2,
        "At least two grid sizes are needed to fit a convergence rate"
    );
    let num_zeros = args.num_zeros.unwrap_or(preset_config.num_zeros);

    let reference = match &args.zeros_file {
        Some(path) => load_zero_heights(path)
            .with_context(|| format!("Failed to load zero heights from {path:?}"))?,
        None => reference_zero_heights().to_vec(),
    };

    log::info!(
        "Convergence study on [ln({}), {}] for N = {:?}, {} zeros",
        base.epsilon,
        base.t_max,
        grid_points,
        num_zeros
    );
    let study = run_convergence_study(&base, &grid_points, num_zeros, &reference)?;

    for run in &study.runs {
        log::info!(
            "N = {:>6}: {:.2}s, {} eigenvalues in [{:.6}, {:.6e}]",
            run.grid_points,
            run.elapsed_s,
            run.eigenvalue_count,
            run.min_eigenvalue,
            run.max_eigenvalue
        );
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create output file {:?}", args.output))?;
    for sample in &study.samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;

    for zero in &study.fits {
        log::info!(
            "Zero #{} (τ = {:.6}): error ~ N^-{:.3} (R² = {:.4})",
            zero.zero_index,
            zero.tau,
            zero.fit.slope,
            zero.fit.r_squared
        );
    }
    if let Some(path) = &args.fits_output {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create output file {path:?}"))?;
        writer.write_record(["zero_index", "tau", "slope", "intercept", "r_squared"])?;
        for zero in &study.fits {
            writer.write_record(&[
                zero.zero_index.to_string(),
                zero.tau.to_string(),
                zero.fit.slope.to_string(),
                zero.fit.intercept.to_string(),
                zero.fit.r_squared.to_string(),
            ])?;
        }
        writer.flush()?;
    }

    log::info!("Peak RSS: {} KB", get_peak_rss_kb());
    log::info!(
        "Successfully wrote {} rows to {:?}",
        study.samples.len(),
        args.output
    );
    Ok(())
}
