//! Checks the Euler product identity `Σ n^(-s) = Π (1 - p^(-s))^(-1)` for a
//! list of real arguments and writes one CSV row per argument.
use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use prime_spectrum::zeta::check_zeta_identity;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "zeta-identity",
    about = "Compares partial Dirichlet sums with partial Euler products."
)]
struct ZetaArgs {
    /// Real arguments `s`, comma separated.
    #[clap(long, value_delimiter = ',', default_values_t = vec![2.0, 3.0, 4.0])]
    s: Vec<f64>,

    /// Number of Dirichlet terms.
    #[clap(long, default_value_t = 10_000)]
    terms: usize,

    /// Primes up to this limit enter the Euler product.
    #[clap(long, default_value_t = 1000)]
    prime_limit: usize,

    /// Maximum relative disagreement between the two representations.
    #[clap(long, default_value_t = 1e-3)]
    tolerance: f64,

    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = ZetaArgs::parse();
    ensure!(args.terms > 0, "--terms must be positive");
    ensure!(args.prime_limit >= 2, "--prime-limit must be at least 2");

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create output file {:?}", args.output))?;
    let mut failures = 0;
    for &s in &args.s {
        let check = check_zeta_identity(s, args.terms, args.prime_limit, args.tolerance)
            .with_context(|| format!("Identity check failed for s = {s}"))?;
        log::info!(
            "s = {s}: Dirichlet {:.12}, Euler {:.12}, relative difference {:.3e} [{}]",
            check.dirichlet_value,
            check.euler_value,
            check.identity_error,
            if check.passed { "PASS" } else { "FAIL" }
        );
        if let (Some(exact), Some(d_err), Some(e_err)) =
            (check.exact_value, check.dirichlet_error, check.euler_error)
        {
            log::info!(
                "  against ζ({s}) = {exact:.12}: Dirichlet error {d_err:.3e}, Euler error {e_err:.3e}"
            );
        }
        if !check.passed {
            failures += 1;
        }
        writer.serialize(check)?;
    }
    writer.flush()?;

    log::info!(
        "{}/{} arguments passed; results written to {:?}",
        args.s.len() - failures,
        args.s.len(),
        args.output
    );
    Ok(())
}
