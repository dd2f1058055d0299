// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Command Line
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `khi-init`: write Kelvin-Helmholtz initial conditions and boundary
//! drivers for an ionospheric run.

mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use khi_core::scenario::run_scenario;
use khi_core::store::NpzStore;
use khi_types::config::SimConfig;
use khi_types::grid::SimGrid;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "khi-init")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kelvin-Helmholtz instability initial-condition generator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); falls back to RUST_LOG.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perturb the equilibrium and write field and precipitation inputs.
    Run(RunArgs),
    /// Write a uniform Cartesian grid archive.
    Grid(GridArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Scenario configuration (JSON).
    #[arg(short, long)]
    config: PathBuf,

    /// Simulation grid (.npz with lx, x1, x2, x3, theta, phi).
    #[arg(short, long)]
    grid: PathBuf,

    /// Noise seed; overrides the configuration.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct GridArgs {
    /// Output archive.
    #[arg(short, long)]
    output: PathBuf,

    /// Cells along x1, x2, x3.
    #[arg(long, num_args = 3, default_values_t = [96usize, 256, 1])]
    lx: Vec<usize>,

    /// Altitude range [km].
    #[arg(long, num_args = 2, default_values_t = [80.0f64, 1000.0])]
    alt_km: Vec<f64>,

    /// Half width in x2 [km].
    #[arg(long, default_value_t = 200.0)]
    x2_half_km: f64,

    /// Half width in x3 [km].
    #[arg(long, default_value_t = 100.0)]
    x3_half_km: f64,

    /// Geographic latitude of the grid centre [deg].
    #[arg(long, default_value_t = 67.0)]
    glat: f64,

    /// Geographic longitude of the grid centre [deg].
    #[arg(long, default_value_t = 212.0)]
    glon: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Grid(args) => grid(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let started = Instant::now();
    let mut cfg = SimConfig::from_file(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    let grid = SimGrid::from_npz(&args.grid)
        .with_context(|| format!("loading grid {}", args.grid.display()))?;
    info!("grid {:?} from {}", grid.lx(), args.grid.display());

    let summary = run_scenario(&cfg, &grid, &NpzStore).context("KHI setup failed")?;
    info!(
        "done in {:.2?}: ns {:?} in [{:.3e}, {:.3e}], {} field steps, {}",
        started.elapsed(),
        summary.ns_shape,
        summary.ns_min,
        summary.ns_max,
        summary.efield_steps,
        match summary.precip_steps {
            Some(n) => format!("{n} precipitation steps"),
            None => "no precipitation".to_string(),
        }
    );
    Ok(())
}

fn grid(args: GridArgs) -> Result<()> {
    let lx = [args.lx[0], args.lx[1], args.lx[2]];
    let grid = SimGrid::cartesian(
        lx,
        (args.alt_km[0] * 1e3, args.alt_km[1] * 1e3),
        args.x2_half_km * 1e3,
        args.x3_half_km * 1e3,
        args.glat,
        args.glon,
    )?;
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    grid.write_npz(&args.output)
        .with_context(|| format!("writing grid {}", args.output.display()))?;
    info!("wrote {lx:?} grid to {}", args.output.display());
    Ok(())
}
