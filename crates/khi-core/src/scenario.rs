// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Scenario Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-shot KHI setup: perturb the equilibrium state, then write the
//! electric field and (optionally) precipitation inputs.

use crate::efield::create_efield;
use crate::perturb::perturb_density;
use crate::potential::seed_potential;
use crate::precip::{create_precip, validate_precip};
use crate::profile::init_profile;
use crate::store::DatasetStore;
use khi_types::config::SimConfig;
use khi_types::error::{KhiError, KhiResult};
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use khi_types::state::PlasmaState;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    /// Shape of the written density array `[lsp, lx1, lx2, lx3]`.
    pub ns_shape: [usize; 4],
    pub ns_min: f64,
    pub ns_max: f64,
    pub efield_steps: usize,
    /// `None` when the precipitation stage was not configured.
    pub precip_steps: Option<usize>,
}

/// Run with the configured seed, or OS entropy when none is set.
pub fn run_scenario<S: DatasetStore>(
    cfg: &SimConfig,
    grid: &SimGrid,
    store: &S,
) -> KhiResult<ScenarioSummary> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_scenario_with_rng(cfg, grid, store, &mut rng)
}

pub fn run_scenario_with_rng<S: DatasetStore, R: Rng + ?Sized>(
    cfg: &SimConfig,
    grid: &SimGrid,
    store: &S,
    rng: &mut R,
) -> KhiResult<ScenarioSummary> {
    // Configuration errors must surface before the input state is overwritten.
    cfg.validate()?;
    let params = PerturbParams::new(cfg.khi.shear)?;
    if let Some(precip_cfg) = &cfg.precip {
        validate_precip(precip_cfg)?;
    }
    info!(
        "KHI setup: v0={} m/s densfact={} ell={} m vn={:.3} m/s",
        params.v0(),
        params.densfact(),
        params.ell(),
        params.vn()
    );

    let state = store.read_state(&cfg.indat_file)?;
    state.check_grid(grid)?;
    info!("read state {:?} from {}", state.ns.dim(), cfg.indat_file.display());

    let nsscale = init_profile(grid, &state)?;
    let perturbed = perturb_density(
        grid,
        &nsscale,
        &params,
        cfg.khi.density_structure,
        &mut *rng,
    )?;
    let phitop = seed_potential(grid, &params, cfg.khi.top_potential, &mut *rng);

    let (ns_min, ns_max) = perturbed
        .ns
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let ns_shape = {
        let d = perturbed.ns.dim();
        [d.0, d.1, d.2, d.3]
    };

    let out = PlasmaState::new(perturbed.ns, state.ts, state.v1)?;
    store.write_state(&cfg.indat_file, &out, &phitop)?;
    info!("wrote perturbed state to {}", cfg.indat_file.display());

    let efield = create_efield(cfg, grid, &params, cfg.khi.boundary)?;
    store.write_efield(&efield, &cfg.e0_dir)?;
    info!("wrote electric field to {}", cfg.e0_dir.display());

    let precip_steps = match &cfg.precip {
        Some(precip_cfg) => {
            let precdir = cfg.precdir.as_ref().ok_or_else(|| {
                KhiError::ConfigError("precipitation requires precdir".into())
            })?;
            let precip = create_precip(cfg, precip_cfg, grid, &params)?;
            store.write_precip(&precip, precdir)?;
            info!("wrote precipitation to {}", precdir.display());
            Some(precip.nt())
        }
        None => {
            info!("no precipitation section; skipping");
            None
        }
    };

    Ok(ScenarioSummary {
        ns_shape,
        ns_min,
        ns_max,
        efield_steps: efield.nt(),
        precip_steps,
    })
}
