// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Density Perturbation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shear-layer density structure seeded with band-limited noise.
//!
//! The density jump across the layer follows Keskinen et al. (1988); the
//! noise is smoothed in x3 so the instability grows from resolved scales.
//! After perturbing, the E-region is tapered away above `x1ref` and the
//! lowest altitudes are pinned so only precipitation can ionize them.

use khi_math::smooth::moving_average;
use khi_types::config::DensityStructure;
use khi_types::constants::{
    DENSITY_FLOOR, LOW_ALT_CUTOFF, LOW_ALT_DENSITY, NOISE_AMPLITUDE, NOISE_WINDOW,
    SHEAR_EDGE_OFFSET, TAPER_OFFSET,
};
use khi_types::error::{KhiError, KhiResult};
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use khi_types::state::enforce_quasineutrality;
use log::{debug, info};
use ndarray::{s, Array1, Array2, Array4, ArrayView1, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

/// Perturbed densities plus the raw seed-noise term.
#[derive(Debug, Clone)]
pub struct PerturbedDensity {
    /// Final densities `[lsp, lx1, lx2, lx3]`.
    pub ns: Array4<f64>,
    /// Additive noise term, quasineutral in its last species.
    pub n1: Array4<f64>,
}

/// Multiplicative density factor across the shear layer, one value per x2.
pub fn shear_density_factor(
    x2: ArrayView1<f64>,
    params: &PerturbParams,
    structure: DensityStructure,
) -> Array1<f64> {
    let (v0, vn, ell) = (params.v0(), params.vn(), params.ell());
    match structure {
        DensityStructure::OneSided => x2.mapv(|x| (vn - v0) / (v0 * (x / ell).tanh() + vn)),
        DensityStructure::TwoSided => x2.mapv(|x| {
            let slab = ((x - SHEAR_EDGE_OFFSET) / ell).tanh()
                - ((x + SHEAR_EDGE_OFFSET) / ell).tanh()
                + 1.0;
            (v0 - vn) / (v0 * slab - vn)
        }),
    }
}

/// Smoothed, scaled normal noise: one row of length `lx3` per x2 index.
pub fn seed_noise<R: Rng + ?Sized>(rng: &mut R, lx2: usize, lx3: usize) -> Array2<f64> {
    let mut noise = Array2::zeros((lx2, lx3));
    for mut row in noise.rows_mut() {
        let raw: Array1<f64> = (0..lx3)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        let smooth = moving_average(raw.view(), NOISE_WINDOW);
        row.assign(&smooth.mapv(|v| NOISE_AMPLITUDE * v));
    }
    noise
}

/// Altitude taper `0.5 + 0.5 tanh((x1 - x1ref) / dx1)`.
pub fn altitude_taper(x1: ArrayView1<f64>, params: &PerturbParams) -> Array1<f64> {
    x1.mapv(|z| 0.5 + 0.5 * ((z - params.x1ref()) / params.dx1()).tanh())
}

/// Perturb the background `nsscale` into the KHI initial state.
pub fn perturb_density<R: Rng + ?Sized>(
    grid: &SimGrid,
    nsscale: &Array4<f64>,
    params: &PerturbParams,
    structure: DensityStructure,
    rng: &mut R,
) -> KhiResult<PerturbedDensity> {
    let lx = grid.lx();
    let lsp = nsscale.shape()[0];
    let expected = [lsp, lx[0], lx[1], lx[2]];
    if nsscale.shape() != &expected[..] {
        return Err(KhiError::shape("nsscale", &expected, nsscale.shape()));
    }
    if lsp < 2 {
        return Err(KhiError::ConfigError(format!(
            "need ions and electrons, got {lsp} species"
        )));
    }

    let factor = shear_density_factor(grid.x2_interior(), params, structure);
    let factor_b = factor.view().insert_axis(Axis(0)).insert_axis(Axis(2)); // [1, lx2, 1]

    let mut ns = Array4::zeros(nsscale.raw_dim());
    let mut n1 = Array4::zeros(nsscale.raw_dim());
    for i in 0..lsp {
        let background = nsscale.index_axis(Axis(0), i);
        let noise = seed_noise(&mut *rng, lx[1], lx[2]);

        let mut n1_i = n1.index_axis_mut(Axis(0), i);
        n1_i.assign(&background);
        n1_i *= &noise.view().insert_axis(Axis(0));

        let mut ns_i = ns.index_axis_mut(Axis(0), i);
        ns_i.assign(&background);
        ns_i *= &factor_b;
        ns_i += &n1_i;
    }

    ns.mapv_inplace(|v| if v < DENSITY_FLOOR { DENSITY_FLOOR } else { v });
    enforce_quasineutrality(&mut ns);
    enforce_quasineutrality(&mut n1);

    // Strip residual E-region ionization; precipitation supplies it instead.
    let x1 = grid.x1_interior();
    let taper = altitude_taper(x1, params);
    let taper_b = taper
        .view()
        .insert_axis(Axis(0))
        .insert_axis(Axis(2))
        .insert_axis(Axis(3)); // [1, lx1, 1, 1]
    ns.slice_mut(s![..lsp - 1, .., .., ..])
        .zip_mut_with(&taper_b, |n, &t| *n = TAPER_OFFSET + *n * t);

    let mut pinned = 0;
    for (i1, &z) in x1.iter().enumerate() {
        if z < LOW_ALT_CUTOFF {
            ns.slice_mut(s![.., i1, .., ..]).fill(LOW_ALT_DENSITY);
            pinned += 1;
        }
    }
    enforce_quasineutrality(&mut ns);

    let (lo, hi) = ns
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    info!(
        "perturbed density: {lsp} species on {:?}, {pinned} altitudes below {} km pinned",
        lx,
        LOW_ALT_CUTOFF / 1e3
    );
    debug!("density range [{lo:.3e}, {hi:.3e}] m^-3, structure {structure:?}");

    Ok(PerturbedDensity { ns, n1 })
}
