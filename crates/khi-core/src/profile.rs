// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Background Profile
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Horizontally uniform background built from the equilibrium's centre column.

use khi_types::constants::BACKGROUND_SCALE;
use khi_types::error::KhiResult;
use khi_types::grid::SimGrid;
use khi_types::state::{enforce_quasineutrality, PlasmaState};
use log::debug;
use ndarray::{s, Array4, Axis};

/// Broadcast the profile at the horizontal midpoint across the grid.
///
/// Ion species are scaled by [`BACKGROUND_SCALE`]; electrons are then
/// rebuilt as the ion sum. Output shape equals `state.ns`.
pub fn init_profile(grid: &SimGrid, state: &PlasmaState) -> KhiResult<Array4<f64>> {
    state.check_grid(grid)?;
    let (ix2, ix3) = grid.midpoint();
    let lsp = state.lsp();

    let mut nsscale = Array4::zeros(state.ns.raw_dim());
    for i in 0..lsp {
        let scale = if i < lsp - 1 { BACKGROUND_SCALE } else { 1.0 };
        let column = state
            .ns
            .slice(s![i, .., ix2, ix3])
            .mapv(|n| scale * n)
            .insert_axis(Axis(1))
            .insert_axis(Axis(2));
        nsscale.index_axis_mut(Axis(0), i).assign(&column);
    }
    enforce_quasineutrality(&mut nsscale);

    debug!(
        "background profile from column ({ix2}, {ix3}), {lsp} species, shape {:?}",
        nsscale.shape()
    );
    Ok(nsscale)
}
