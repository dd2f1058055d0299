// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Top-Boundary Potential
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Top-boundary potential written alongside the perturbed state.

use khi_math::integrate::cumulative_along_rows;
use khi_math::spacing::forward_spacing;
use khi_types::config::TopPotential;
use khi_types::constants::SHEAR_EDGE_OFFSET;
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use log::debug;
use ndarray::{s, Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

/// Rows left quiet at the low-x2 edge of the noise seed.
const QUIET_ROWS_LOW: usize = 9;

/// Rows counted back from the high-x2 edge; the final row keeps its noise.
const QUIET_ROWS_HIGH: usize = 10;

/// Initial potential `[lx2, lx3]` at the top boundary.
pub fn seed_potential<R: Rng + ?Sized>(
    grid: &SimGrid,
    params: &PerturbParams,
    mode: TopPotential,
    rng: &mut R,
) -> Array2<f64> {
    let lx = grid.lx();
    let (lx2, lx3) = (lx[1], lx[2]);
    let phitop = match mode {
        TopPotential::Zero => Array2::zeros((lx2, lx3)),
        TopPotential::Noise => {
            let mut phi =
                Array2::from_shape_fn((lx2, lx3), |_| rng.sample::<f64, _>(StandardNormal));
            let low_end = QUIET_ROWS_LOW.min(lx2);
            phi.slice_mut(s![..low_end, ..]).fill(0.0);
            let high_start = lx2.saturating_sub(QUIET_ROWS_HIGH);
            let high_end = lx2.saturating_sub(1);
            if high_start < high_end {
                phi.slice_mut(s![high_start..high_end, ..]).fill(0.0);
            }
            phi
        }
        TopPotential::ShearBackground => {
            shear_background(grid.x2_interior().to_owned(), lx3, params)
        }
    };
    debug!("top potential {mode:?}, shape {:?}", phitop.dim());
    phitop
}

/// Two-sided background drift integrated along x2.
fn shear_background(x2: Array1<f64>, lx3: usize, params: &PerturbParams) -> Array2<f64> {
    let (v0, vn, ell) = (params.v0(), params.vn(), params.ell());
    let vel = x2.mapv(|x| {
        let slab = ((x - SHEAR_EDGE_OFFSET) / ell).tanh() - ((x + SHEAR_EDGE_OFFSET) / ell).tanh();
        v0 * (slab + 1.0) - vn
    });
    // Reversed in x2 to match the equilibrium orientation.
    let e2top = Array2::from_shape_fn((x2.len(), lx3), |(i, _)| {
        vel[x2.len() - 1 - i] * params.b1val()
    });
    let dx2 = forward_spacing(x2.view());
    cumulative_along_rows(e2top.view(), dx2.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(lx2: usize) -> SimGrid {
        SimGrid::cartesian([4, lx2, 6], (80e3, 600e3), 100e3, 20e3, 67.0, 212.0).unwrap()
    }

    #[test]
    fn test_noise_quiet_edges() {
        let g = grid(32);
        let mut rng = StdRng::seed_from_u64(5);
        let phi = seed_potential(&g, &PerturbParams::default(), TopPotential::Noise, &mut rng);
        assert_eq!(phi.dim(), (32, 6));
        for i in 0..9 {
            assert!(phi.row(i).iter().all(|v| *v == 0.0), "row {i} should be quiet");
        }
        for i in 22..31 {
            assert!(phi.row(i).iter().all(|v| *v == 0.0), "row {i} should be quiet");
        }
        assert!(phi.row(15).iter().any(|v| *v != 0.0));
        assert!(phi.row(31).iter().any(|v| *v != 0.0));
    }

    #[test]
    fn test_noise_small_grid() {
        let g = grid(5);
        let mut rng = StdRng::seed_from_u64(5);
        let phi = seed_potential(&g, &PerturbParams::default(), TopPotential::Noise, &mut rng);
        assert!(phi.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_zero_mode() {
        let g = grid(16);
        let mut rng = StdRng::seed_from_u64(0);
        let phi = seed_potential(&g, &PerturbParams::default(), TopPotential::Zero, &mut rng);
        assert_eq!(phi, Array2::<f64>::zeros((16, 6)));
    }

    #[test]
    fn test_shear_background_uniform_in_x3() {
        let g = grid(40);
        let mut rng = StdRng::seed_from_u64(0);
        let phi = seed_potential(
            &g,
            &PerturbParams::default(),
            TopPotential::ShearBackground,
            &mut rng,
        );
        assert_eq!(phi.dim(), (40, 6));
        for row in phi.rows() {
            assert!(row.iter().all(|v| (*v - row[0]).abs() < 1e-12));
        }
        assert!(phi.iter().all(|v| v.is_finite()));
        // Integration of a nonzero field changes the potential along x2.
        assert!((phi[[39, 0]] - phi[[0, 0]]).abs() > 0.0);
    }
}
