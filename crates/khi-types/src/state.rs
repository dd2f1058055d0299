// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Plasma State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{KhiError, KhiResult};
use crate::grid::SimGrid;
use ndarray::{s, Array4, Axis};

/// Plasma snapshot read from a prior simulation frame.
/// All arrays are `[lsp, lx1, lx2, lx3]`; the last species is electrons.
#[derive(Debug, Clone)]
pub struct PlasmaState {
    pub ns: Array4<f64>, // Number density [m^-3]
    pub ts: Array4<f64>, // Temperature [K]
    pub v1: Array4<f64>, // Field-aligned drift [m/s]
}

impl PlasmaState {
    pub fn new(ns: Array4<f64>, ts: Array4<f64>, v1: Array4<f64>) -> KhiResult<Self> {
        if ns.shape()[0] < 2 {
            return Err(KhiError::ConfigError(format!(
                "plasma state needs at least one ion species and electrons, got {} species",
                ns.shape()[0]
            )));
        }
        if ts.shape() != ns.shape() {
            return Err(KhiError::shape("Ts", ns.shape(), ts.shape()));
        }
        if v1.shape() != ns.shape() {
            return Err(KhiError::shape("v1", ns.shape(), v1.shape()));
        }
        Ok(PlasmaState { ns, ts, v1 })
    }

    /// Number of species including electrons.
    pub fn lsp(&self) -> usize {
        self.ns.shape()[0]
    }

    /// Fail unless the spatial dimensions agree with `grid`.
    pub fn check_grid(&self, grid: &SimGrid) -> KhiResult<()> {
        let lx = grid.lx();
        let expected = [self.lsp(), lx[0], lx[1], lx[2]];
        if self.ns.shape() != &expected[..] {
            return Err(KhiError::shape("ns", &expected, self.ns.shape()));
        }
        Ok(())
    }
}

/// Overwrite the last species with the sum of all others.
pub fn enforce_quasineutrality(ns: &mut Array4<f64>) {
    let lsp = ns.shape()[0];
    let total = ns.slice(s![..lsp - 1, .., .., ..]).sum_axis(Axis(0));
    ns.index_axis_mut(Axis(0), lsp - 1).assign(&total);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_requires_two_species() {
        let a = Array4::zeros((1, 2, 2, 2));
        assert!(PlasmaState::new(a.clone(), a.clone(), a).is_err());
    }

    #[test]
    fn test_state_rejects_mismatched_temperature() {
        let ns = Array4::zeros((7, 4, 3, 2));
        let ts = Array4::zeros((7, 4, 3, 3));
        let v1 = Array4::zeros((7, 4, 3, 2));
        assert!(matches!(
            PlasmaState::new(ns, ts, v1),
            Err(KhiError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_check_grid() {
        let grid = SimGrid::cartesian([4, 3, 2], (80e3, 400e3), 1e3, 1e3, 60.0, 0.0).unwrap();
        let good = Array4::zeros((7, 4, 3, 2));
        let state = PlasmaState::new(good.clone(), good.clone(), good).unwrap();
        assert!(state.check_grid(&grid).is_ok());

        let bad = Array4::zeros((7, 4, 2, 3));
        let state = PlasmaState::new(bad.clone(), bad.clone(), bad).unwrap();
        assert!(state.check_grid(&grid).is_err());
    }

    #[test]
    fn test_quasineutrality_sums_ions() {
        let mut ns = Array4::from_shape_fn((4, 2, 2, 2), |(i, j, k, l)| {
            (i + 1) as f64 * 10.0 + (j + k + l) as f64
        });
        enforce_quasineutrality(&mut ns);
        for j in 0..2 {
            for k in 0..2 {
                for l in 0..2 {
                    let sum: f64 = (0..3).map(|i| ns[[i, j, k, l]]).sum();
                    assert!((ns[[3, j, k, l]] - sum).abs() < 1e-12);
                }
            }
        }
    }
}
