// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Simulation Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Simulation mesh as seen by the initial-condition generator.
//!
//! Coordinate arrays carry two guard cells on each side, matching the
//! layout the ionosphere model writes. `theta` and `phi` are shaped like the
//! interior grid `[lx1, lx2, lx3]`.

use crate::constants::{GHOST_CELLS, R_EARTH};
use crate::error::{KhiError, KhiResult};
use crate::npz::read_key;
use ndarray::{s, Array1, Array3, ArrayView1};
use ndarray_npy::{NpzReader, NpzWriter};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SimGrid {
    lx: [usize; 3],
    x1: Array1<f64>,
    x2: Array1<f64>,
    x3: Array1<f64>,
    theta: Array3<f64>,
    phi: Array3<f64>,
}

impl SimGrid {
    /// Build a grid, checking guard-cell lengths and angular array shapes.
    pub fn new(
        lx: [usize; 3],
        x1: Array1<f64>,
        x2: Array1<f64>,
        x3: Array1<f64>,
        theta: Array3<f64>,
        phi: Array3<f64>,
    ) -> KhiResult<Self> {
        if lx.iter().any(|&n| n == 0) {
            return Err(KhiError::ConfigError(format!(
                "grid sizes must be positive, got {lx:?}"
            )));
        }
        for (name, coord, n) in [("x1", &x1, lx[0]), ("x2", &x2, lx[1]), ("x3", &x3, lx[2])] {
            let expected = n + 2 * GHOST_CELLS;
            if coord.len() != expected {
                return Err(KhiError::shape(name, &[expected], &[coord.len()]));
            }
        }
        if theta.shape() != &lx[..] {
            return Err(KhiError::shape("theta", &lx, theta.shape()));
        }
        if phi.shape() != &lx[..] {
            return Err(KhiError::shape("phi", &lx, phi.shape()));
        }
        Ok(SimGrid {
            lx,
            x1,
            x2,
            x3,
            theta,
            phi,
        })
    }

    /// Synthetic Cartesian-like grid centred on (`glat`, `glon`) degrees.
    ///
    /// `x1` spans `alt_range` (m); `x2` and `x3` are centred on zero with the
    /// given half-widths (m). `phi` varies with `x2` and `theta` with `x3`.
    pub fn cartesian(
        lx: [usize; 3],
        alt_range: (f64, f64),
        x2_half_width: f64,
        x3_half_width: f64,
        glat: f64,
        glon: f64,
    ) -> KhiResult<Self> {
        if lx.iter().any(|&n| n == 0) {
            return Err(KhiError::ConfigError(format!(
                "grid sizes must be positive, got {lx:?}"
            )));
        }
        let x1 = with_ghosts(&span(alt_range.0, alt_range.1, lx[0]));
        let x2 = with_ghosts(&span(-x2_half_width, x2_half_width, lx[1]));
        let x3 = with_ghosts(&span(-x3_half_width, x3_half_width, lx[2]));

        let colat0 = (90.0 - glat).to_radians();
        let lon0 = glon.to_radians();
        let sin_colat = colat0.sin().abs().max(1e-6);

        let x2i = x2.slice(s![GHOST_CELLS..lx[1] + GHOST_CELLS]).to_owned();
        let x3i = x3.slice(s![GHOST_CELLS..lx[2] + GHOST_CELLS]).to_owned();
        let theta = Array3::from_shape_fn((lx[0], lx[1], lx[2]), |(_, _, i3)| {
            colat0 - x3i[i3] / R_EARTH
        });
        let phi = Array3::from_shape_fn((lx[0], lx[1], lx[2]), |(_, i2, _)| {
            lon0 + x2i[i2] / (R_EARTH * sin_colat)
        });

        SimGrid::new(lx, x1, x2, x3, theta, phi)
    }

    /// Load a grid from an `.npz` archive with keys `lx`, `x1`, `x2`, `x3`,
    /// `theta`, `phi`.
    pub fn from_npz<P: AsRef<Path>>(path: P) -> KhiResult<Self> {
        let file = File::open(path.as_ref())?;
        let mut npz = NpzReader::new(file)?;

        let lx_raw: Array1<i64> = read_key(&mut npz, "lx")?;
        if lx_raw.len() != 3 || lx_raw.iter().any(|&n| n <= 0) {
            return Err(KhiError::ConfigError(format!(
                "invalid lx in '{}': {lx_raw}",
                path.as_ref().display()
            )));
        }
        let lx = [lx_raw[0] as usize, lx_raw[1] as usize, lx_raw[2] as usize];

        SimGrid::new(
            lx,
            read_key(&mut npz, "x1")?,
            read_key(&mut npz, "x2")?,
            read_key(&mut npz, "x3")?,
            read_key(&mut npz, "theta")?,
            read_key(&mut npz, "phi")?,
        )
    }

    /// Write the grid in the layout read by [`SimGrid::from_npz`].
    pub fn write_npz<P: AsRef<Path>>(&self, path: P) -> KhiResult<()> {
        let file = File::create(path)?;
        let mut npz = NpzWriter::new(file);
        let lx: Array1<i64> = self.lx.iter().map(|&n| n as i64).collect();
        npz.add_array("lx", &lx)?;
        npz.add_array("x1", &self.x1)?;
        npz.add_array("x2", &self.x2)?;
        npz.add_array("x3", &self.x3)?;
        npz.add_array("theta", &self.theta)?;
        npz.add_array("phi", &self.phi)?;
        npz.finish()?;
        Ok(())
    }

    pub fn lx(&self) -> [usize; 3] {
        self.lx
    }

    /// Full `x1` including guard cells.
    pub fn x1(&self) -> &Array1<f64> {
        &self.x1
    }

    pub fn x2(&self) -> &Array1<f64> {
        &self.x2
    }

    pub fn x3(&self) -> &Array1<f64> {
        &self.x3
    }

    pub fn theta(&self) -> &Array3<f64> {
        &self.theta
    }

    pub fn phi(&self) -> &Array3<f64> {
        &self.phi
    }

    /// `x1` with guard cells trimmed (altitude, m).
    pub fn x1_interior(&self) -> ArrayView1<'_, f64> {
        self.x1.slice(s![GHOST_CELLS..self.lx[0] + GHOST_CELLS])
    }

    pub fn x2_interior(&self) -> ArrayView1<'_, f64> {
        self.x2.slice(s![GHOST_CELLS..self.lx[1] + GHOST_CELLS])
    }

    pub fn x3_interior(&self) -> ArrayView1<'_, f64> {
        self.x3.slice(s![GHOST_CELLS..self.lx[2] + GHOST_CELLS])
    }

    /// Horizontal midpoint indices `(lx2 / 2, lx3 / 2)`.
    pub fn midpoint(&self) -> (usize, usize) {
        (self.lx[1] / 2, self.lx[2] / 2)
    }
}

fn span(lo: f64, hi: f64, n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::from_elem(1, 0.5 * (lo + hi));
    }
    let step = (hi - lo) / (n - 1) as f64;
    Array1::from_shape_fn(n, |i| lo + step * i as f64)
}

fn with_ghosts(interior: &Array1<f64>) -> Array1<f64> {
    let n = interior.len();
    let d = if n > 1 {
        interior[1] - interior[0]
    } else {
        1.0
    };
    let first = interior[0];
    let last = interior[n - 1];
    let mut out = Vec::with_capacity(n + 2 * GHOST_CELLS);
    out.push(first - 2.0 * d);
    out.push(first - d);
    out.extend(interior.iter().copied());
    out.push(last + d);
    out.push(last + 2.0 * d);
    Array1::from_vec(out)
}
