// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Geomagnetic Output Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Magnetic longitude/latitude grid shared by the field and precipitation
//! datasets, and the projection of simulation coordinates onto it.
//!
//! The projection assumes a Cartesian-like mesh: mlon follows x2 and mlat
//! follows x3.

use khi_math::interp::Interp1d;
use khi_math::spacing::linspace;
use khi_types::constants::{GEOMAG_BUFFER, GEOMAG_POINTS};
use khi_types::error::KhiResult;
use khi_types::grid::SimGrid;
use log::{debug, warn};
use ndarray::{s, Array1};

#[derive(Debug, Clone)]
pub struct GeomagGrid {
    /// Magnetic longitude [deg], axis 1 of every dataset array.
    pub mlon: Array1<f64>,
    /// Magnetic latitude [deg], axis 2 of every dataset array.
    pub mlat: Array1<f64>,
}

impl GeomagGrid {
    /// Output grid covering `grid` with 1% padding.
    ///
    /// 512 × 512 points, except that a single-cell x2 collapses mlon to one
    /// point, or failing that a single-cell x3 collapses mlat.
    pub fn covering(grid: &SimGrid) -> Self {
        let lx = grid.lx();
        let (mut llon, mut llat) = (GEOMAG_POINTS, GEOMAG_POINTS);
        if lx[1] == 1 {
            llon = 1;
            if lx[2] == 1 {
                warn!("grid is one cell in both x2 and x3; only mlon is collapsed");
            }
        } else if lx[2] == 1 {
            llat = 1;
        }
        Self::with_resolution(grid, llon, llat)
    }

    pub fn with_resolution(grid: &SimGrid, llon: usize, llat: usize) -> Self {
        let (theta_min, theta_max) = min_max(grid.theta().iter());
        let (phi_min, phi_max) = min_max(grid.phi().iter());

        let mlat_min = 90.0 - theta_max.to_degrees();
        let mlat_max = 90.0 - theta_min.to_degrees();
        let mlon_min = phi_min.to_degrees();
        let mlon_max = phi_max.to_degrees();

        let lat_buf = GEOMAG_BUFFER * (mlat_max - mlat_min);
        let lon_buf = GEOMAG_BUFFER * (mlon_max - mlon_min);

        let geomag = GeomagGrid {
            mlon: linspace(mlon_min - lon_buf, mlon_max + lon_buf, llon),
            mlat: linspace(mlat_min - lat_buf, mlat_max + lat_buf, llat),
        };
        debug!(
            "geomagnetic grid {llon}x{llat}: mlon [{:.4}, {:.4}] mlat [{:.4}, {:.4}]",
            mlon_min - lon_buf,
            mlon_max + lon_buf,
            mlat_min - lat_buf,
            mlat_max + lat_buf
        );
        geomag
    }

    pub fn llon(&self) -> usize {
        self.mlon.len()
    }

    pub fn llat(&self) -> usize {
        self.mlat.len()
    }
}

/// Simulation horizontal coordinates evaluated on the output grid.
#[derive(Debug, Clone)]
pub struct Projection {
    /// x2 [m] at each mlon.
    pub x2i: Array1<f64>,
    /// x3 [m] at each mlat.
    pub x3i: Array1<f64>,
}

/// Interpolate interior x2 against mlon and x3 against mlat, extrapolating
/// linearly past the grid edges.
pub fn project(grid: &SimGrid, geomag: &GeomagGrid) -> KhiResult<Projection> {
    let grid_mlon = grid.phi().slice(s![0, .., 0]).mapv(f64::to_degrees);
    let grid_mlat = grid.theta().slice(s![0, 0, ..]).mapv(|t| 90.0 - t.to_degrees());

    let x2i = Interp1d::new(grid_mlon.view(), grid.x2_interior())?.eval_many(geomag.mlon.view());
    let x3i = Interp1d::new(grid_mlat.view(), grid.x3_interior())?.eval_many(geomag.mlat.view());
    Ok(Projection { x2i, x3i })
}

fn min_max<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}
