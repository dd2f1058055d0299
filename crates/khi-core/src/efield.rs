// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Electric Field Boundary Dataset
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Background electric field and boundary conditions that maintain the
//! shear flow for the duration of the run.
//!
//! Arrays are laid out `(time, mlon, mlat)` for the 3-D fields, `(time, mlat)`
//! for the x2 boundaries and `(time, mlon)` for the x3 boundaries.

use crate::geomag::{project, GeomagGrid};
use crate::timeline::datetime_range;
use chrono::{DateTime, Utc};
use khi_math::integrate::cumulative_along_rows;
use khi_math::spacing::forward_spacing;
use khi_types::config::{BoundaryStrategy, SimConfig};
use khi_types::error::KhiResult;
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use log::{debug, info};
use ndarray::{Array1, Array2, Array3, ArrayView1, Axis};

#[derive(Debug, Clone)]
pub struct EfieldDataset {
    pub time: Vec<DateTime<Utc>>,
    pub mlon: Array1<f64>,
    pub mlat: Array1<f64>,
    /// Background field, x2 component [V/m].
    pub exit: Array3<f64>,
    /// Background field, x3 component [V/m].
    pub eyit: Array3<f64>,
    pub vminx1it: Array3<f64>,
    pub vmaxx1it: Array3<f64>,
    pub vminx2ist: Array2<f64>,
    pub vmaxx2ist: Array2<f64>,
    pub vminx3ist: Array2<f64>,
    pub vmaxx3ist: Array2<f64>,
    /// 0 = boundary arrays are field-aligned currents, 1 = potentials.
    pub flagdirich: Array1<i32>,
}

impl EfieldDataset {
    /// Zero boundaries on the given time/geomagnetic grid; `Exit`/`Eyit`
    /// start from their uniform overrides when set.
    pub fn zeros(
        time: Vec<DateTime<Utc>>,
        geomag: GeomagGrid,
        exit: Option<f64>,
        eyit: Option<f64>,
    ) -> Self {
        let nt = time.len();
        let (llon, llat) = (geomag.llon(), geomag.llat());
        let field_shape = (nt, llon, llat);
        EfieldDataset {
            time,
            mlon: geomag.mlon,
            mlat: geomag.mlat,
            exit: Array3::from_elem(field_shape, exit.unwrap_or(0.0)),
            eyit: Array3::from_elem(field_shape, eyit.unwrap_or(0.0)),
            vminx1it: Array3::zeros(field_shape),
            vmaxx1it: Array3::zeros(field_shape),
            vminx2ist: Array2::zeros((nt, llat)),
            vmaxx2ist: Array2::zeros((nt, llat)),
            vminx3ist: Array2::zeros((nt, llon)),
            vmaxx3ist: Array2::zeros((nt, llon)),
            flagdirich: Array1::zeros(nt),
        }
    }

    pub fn nt(&self) -> usize {
        self.time.len()
    }
}

/// Shear drift field `E2 = B1 (v0 tanh(x2/ell) - vn)` on `(mlon, mlat)`,
/// reversed along mlon.
pub fn shear_field(x2i: ArrayView1<f64>, llat: usize, params: &PerturbParams) -> Array2<f64> {
    let (v0, vn, ell) = (params.v0(), params.vn(), params.ell());
    let llon = x2i.len();
    let vel = x2i.mapv(|x| v0 * (x / ell).tanh() - vn);
    Array2::from_shape_fn((llon, llat), |(i, _)| vel[llon - 1 - i] * params.b1val())
}

/// Build the field dataset on a cadence of `dtE0` over `tdur`.
pub fn create_efield(
    cfg: &SimConfig,
    grid: &SimGrid,
    params: &PerturbParams,
    strategy: BoundaryStrategy,
) -> KhiResult<EfieldDataset> {
    let time = datetime_range(cfg.start_time()?, cfg.tdur, cfg.dt_e0)?;
    let geomag = GeomagGrid::covering(grid);
    let proj = project(grid, &geomag)?;
    let llat = geomag.llat();

    let mut dataset = EfieldDataset::zeros(time, geomag, cfg.exit, cfg.eyit);
    let e2slab = shear_field(proj.x2i.view(), llat, params);

    match strategy {
        BoundaryStrategy::BackgroundField => {
            let exit = e2slab.mapv(|e| -e);
            for mut step in dataset.exit.axis_iter_mut(Axis(0)) {
                step.assign(&exit);
            }
        }
        BoundaryStrategy::PotentialIntegration => {
            let dx2 = forward_spacing(proj.x2i.view());
            let phi = cumulative_along_rows(e2slab.view(), dx2.view());
            let last = phi.nrows() - 1;
            let (first_row, last_row) = (phi.row(0), phi.row(last));
            dataset.vminx2ist.rows_mut().into_iter().for_each(|mut r| r.assign(&first_row));
            dataset.vmaxx2ist.rows_mut().into_iter().for_each(|mut r| r.assign(&last_row));
        }
    }

    info!(
        "electric field: {} steps on {}x{} ({strategy:?})",
        dataset.nt(),
        dataset.mlon.len(),
        llat
    );
    debug!(
        "Exit range [{:.4e}, {:.4e}] V/m",
        dataset.exit.iter().cloned().fold(f64::INFINITY, f64::min),
        dataset.exit.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    );
    Ok(dataset)
}
