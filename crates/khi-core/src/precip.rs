// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Particle Precipitation Dataset
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Auroral precipitation inputs: energy flux `Q` [mW m^-2] and
//! characteristic energy `E0` [eV] on the geomagnetic grid.

use crate::geomag::{project, GeomagGrid};
use crate::timeline::{datetime_range, nearest_index, offset};
use chrono::{DateTime, Utc};
use khi_types::config::{PrecipConfig, PrecipShape, SimConfig};
use khi_types::constants::{E0_RELATIVISTIC_LIMIT, SHEAR_EDGE_OFFSET};
use khi_types::error::{KhiError, KhiResult};
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use log::{debug, info};
use ndarray::{s, Array1, Array2, Array3, ArrayView1, Axis};

#[derive(Debug, Clone)]
pub struct PrecipDataset {
    pub time: Vec<DateTime<Utc>>,
    pub mlon: Array1<f64>,
    pub mlat: Array1<f64>,
    /// Energy flux [mW m^-2], `(time, mlon, mlat)`.
    pub q: Array3<f64>,
    /// Characteristic energy [eV], `(time, mlon, mlat)`.
    pub e0: Array3<f64>,
}

impl PrecipDataset {
    pub fn nt(&self) -> usize {
        self.time.len()
    }
}

/// Reject characteristic energies that are non-finite, non-positive or
/// relativistic (100 MeV and above).
pub fn validate_e0(e0: f64) -> KhiResult<()> {
    if !e0.is_finite() {
        return Err(KhiError::PhysicsViolation(format!(
            "E0 precipitation must be finite, got {e0}"
        )));
    }
    if e0 <= 0.0 {
        return Err(KhiError::PhysicsViolation(format!(
            "E0 precipitation must be positive, got {e0} eV"
        )));
    }
    if e0 >= E0_RELATIVISTIC_LIMIT {
        return Err(KhiError::PhysicsViolation(format!(
            "E0 precipitation must be below 100 MeV, got {e0} eV"
        )));
    }
    Ok(())
}

/// Check a precipitation section before anything is built or written:
/// E0 bounds, finite non-negative fluxes and Gaussian widths.
pub fn validate_precip(precip_cfg: &PrecipConfig) -> KhiResult<()> {
    validate_e0(precip_cfg.e0_precip)?;
    for (name, q) in [
        ("Qprecip", precip_cfg.q_precip),
        ("Qprecip_background", precip_cfg.q_precip_background),
    ] {
        if !q.is_finite() || q < 0.0 {
            return Err(KhiError::PhysicsViolation(format!(
                "{name} must be finite and non-negative, got {q}"
            )));
        }
    }
    if let PrecipShape::Gaussian {
        mlon_sigma,
        mlat_sigma,
    } = precip_cfg.shape
    {
        check_widths(mlon_sigma, mlat_sigma)?;
    }
    Ok(())
}

fn check_widths(mlon_sigma: Option<f64>, mlat_sigma: Option<f64>) -> KhiResult<()> {
    if mlon_sigma.is_none() && mlat_sigma.is_none() {
        return Err(KhiError::ConfigError(
            "gaussian precipitation needs mlon_sigma, mlat_sigma or both".into(),
        ));
    }
    for sigma in [mlon_sigma, mlat_sigma].into_iter().flatten() {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(KhiError::ConfigError(format!(
                "gaussian precipitation width must be positive, got {sigma}"
            )));
        }
    }
    Ok(())
}

/// Active step range `i_on..i_off`; an absent start means 0 and an absent
/// end means every step.
pub fn precip_window(
    time: &[DateTime<Utc>],
    startsec: Option<f64>,
    endsec: Option<f64>,
) -> (usize, usize) {
    let Some(&t0) = time.first() else {
        return (0, 0);
    };
    let i_on = startsec
        .and_then(|s| nearest_index(time, offset(t0, s)))
        .unwrap_or(0);
    let i_off = endsec
        .and_then(|s| nearest_index(time, offset(t0, s)))
        .unwrap_or(time.len());
    (i_on, i_off)
}

/// Smoothed step in x2 at +50 km, uniform in mlat, floored at `q_background`.
pub fn shear_step_flux(
    x2i: ArrayView1<f64>,
    llat: usize,
    ell: f64,
    q_peak: f64,
    q_background: f64,
) -> Array2<f64> {
    let q = x2i.mapv(|x| {
        let v = q_peak * (0.5 * ((x - SHEAR_EDGE_OFFSET) / ell).tanh() + 0.5);
        floor_flux(v, q_background)
    });
    let mut out = Array2::zeros((x2i.len(), llat));
    out.assign(&q.insert_axis(Axis(1)));
    out
}

/// Gaussian about the grid centre in mlon and/or mlat, floored at
/// `q_background`.
pub fn gaussian_flux(
    geomag: &GeomagGrid,
    mlon_sigma: Option<f64>,
    mlat_sigma: Option<f64>,
    q_peak: f64,
    q_background: f64,
) -> KhiResult<Array2<f64>> {
    check_widths(mlon_sigma, mlat_sigma)?;

    let lon_profile = profile(&geomag.mlon, mlon_sigma);
    let lat_profile = profile(&geomag.mlat, mlat_sigma);
    let q = Array2::from_shape_fn((geomag.llon(), geomag.llat()), |(i, j)| {
        floor_flux(q_peak * lon_profile[i] * lat_profile[j], q_background)
    });
    Ok(q)
}

/// Raise `v` to the background; NaN passes through to the finiteness check.
fn floor_flux(v: f64, q_background: f64) -> f64 {
    if v < q_background {
        q_background
    } else {
        v
    }
}

fn profile(coord: &Array1<f64>, sigma: Option<f64>) -> Array1<f64> {
    match sigma {
        Some(sigma) => {
            let mean = coord.mean().unwrap_or(0.0);
            coord.mapv(|c| (-(c - mean).powi(2) / (2.0 * sigma * sigma)).exp())
        }
        None => Array1::ones(coord.len()),
    }
}

/// Build the precipitation dataset on a cadence of `dtprec` over `tdur`.
pub fn create_precip(
    cfg: &SimConfig,
    precip_cfg: &PrecipConfig,
    grid: &SimGrid,
    params: &PerturbParams,
) -> KhiResult<PrecipDataset> {
    validate_e0(precip_cfg.e0_precip)?;
    let dtprec = cfg
        .dtprec
        .ok_or_else(|| KhiError::ConfigError("precipitation requires dtprec".into()))?;

    let time = datetime_range(cfg.start_time()?, cfg.tdur, dtprec)?;
    let nt = time.len();
    let (i_on, i_off) =
        precip_window(&time, precip_cfg.precip_startsec, precip_cfg.precip_endsec);

    let geomag = GeomagGrid::covering(grid);
    let shape = (nt, geomag.llon(), geomag.llat());

    let q_step = match precip_cfg.shape {
        PrecipShape::ShearStep => {
            let proj = project(grid, &geomag)?;
            shear_step_flux(
                proj.x2i.view(),
                geomag.llat(),
                params.ell(),
                precip_cfg.q_precip,
                precip_cfg.q_precip_background,
            )
        }
        PrecipShape::Gaussian {
            mlon_sigma,
            mlat_sigma,
        } => gaussian_flux(
            &geomag,
            mlon_sigma,
            mlat_sigma,
            precip_cfg.q_precip,
            precip_cfg.q_precip_background,
        )?,
    };

    let mut q = Array3::zeros(shape);
    let mut e0 = Array3::zeros(shape);
    if i_on < i_off {
        for mut step in q.slice_mut(s![i_on..i_off, .., ..]).axis_iter_mut(Axis(0)) {
            step.assign(&q_step);
        }
        e0.slice_mut(s![i_on..i_off, .., ..]).fill(precip_cfg.e0_precip);
    }

    if q.iter().any(|v| !v.is_finite()) {
        return Err(KhiError::PhysicsViolation("Q flux must be finite".into()));
    }
    if q.iter().any(|v| *v < 0.0) {
        return Err(KhiError::PhysicsViolation("Q flux must be non-negative".into()));
    }

    info!(
        "precipitation: {nt} steps, active {i_on}..{i_off}, {:?} on {}x{}",
        precip_cfg.shape,
        geomag.llon(),
        geomag.llat()
    );
    debug!(
        "Q max {:.4e} mW/m^2, E0 {:.1} eV",
        q.iter().cloned().fold(0.0, f64::max),
        precip_cfg.e0_precip
    );

    Ok(PrecipDataset {
        time,
        mlon: geomag.mlon,
        mlat: geomag.mlat,
        q,
        e0,
    })
}
