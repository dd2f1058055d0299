// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Dataset Store
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Persistence of the plasma state and the boundary datasets.
//!
//! Time-dependent datasets are written as a directory holding
//! `simgrid.npz` (mlon, mlat) plus one archive per time step named by
//! [`datetime_stem`].

use crate::efield::EfieldDataset;
use crate::precip::PrecipDataset;
use crate::timeline::datetime_stem;
use khi_types::error::KhiResult;
use khi_types::npz::read_key;
use khi_types::state::PlasmaState;
use log::debug;
use ndarray::{arr0, s, Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Where the generator reads its input state and writes its products.
pub trait DatasetStore {
    /// Load `ns`, `Ts` and `v1`.
    fn read_state(&self, path: &Path) -> KhiResult<PlasmaState>;
    /// Overwrite the state with perturbed densities and the top potential.
    fn write_state(&self, path: &Path, state: &PlasmaState, phitop: &Array2<f64>)
        -> KhiResult<()>;
    fn write_efield(&self, dataset: &EfieldDataset, dir: &Path) -> KhiResult<()>;
    fn write_precip(&self, dataset: &PrecipDataset, dir: &Path) -> KhiResult<()>;
}

/// NumPy `.npz` archives on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpzStore;

impl NpzStore {
    fn write_simgrid(dir: &Path, mlon: &Array1<f64>, mlat: &Array1<f64>) -> KhiResult<()> {
        fs::create_dir_all(dir)?;
        let mut npz = NpzWriter::new(File::create(dir.join("simgrid.npz"))?);
        npz.add_array("mlon", mlon)?;
        npz.add_array("mlat", mlat)?;
        npz.finish()?;
        Ok(())
    }
}

/// Archive path for one time step of a dataset.
pub fn step_path(dir: &Path, t: chrono::DateTime<chrono::Utc>) -> PathBuf {
    dir.join(format!("{}.npz", datetime_stem(t)))
}

impl DatasetStore for NpzStore {
    fn read_state(&self, path: &Path) -> KhiResult<PlasmaState> {
        let mut npz = NpzReader::new(File::open(path)?)?;
        PlasmaState::new(
            read_key(&mut npz, "ns")?,
            read_key(&mut npz, "Ts")?,
            read_key(&mut npz, "v1")?,
        )
    }

    fn write_state(
        &self,
        path: &Path,
        state: &PlasmaState,
        phitop: &Array2<f64>,
    ) -> KhiResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut npz = NpzWriter::new(File::create(path)?);
        npz.add_array("ns", &state.ns)?;
        npz.add_array("Ts", &state.ts)?;
        npz.add_array("v1", &state.v1)?;
        npz.add_array("Phitop", phitop)?;
        npz.finish()?;
        debug!("wrote state {:?} to {}", state.ns.dim(), path.display());
        Ok(())
    }

    fn write_efield(&self, dataset: &EfieldDataset, dir: &Path) -> KhiResult<()> {
        Self::write_simgrid(dir, &dataset.mlon, &dataset.mlat)?;
        for (i, &t) in dataset.time.iter().enumerate() {
            let mut npz = NpzWriter::new(File::create(step_path(dir, t))?);
            npz.add_array("flagdirich", &arr0(dataset.flagdirich[i]))?;
            npz.add_array("Exit", &dataset.exit.slice(s![i, .., ..]))?;
            npz.add_array("Eyit", &dataset.eyit.slice(s![i, .., ..]))?;
            npz.add_array("Vminx1it", &dataset.vminx1it.slice(s![i, .., ..]))?;
            npz.add_array("Vmaxx1it", &dataset.vmaxx1it.slice(s![i, .., ..]))?;
            npz.add_array("Vminx2ist", &dataset.vminx2ist.row(i))?;
            npz.add_array("Vmaxx2ist", &dataset.vmaxx2ist.row(i))?;
            npz.add_array("Vminx3ist", &dataset.vminx3ist.row(i))?;
            npz.add_array("Vmaxx3ist", &dataset.vmaxx3ist.row(i))?;
            npz.finish()?;
        }
        debug!("wrote {} field steps to {}", dataset.nt(), dir.display());
        Ok(())
    }

    fn write_precip(&self, dataset: &PrecipDataset, dir: &Path) -> KhiResult<()> {
        Self::write_simgrid(dir, &dataset.mlon, &dataset.mlat)?;
        for (i, &t) in dataset.time.iter().enumerate() {
            let mut npz = NpzWriter::new(File::create(step_path(dir, t))?);
            npz.add_array("Qp", &dataset.q.slice(s![i, .., ..]))?;
            npz.add_array("E0p", &dataset.e0.slice(s![i, .., ..]))?;
            npz.finish()?;
        }
        debug!("wrote {} precipitation steps to {}", dataset.nt(), dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geomag::GeomagGrid;
    use chrono::{TimeZone, Utc};
    use khi_types::grid::SimGrid;
    use ndarray::{Array3, Array4};

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "khi_store_{name}_{}_{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or(0)
        ))
    }

    fn times(n: i64) -> Vec<chrono::DateTime<Utc>> {
        let t0 = Utc.with_ymd_and_hms(2013, 2, 20, 5, 0, 0).unwrap();
        (0..n).map(|i| t0 + chrono::Duration::seconds(60 * i)).collect()
    }

    #[test]
    fn test_state_roundtrip_with_phitop() {
        let dir = scratch("state");
        let path = dir.join("initial_conditions.npz");
        let ns = Array4::from_shape_fn((3, 4, 5, 2), |(s, i, j, k)| (s + i + j + k) as f64);
        let state = PlasmaState::new(ns.clone(), ns.clone() * 2.0, Array4::zeros((3, 4, 5, 2)))
            .unwrap();
        let phitop = Array2::from_elem((5, 2), 0.5);

        NpzStore.write_state(&path, &state, &phitop).unwrap();
        let back = NpzStore.read_state(&path).unwrap();
        assert_eq!(back.ns, state.ns);
        assert_eq!(back.ts, state.ts);

        let mut npz = NpzReader::new(File::open(&path).unwrap()).unwrap();
        let phi: Array2<f64> = read_key(&mut npz, "Phitop").unwrap();
        assert_eq!(phi, phitop);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_efield_layout() {
        let dir = scratch("efield");
        let sim = SimGrid::cartesian([4, 8, 6], (80e3, 600e3), 100e3, 50e3, 67.0, 212.0).unwrap();
        let geomag = GeomagGrid::with_resolution(&sim, 5, 3);
        let mut ds = EfieldDataset::zeros(times(2), geomag, Some(0.01), None);
        ds.vmaxx2ist.row_mut(1).fill(7.0);

        NpzStore.write_efield(&ds, &dir).unwrap();
        assert!(dir.join("simgrid.npz").exists());

        let step = step_path(&dir, ds.time[1]);
        assert!(step.ends_with("20130220_18060.000000.npz"));
        let mut npz = NpzReader::new(File::open(&step).unwrap()).unwrap();
        let flag: ndarray::Array0<i32> = read_key(&mut npz, "flagdirich").unwrap();
        assert_eq!(flag.into_scalar(), 0);
        let exit: Array2<f64> = read_key(&mut npz, "Exit").unwrap();
        assert_eq!(exit.dim(), (5, 3));
        assert!(exit.iter().all(|v| *v == 0.01));
        let vmax: Array1<f64> = read_key(&mut npz, "Vmaxx2ist").unwrap();
        assert_eq!(vmax, Array1::from_elem(3, 7.0));
        let vmin3: Array1<f64> = read_key(&mut npz, "Vminx3ist").unwrap();
        assert_eq!(vmin3.len(), 5);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_precip_layout() {
        let dir = scratch("precip");
        let ds = PrecipDataset {
            time: times(3),
            mlon: Array1::linspace(0.0, 1.0, 4),
            mlat: Array1::linspace(60.0, 61.0, 2),
            q: Array3::from_elem((3, 4, 2), 1.5),
            e0: Array3::from_elem((3, 4, 2), 3e3),
        };
        NpzStore.write_precip(&ds, &dir).unwrap();

        let mut grid = NpzReader::new(File::open(dir.join("simgrid.npz")).unwrap()).unwrap();
        let mlon: Array1<f64> = read_key(&mut grid, "mlon").unwrap();
        assert_eq!(mlon, ds.mlon);

        for &t in &ds.time {
            let mut npz = NpzReader::new(File::open(step_path(&dir, t)).unwrap()).unwrap();
            let q: Array2<f64> = read_key(&mut npz, "Qp").unwrap();
            let e0: Array2<f64> = read_key(&mut npz, "E0p").unwrap();
            assert_eq!(q.dim(), (4, 2));
            assert!(e0.iter().all(|v| *v == 3e3));
        }
        fs::remove_dir_all(&dir).ok();
    }
}
