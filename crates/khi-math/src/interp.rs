// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Linear Interpolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Piecewise-linear 1-D interpolation with linear extrapolation.
//!
//! Samples need not arrive sorted; they are ordered on construction.
//! Outside the sample range the first/last segment is extended.

use khi_types::error::{KhiError, KhiResult};
use ndarray::{Array1, ArrayView1};

#[derive(Debug, Clone)]
pub struct Interp1d {
    xp: Vec<f64>,
    fp: Vec<f64>,
}

impl Interp1d {
    /// Build an interpolant from sample positions `xp` and values `fp`.
    ///
    /// A single sample yields a constant. Repeated positions are rejected.
    pub fn new(xp: ArrayView1<f64>, fp: ArrayView1<f64>) -> KhiResult<Self> {
        if xp.len() != fp.len() {
            return Err(KhiError::shape("interpolation samples", &[xp.len()], &[fp.len()]));
        }
        if xp.is_empty() {
            return Err(KhiError::ConfigError(
                "interpolation needs at least one sample".into(),
            ));
        }
        if xp.iter().chain(fp.iter()).any(|v| !v.is_finite()) {
            return Err(KhiError::ConfigError(
                "interpolation samples must be finite".into(),
            ));
        }

        let mut pairs: Vec<(f64, f64)> = xp.iter().copied().zip(fp.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        if pairs.windows(2).any(|w| w[1].0 == w[0].0) {
            return Err(KhiError::ConfigError(
                "interpolation sample positions must be distinct".into(),
            ));
        }

        let (xp, fp) = pairs.into_iter().unzip();
        Ok(Interp1d { xp, fp })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xp.len();
        if n == 1 {
            return self.fp[0];
        }
        // Segment whose left end is the last sample <= x, clamped to [0, n-2].
        let i = self.xp.partition_point(|&v| v <= x).saturating_sub(1).min(n - 2);
        let (x0, x1) = (self.xp[i], self.xp[i + 1]);
        let (f0, f1) = (self.fp[i], self.fp[i + 1]);
        f0 + (f1 - f0) * (x - x0) / (x1 - x0)
    }

    pub fn eval_many(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(|v| self.eval(v))
    }
}

/// One-shot helper: interpolate `(xp, fp)` at every point of `x`.
pub fn interp1d_extrapolate(
    xp: ArrayView1<f64>,
    fp: ArrayView1<f64>,
    x: ArrayView1<f64>,
) -> KhiResult<Array1<f64>> {
    Ok(Interp1d::new(xp, fp)?.eval_many(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_exact_samples() {
        let xp = array![0.0, 1.0, 2.0, 4.0];
        let fp = array![10.0, 20.0, 40.0, 0.0];
        let f = Interp1d::new(xp.view(), fp.view()).unwrap();
        for (x, y) in xp.iter().zip(fp.iter()) {
            assert!((f.eval(*x) - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_midpoints() {
        let f = Interp1d::new(array![0.0, 2.0, 4.0].view(), array![0.0, 4.0, 0.0].view())
            .unwrap();
        assert!((f.eval(1.0) - 2.0).abs() < 1e-12);
        assert!((f.eval(3.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrapolates_end_segments() {
        let f = Interp1d::new(array![0.0, 1.0, 2.0].view(), array![0.0, 1.0, 3.0].view())
            .unwrap();
        // left segment slope 1, right segment slope 2
        assert!((f.eval(-1.0) + 1.0).abs() < 1e-12);
        assert!((f.eval(3.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input() {
        let f = Interp1d::new(array![2.0, 0.0, 1.0].view(), array![20.0, 0.0, 10.0].view())
            .unwrap();
        assert!((f.eval(1.5) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_is_constant() {
        let f = Interp1d::new(array![3.0].view(), array![7.5].view()).unwrap();
        assert_eq!(f.eval(-100.0), 7.5);
        assert_eq!(f.eval(100.0), 7.5);
    }

    #[test]
    fn test_rejects_bad_samples() {
        assert!(Interp1d::new(array![0.0, 1.0].view(), array![0.0].view()).is_err());
        assert!(Interp1d::new(array![1.0, 1.0].view(), array![0.0, 2.0].view()).is_err());
        assert!(Interp1d::new(array![0.0, f64::NAN].view(), array![0.0, 2.0].view()).is_err());
        let empty: Array1<f64> = Array1::zeros(0);
        assert!(Interp1d::new(empty.view(), empty.view()).is_err());
    }

    #[test]
    fn test_eval_many() {
        let out = interp1d_extrapolate(
            array![0.0, 10.0].view(),
            array![0.0, 100.0].view(),
            array![-1.0, 0.5, 12.0].view(),
        )
        .unwrap();
        assert!((out[0] + 10.0).abs() < 1e-12);
        assert!((out[1] - 5.0).abs() < 1e-12);
        assert!((out[2] - 120.0).abs() < 1e-12);
    }
}
