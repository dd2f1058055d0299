// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Grid Spacing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coordinate vectors and grid spacing.

use ndarray::{Array1, ArrayView1};

/// `n` evenly spaced points from `start` to `stop` inclusive.
/// `n == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            Array1::from_shape_fn(n, |i| {
                if i == n - 1 {
                    stop
                } else {
                    start + step * i as f64
                }
            })
        }
    }
}

/// Forward differences with the last spacing repeated, so the result has the
/// same length as `x`. A single point has zero spacing.
pub fn forward_spacing(x: ArrayView1<f64>) -> Array1<f64> {
    let n = x.len();
    if n < 2 {
        return Array1::zeros(n);
    }
    let mut dx = Array1::zeros(n);
    for i in 0..n - 1 {
        dx[i] = x[i + 1] - x[i];
    }
    dx[n - 1] = dx[n - 2];
    dx
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linspace_endpoints() {
        let x = linspace(-1.0, 3.0, 5);
        assert_eq!(x, array![-1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert_eq!(linspace(2.0, 9.0, 1), array![2.0]);
        assert_eq!(linspace(2.0, 9.0, 0).len(), 0);
    }

    #[test]
    fn test_forward_spacing_repeats_last() {
        let dx = forward_spacing(array![0.0, 1.0, 3.0, 6.0].view());
        assert_eq!(dx, array![1.0, 2.0, 3.0, 3.0]);
        assert_eq!(forward_spacing(array![5.0].view()), array![0.0]);
    }
}
