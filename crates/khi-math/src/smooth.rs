// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Moving Average
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Moving-average smoothing.
//!
//! Same-length box filter normalized by the window size, aligned like
//! `numpy.convolve(x, ones(k), mode="same") / k`: output `i` averages
//! `x[i - k/2 ..= i + k - k/2 - 1]`. Terms that fall off either end count
//! as zero, so the first `k/2` and last `k - k/2 - 1` outputs are damped.

use ndarray::{s, Array1, ArrayView1};

pub fn moving_average(x: ArrayView1<f64>, window: usize) -> Array1<f64> {
    let n = x.len();
    if window == 0 || n == 0 {
        return x.to_owned();
    }
    let left = window / 2;
    let right = window - left - 1;

    let norm = window as f64;
    Array1::from_shape_fn(n, |i| {
        let lo = i.saturating_sub(left);
        let hi = (i + right + 1).min(n);
        x.slice(s![lo..hi]).sum() / norm
    })
}
