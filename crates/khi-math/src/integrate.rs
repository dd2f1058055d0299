// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Cumulative Integration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Running integrals of gridded fields.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Cumulative sum of `field * spacing` down axis 0.
///
/// `spacing` must have one entry per row. Row `i` of the result is
/// `sum_{r <= i} field[r, :] * spacing[r]`.
pub fn cumulative_along_rows(field: ArrayView2<f64>, spacing: ArrayView1<f64>) -> Array2<f64> {
    assert_eq!(
        field.nrows(),
        spacing.len(),
        "spacing must match the number of rows"
    );
    let mut out = Array2::zeros(field.raw_dim());
    let mut running = ndarray::Array1::zeros(field.ncols());
    for (i, row) in field.axis_iter(Axis(0)).enumerate() {
        running.scaled_add(spacing[i], &row);
        out.row_mut(i).assign(&running);
    }
    out
}
