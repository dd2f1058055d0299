// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — NPZ Access
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Keyed array access for `.npz` archives.
//!
//! NumPy stores `name` as `name.npy` inside the zip; archives written by
//! other tools sometimes omit the suffix, so both spellings are tried.

use crate::error::{KhiError, KhiResult};
use ndarray::{Array, Dimension, OwnedRepr};
use ndarray_npy::{NpzReader, ReadableElement};
use std::io::{Read, Seek};

pub fn read_key<R, A, D>(npz: &mut NpzReader<R>, key: &str) -> KhiResult<Array<A, D>>
where
    R: Read + Seek,
    A: ReadableElement,
    D: Dimension,
{
    match npz.by_name::<OwnedRepr<A>, D>(&format!("{key}.npy")) {
        Ok(array) => Ok(array),
        // Report the lookup under the NumPy spelling when neither is present.
        Err(first) => npz
            .by_name::<OwnedRepr<A>, D>(key)
            .map_err(|_| KhiError::from(first)),
    }
}
