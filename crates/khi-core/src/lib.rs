// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Initial conditions and boundary drivers for a Kelvin-Helmholtz run.
//!
//! Stages: background profile, density perturbation, top potential seed,
//! electric field dataset, precipitation dataset.

pub mod efield;
pub mod geomag;
pub mod perturb;
pub mod potential;
pub mod precip;
pub mod profile;
pub mod scenario;
pub mod store;
pub mod timeline;
