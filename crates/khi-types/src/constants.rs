// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Guard cells on each side of the x1/x2/x3 coordinate arrays.
pub const GHOST_CELLS: usize = 2;

/// Mean Earth radius (m), used by the synthetic Cartesian grid builder.
pub const R_EARTH: f64 = 6.371e6;

/// Scale applied to equilibrium ion profiles: 2 * 2.75 * 3.
pub const BACKGROUND_SCALE: f64 = 2.0 * 2.75 * 3.0;

/// Density floor applied after the noise is added (m^-3).
pub const DENSITY_FLOOR: f64 = 1e4;

/// Offset added to tapered ion densities (m^-3).
pub const TAPER_OFFSET: f64 = 1e6;

/// Altitude below which every species is pinned to `LOW_ALT_DENSITY` (m).
pub const LOW_ALT_CUTOFF: f64 = 150e3;

/// Density used below `LOW_ALT_CUTOFF` (m^-3).
pub const LOW_ALT_DENSITY: f64 = 1e3;

/// Relative amplitude of the seed noise.
pub const NOISE_AMPLITUDE: f64 = 0.01;

/// Moving-average window for the seed noise.
pub const NOISE_WINDOW: usize = 10;

/// Offset of the shear edges in the two-sided structure and the precipitation step (m).
pub const SHEAR_EDGE_OFFSET: f64 = 50e3;

/// Default output resolution in mlon and mlat.
pub const GEOMAG_POINTS: usize = 512;

/// Relative padding added on each side of the output mlon/mlat span.
pub const GEOMAG_BUFFER: f64 = 0.01;

/// Upper bound on the characteristic precipitation energy (eV): 100 MeV.
pub const E0_RELATIVISTIC_LIMIT: f64 = 100e6;
