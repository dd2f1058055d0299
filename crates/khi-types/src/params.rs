// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Perturbation Parameters
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shear-flow parameters for the KHI scenario.
//!
//! The density jump across the shear layer follows Keskinen et al. (1988):
//! with background flow `v0` and contrast `densfact`, the neutral-frame flow
//! is `vn = -v0 (1 + densfact) / (1 - densfact)`.

use crate::error::{KhiError, KhiResult};
use serde::{Deserialize, Serialize};

/// Raw shear parameters as written in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearConfig {
    /// Background flow (m/s), default 1000.
    #[serde(default = "default_v0")]
    pub v0: f64,
    /// Density increase factor across the shear region, default 4.
    #[serde(default = "default_densfact")]
    pub densfact: f64,
    /// Shear transition scale length (m), default 10 km.
    #[serde(default = "default_ell")]
    pub ell: f64,
    /// Parallel magnetic field (T), default -50000 nT.
    #[serde(rename = "B1val", default = "default_b1val")]
    pub b1val: f64,
    /// Altitude where the E-region taper is centred (m), default 220 km.
    #[serde(default = "default_x1ref")]
    pub x1ref: f64,
    /// Width of the altitude taper (m), default 10 km.
    #[serde(default = "default_dx1")]
    pub dx1: f64,
}

fn default_v0() -> f64 {
    1000.0
}
fn default_densfact() -> f64 {
    4.0
}
fn default_ell() -> f64 {
    10e3
}
fn default_b1val() -> f64 {
    -50000e-9
}
fn default_x1ref() -> f64 {
    220e3
}
fn default_dx1() -> f64 {
    10e3
}

impl Default for ShearConfig {
    fn default() -> Self {
        ShearConfig {
            v0: default_v0(),
            densfact: default_densfact(),
            ell: default_ell(),
            b1val: default_b1val(),
            x1ref: default_x1ref(),
            dx1: default_dx1(),
        }
    }
}

/// Validated, immutable perturbation parameters with the derived flow `vn`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbParams {
    v0: f64,
    densfact: f64,
    ell: f64,
    b1val: f64,
    x1ref: f64,
    dx1: f64,
    vn: f64,
}

impl PerturbParams {
    pub fn new(cfg: ShearConfig) -> KhiResult<Self> {
        let values = [
            ("v0", cfg.v0),
            ("densfact", cfg.densfact),
            ("ell", cfg.ell),
            ("B1val", cfg.b1val),
            ("x1ref", cfg.x1ref),
            ("dx1", cfg.dx1),
        ];
        for (name, v) in values {
            if !v.is_finite() {
                return Err(KhiError::ConfigError(format!("{name} must be finite, got {v}")));
            }
        }
        if (1.0 - cfg.densfact).abs() < f64::EPSILON {
            return Err(KhiError::ConfigError(
                "densfact = 1 leaves the neutral flow vn undefined".into(),
            ));
        }
        if cfg.ell <= 0.0 {
            return Err(KhiError::ConfigError(format!(
                "shear length ell must be positive, got {}",
                cfg.ell
            )));
        }
        if cfg.dx1 <= 0.0 {
            return Err(KhiError::ConfigError(format!(
                "taper width dx1 must be positive, got {}",
                cfg.dx1
            )));
        }

        let vn = -cfg.v0 * (1.0 + cfg.densfact) / (1.0 - cfg.densfact);
        Ok(PerturbParams {
            v0: cfg.v0,
            densfact: cfg.densfact,
            ell: cfg.ell,
            b1val: cfg.b1val,
            x1ref: cfg.x1ref,
            dx1: cfg.dx1,
            vn,
        })
    }

    pub fn v0(&self) -> f64 {
        self.v0
    }
    pub fn densfact(&self) -> f64 {
        self.densfact
    }
    pub fn ell(&self) -> f64 {
        self.ell
    }
    pub fn b1val(&self) -> f64 {
        self.b1val
    }
    pub fn x1ref(&self) -> f64 {
        self.x1ref
    }
    pub fn dx1(&self) -> f64 {
        self.dx1
    }
    pub fn vn(&self) -> f64 {
        self.vn
    }
}

impl Default for PerturbParams {
    fn default() -> Self {
        let cfg = ShearConfig::default();
        PerturbParams {
            v0: cfg.v0,
            densfact: cfg.densfact,
            ell: cfg.ell,
            b1val: cfg.b1val,
            x1ref: cfg.x1ref,
            dx1: cfg.dx1,
            vn: -cfg.v0 * (1.0 + cfg.densfact) / (1.0 - cfg.densfact),
        }
    }
}
