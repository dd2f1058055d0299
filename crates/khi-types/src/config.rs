// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{KhiError, KhiResult};
use crate::params::ShearConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scenario configuration.
/// Key names follow the ionosphere model's `config.nml` spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Initial-condition file that is read and then overwritten.
    pub indat_file: PathBuf,
    /// Simulation start times; the first entry is the start.
    pub time: Vec<DateTime<Utc>>,
    /// Simulation duration [s].
    pub tdur: f64,
    /// Electric field update cadence [s].
    #[serde(rename = "dtE0")]
    pub dt_e0: f64,
    /// Precipitation update cadence [s].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtprec: Option<f64>,
    /// Output directory for the electric field dataset.
    #[serde(rename = "E0dir")]
    pub e0_dir: PathBuf,
    /// Output directory for the precipitation dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precdir: Option<PathBuf>,
    /// Uniform background field override, x2 component [V/m].
    #[serde(rename = "Exit", default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<f64>,
    /// Uniform background field override, x3 component [V/m].
    #[serde(rename = "Eyit", default, skip_serializing_if = "Option::is_none")]
    pub eyit: Option<f64>,
    /// Precipitation stage; absent means the stage is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip: Option<PrecipConfig>,
    /// Shear-flow parameters and variant selection.
    #[serde(default)]
    pub khi: KhiConfig,
    /// Seed for the density noise; absent means OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// KHI-specific settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KhiConfig {
    #[serde(flatten)]
    pub shear: ShearConfig,
    #[serde(default)]
    pub density_structure: DensityStructure,
    #[serde(default)]
    pub boundary: BoundaryStrategy,
    #[serde(default)]
    pub top_potential: TopPotential,
}

/// Shape of the density jump across the shear layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityStructure {
    /// Single tanh step centred on x2 = 0.
    #[default]
    OneSided,
    /// Enhanced slab between x2 = -50 km and x2 = +50 km.
    TwoSided,
}

/// How the shear drift reaches the field dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrategy {
    /// Store the drift field directly as the background field `Exit`.
    #[default]
    BackgroundField,
    /// Integrate the field along mlon and drive the x2 boundary potentials.
    PotentialIntegration,
}

/// Initial top-boundary potential written with the perturbed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopPotential {
    /// Unit-variance random noise with quiet x2 edges.
    #[default]
    Noise,
    Zero,
    /// Integrated two-sided background drift.
    ShearBackground,
}

/// Particle precipitation inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecipConfig {
    /// Seconds after start when precipitation switches on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip_startsec: Option<f64>,
    /// Seconds after start when precipitation switches off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip_endsec: Option<f64>,
    /// Peak energy flux [mW m^-2].
    #[serde(rename = "Qprecip")]
    pub q_precip: f64,
    /// Background energy flux [mW m^-2].
    #[serde(rename = "Qprecip_background")]
    pub q_precip_background: f64,
    /// Characteristic energy [eV].
    #[serde(rename = "E0precip")]
    pub e0_precip: f64,
    #[serde(default)]
    pub shape: PrecipShape,
}

/// Horizontal pattern of the precipitating energy flux.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PrecipShape {
    /// Smoothed step in x2 at +50 km.
    #[default]
    ShearStep,
    /// Gaussian about the grid centre; widths in degrees.
    Gaussian {
        #[serde(default)]
        mlon_sigma: Option<f64>,
        #[serde(default)]
        mlat_sigma: Option<f64>,
    },
}

impl SimConfig {
    /// Load from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> KhiResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KhiResult<()> {
        if self.time.is_empty() {
            return Err(KhiError::ConfigError("time must list a start time".into()));
        }
        if !self.tdur.is_finite() || self.tdur < 0.0 {
            return Err(KhiError::ConfigError(format!(
                "tdur must be a non-negative duration, got {}",
                self.tdur
            )));
        }
        if !self.dt_e0.is_finite() || self.dt_e0 <= 0.0 {
            return Err(KhiError::ConfigError(format!(
                "dtE0 must be positive, got {}",
                self.dt_e0
            )));
        }
        if self.precip.is_some() {
            match self.dtprec {
                Some(dt) if dt.is_finite() && dt > 0.0 => {}
                other => {
                    return Err(KhiError::ConfigError(format!(
                        "precipitation requires a positive dtprec, got {other:?}"
                    )))
                }
            }
            if self.precdir.is_none() {
                return Err(KhiError::ConfigError(
                    "precipitation requires precdir".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn start_time(&self) -> KhiResult<DateTime<Utc>> {
        self.time
            .first()
            .copied()
            .ok_or_else(|| KhiError::ConfigError("time must list a start time".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CARGO_MANIFEST_DIR points to crates/khi-types/, two levels below the root.
    fn config_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("configs")
            .join(name)
    }

    #[test]
    fn test_load_default_config() {
        let cfg = SimConfig::from_file(config_path("khi_default.json")).unwrap();
        assert_eq!(cfg.tdur, 300.0);
        assert_eq!(cfg.dt_e0, 60.0);
        assert!(cfg.precip.is_none());
        assert_eq!(cfg.khi.shear.v0, 1000.0);
        assert_eq!(cfg.khi.density_structure, DensityStructure::OneSided);
        assert_eq!(cfg.khi.boundary, BoundaryStrategy::BackgroundField);
        assert_eq!(cfg.khi.top_potential, TopPotential::Noise);
    }

    #[test]
    fn test_load_precip_config() {
        let cfg = SimConfig::from_file(config_path("khi_precip.json")).unwrap();
        let precip = cfg.precip.as_ref().unwrap();
        assert_eq!(precip.precip_startsec, Some(60.0));
        assert_eq!(precip.e0_precip, 5000.0);
        assert_eq!(precip.shape, PrecipShape::ShearStep);
        assert_eq!(cfg.dtprec, Some(30.0));
        assert_eq!(cfg.khi.density_structure, DensityStructure::TwoSided);
    }

    fn minimal() -> SimConfig {
        serde_json::from_str(
            r#"{
                "indat_file": "inputs/initial.npz",
                "time": ["2013-02-20T05:00:00Z"],
                "tdur": 120,
                "dtE0": 10,
                "E0dir": "inputs/Efield"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = minimal();
        assert!(cfg.validate().is_ok());
        assert!(cfg.exit.is_none());
        assert!(cfg.seed.is_none());
        assert_eq!(cfg.khi.shear.densfact, 4.0);
        assert_eq!(
            cfg.start_time().unwrap().to_rfc3339(),
            "2013-02-20T05:00:00+00:00"
        );
    }

    #[test]
    fn test_precip_without_cadence_rejected() {
        let mut cfg = minimal();
        cfg.precip = Some(PrecipConfig {
            precip_startsec: None,
            precip_endsec: None,
            q_precip: 10.0,
            q_precip_background: 0.01,
            e0_precip: 2000.0,
            shape: PrecipShape::default(),
        });
        assert!(cfg.validate().is_err());
        cfg.dtprec = Some(5.0);
        cfg.precdir = Some(PathBuf::from("inputs/prec"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_time_rejected() {
        let mut cfg = minimal();
        cfg.time.clear();
        assert!(cfg.validate().is_err());
        assert!(cfg.start_time().is_err());
    }

    #[test]
    fn test_gaussian_shape_parses() {
        let shape: PrecipShape =
            serde_json::from_str(r#"{"kind": "gaussian", "mlat_sigma": 0.2}"#).unwrap();
        assert_eq!(
            shape,
            PrecipShape::Gaussian {
                mlon_sigma: None,
                mlat_sigma: Some(0.2)
            }
        );
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = SimConfig::from_file(config_path("khi_precip.json")).unwrap();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.time, cfg2.time);
        assert_eq!(cfg.khi.shear, cfg2.khi.shear);
        assert_eq!(cfg2.precip.unwrap().q_precip, 10.0);
    }
}
