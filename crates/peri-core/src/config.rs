use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constitutive::{validate_nonlinear_shape, validate_trilinear_beta, NonLinear, Trilinear};
use crate::error::{require_positive, Error, Result};
use crate::materials::Material;

/// Time stepping parameters owned by the outer driver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub n_time_steps: usize,
    pub dt: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_time_steps: 100_000,
            dt: 1.0e-8,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("dt", self.dt)?;
        Ok(())
    }
}

/// Which damage law to build, plus its optional overrides and shape
/// parameters. Missing overrides are derived from the material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum LawConfig {
    Linear {
        #[serde(default)]
        c: Option<f64>,
        #[serde(default)]
        sc: Option<f64>,
        #[serde(default = "default_damage_on")]
        damage_on: bool,
    },
    Trilinear {
        #[serde(default)]
        c: Option<f64>,
        #[serde(default)]
        s0: Option<f64>,
        #[serde(default)]
        sc: Option<f64>,
        #[serde(default = "default_beta")]
        beta: f64,
    },
    NonLinear {
        #[serde(default)]
        c: Option<f64>,
        #[serde(default)]
        s0: Option<f64>,
        #[serde(default)]
        sc: Option<f64>,
        #[serde(default = "default_alpha")]
        alpha: f64,
        #[serde(default = "default_k")]
        k: f64,
    },
    Bilinear,
}

impl Default for LawConfig {
    fn default() -> Self {
        Self::Linear {
            c: None,
            sc: None,
            damage_on: true,
        }
    }
}

impl LawConfig {
    /// Range checks on the overrides and shape parameters. Ordering of the
    /// derived stretches needs the material and is checked when the law is
    /// built.
    pub fn validate(&self) -> Result<()> {
        let overrides = match *self {
            Self::Linear { c, sc, .. } => [("c", c), ("s0", None), ("sc", sc)],
            Self::Trilinear { c, s0, sc, beta } => {
                validate_trilinear_beta(beta)?;
                [("c", c), ("s0", s0), ("sc", sc)]
            }
            Self::NonLinear { c, s0, sc, alpha, k } => {
                validate_nonlinear_shape(alpha, k)?;
                [("c", c), ("s0", s0), ("sc", sc)]
            }
            Self::Bilinear => return Ok(()),
        };
        for (parameter, value) in overrides {
            if let Some(value) = value {
                require_positive(parameter, value)?;
            }
        }
        Ok(())
    }
}

fn default_damage_on() -> bool {
    true
}

fn default_beta() -> f64 {
    Trilinear::DEFAULT_BETA
}

fn default_alpha() -> f64 {
    NonLinear::DEFAULT_ALPHA
}

fn default_k() -> f64 {
    NonLinear::DEFAULT_K
}

/// Rigid penetrator with a prescribed trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenetratorConfig {
    pub id: u32,
    /// Initial centre.
    pub centre: DVec3,
    pub radius: f64,
    /// Scale of the prescribed motion. By the final time step the centre has
    /// moved by `target_displacement * direction`.
    pub target_displacement: f64,
    /// Per-component weight of the motion; not normalised. The default adds
    /// `target_displacement` to both in-plane components of the centre.
    #[serde(default = "default_direction")]
    pub direction: DVec3,
}

fn default_direction() -> DVec3 {
    DVec3::new(1.0, 1.0, 0.0)
}

impl PenetratorConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("radius", self.radius)?;
        if !self.target_displacement.is_finite() {
            return Err(Error::InvalidConfiguration {
                parameter: "target_displacement",
                value: self.target_displacement,
                reason: "must be finite",
            });
        }
        if !self.centre.is_finite() {
            return Err(Error::InvalidConfiguration {
                parameter: "centre",
                value: f64::NAN,
                reason: "must be finite",
            });
        }
        if !self.direction.is_finite() {
            return Err(Error::InvalidConfiguration {
                parameter: "direction",
                value: f64::NAN,
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

impl Default for PenetratorConfig {
    fn default() -> Self {
        Self {
            id: 0,
            centre: DVec3::ZERO,
            radius: 1.0e-3,
            target_displacement: 1.0e-4,
            direction: default_direction(),
        }
    }
}

/// Everything a driver needs to set up the core for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    pub material: Material,
    pub horizon: f64,
    pub thickness: f64,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub law: LawConfig,
    #[serde(default)]
    pub penetrators: Vec<PenetratorConfig>,
}

impl SetupConfig {
    /// Parse and validate a TOML document.
    ///
    /// Every value is range-checked here, `nan` and `inf` included. Only the
    /// ordering of derived stretches is left to law construction.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.material.validate()?;
        require_positive("horizon", self.horizon)?;
        require_positive("thickness", self.thickness)?;
        self.simulation.validate()?;
        self.law.validate()?;
        for penetrator in &self.penetrators {
            penetrator.validate()?;
        }
        Ok(())
    }
}
