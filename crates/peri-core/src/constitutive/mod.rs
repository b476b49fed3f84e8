//! Bond damage models.
//!
//! A law is picked once at setup time and then evaluated for every bond on
//! every step. Each variant owns the scalars it derives from the material
//! and the discretisation; they are fixed for the life of the law.
pub mod kernels;
mod linear;
mod nonlinear;
mod trilinear;

pub use linear::{critical_stretch as linear_critical_stretch, Linear};
pub use nonlinear::NonLinear;
pub use trilinear::Trilinear;

pub(crate) use nonlinear::validate_shape as validate_nonlinear_shape;
pub(crate) use trilinear::validate_beta as validate_trilinear_beta;

use std::f64::consts::PI;
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::LawConfig;
use crate::error::{require_len, require_positive, Error, Result};
use crate::materials::Material;

/// Bond stiffness for 2-D plane stress: `c = 9E / (π t δ³)`.
pub fn bond_stiffness(material: &Material, horizon: f64, thickness: f64) -> f64 {
    (9.0 * material.e) / (PI * thickness * horizon.powi(3))
}

/// Every derivation divides by these, so reject them up front.
pub(crate) fn validate_discretisation(material: &Material, horizon: f64, thickness: f64) -> Result<()> {
    material.validate()?;
    require_positive("horizon", horizon)?;
    require_positive("thickness", thickness)?;
    Ok(())
}

/// Selected damage law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstitutiveLaw {
    Linear(Linear),
    Trilinear(Trilinear),
    NonLinear(NonLinear),
    /// Declared but without a softening curve; evaluating it fails.
    Bilinear,
}

impl ConstitutiveLaw {
    /// Build the law described by `config` for the given material and
    /// discretisation.
    pub fn from_config(
        config: &LawConfig,
        material: &Material,
        horizon: f64,
        thickness: f64,
    ) -> Result<Self> {
        let law = match *config {
            LawConfig::Linear { c, sc, damage_on } => {
                Self::Linear(Linear::new(material, horizon, thickness, c, sc, damage_on)?)
            }
            LawConfig::Trilinear { c, s0, sc, beta } => {
                Self::Trilinear(Trilinear::new(material, horizon, thickness, c, s0, sc, beta)?)
            }
            LawConfig::NonLinear {
                c,
                s0,
                sc,
                alpha,
                k,
            } => Self::NonLinear(NonLinear::new(
                material, horizon, thickness, c, s0, sc, alpha, k,
            )?),
            LawConfig::Bilinear => Self::Bilinear,
        };
        Ok(law)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Trilinear(_) => "trilinear",
            Self::NonLinear(_) => "nonlinear",
            Self::Bilinear => "bilinear",
        }
    }

    /// Bond stiffness, if the law defines one.
    pub fn bond_stiffness(&self) -> Option<f64> {
        match self {
            Self::Linear(law) => Some(law.c()),
            Self::Trilinear(law) => Some(law.c()),
            Self::NonLinear(law) => Some(law.c()),
            Self::Bilinear => None,
        }
    }

    /// Critical stretch, if the law defines one.
    pub fn critical_stretch(&self) -> Option<f64> {
        match self {
            Self::Linear(law) => Some(law.sc()),
            Self::Trilinear(law) => Some(law.sc()),
            Self::NonLinear(law) => Some(law.sc()),
            Self::Bilinear => None,
        }
    }

    /// New damage for a single bond.
    #[inline]
    pub fn damage(&self, stretch: f64, d: f64) -> Result<f64> {
        match self {
            Self::Linear(law) => Ok(law.damage(stretch, d)),
            Self::Trilinear(law) => Ok(law.damage(stretch, d)),
            Self::NonLinear(law) => Ok(law.damage(stretch, d)),
            Self::Bilinear => Err(Error::NotImplemented("bilinear constitutive law")),
        }
    }

    /// New damage for every bond.
    ///
    /// `stretch` and `d` are aligned per bond. The output has the same length,
    /// lies in `[0, 1]` and is never below `d`. Inputs are not modified.
    pub fn calculate_bond_damage(&self, stretch: &[f64], d: &[f64]) -> Result<Vec<f64>> {
        require_len("bond damage", stretch.len(), d.len())?;
        match self {
            Self::Linear(law) => Ok(map_bonds(stretch, d, |s, d| law.damage(s, d))),
            Self::Trilinear(law) => Ok(map_bonds(stretch, d, |s, d| law.damage(s, d))),
            Self::NonLinear(law) => Ok(map_bonds(stretch, d, |s, d| law.damage(s, d))),
            Self::Bilinear => Err(Error::NotImplemented("bilinear constitutive law")),
        }
    }
}

/// Apply a per-bond kernel elementwise.
fn map_bonds<F>(stretch: &[f64], d: &[f64], kernel: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let out = stretch
        .par_iter()
        .zip(d.par_iter())
        .map(|(&s, &d)| kernel(s, d))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let out = stretch.iter().zip(d).map(|(&s, &d)| kernel(s, d)).collect();

    out
}

impl fmt::Display for ConstitutiveLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear(law) => fmt::Display::fmt(law, f),
            Self::Trilinear(law) => fmt::Display::fmt(law, f),
            Self::NonLinear(law) => fmt::Display::fmt(law, f),
            Self::Bilinear => f.write_str("bilinear law (not implemented)"),
        }
    }
}
