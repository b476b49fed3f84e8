use serde::{Deserialize, Serialize};

use crate::error::{require_positive, Result};

/// Bulk material properties consumed by the constitutive laws and the
/// contact kernel. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Elastic (Young's) modulus `E` [Pa].
    #[serde(rename = "E")]
    pub e: f64,
    /// Fracture energy `Gf` [J/m²].
    #[serde(rename = "Gf")]
    pub gf: f64,
    /// Tensile strength `ft` [Pa].
    pub ft: f64,
    /// Mass density [kg/m³].
    pub density: f64,
}

impl Material {
    /// Plain concrete, C40-ish.
    pub const CONCRETE: Self = Self {
        e: 37.0e9,
        gf: 143.2,
        ft: 3.9e6,
        density: 2346.0,
    };

    /// Structural steel.
    pub const STEEL: Self = Self {
        e: 2.0e11,
        gf: 40.0,
        ft: 1.0e7,
        density: 7850.0,
    };

    /// Build a material, rejecting non-positive properties.
    pub fn new(e: f64, gf: f64, ft: f64, density: f64) -> Result<Self> {
        let material = Self { e, gf, ft, density };
        material.validate()?;
        Ok(material)
    }

    /// Check every property is strictly positive and finite.
    pub fn validate(&self) -> Result<()> {
        require_positive("E", self.e)?;
        require_positive("Gf", self.gf)?;
        require_positive("ft", self.ft)?;
        require_positive("density", self.density)?;
        Ok(())
    }

    /// Linear elastic limit stretch `ft / E`.
    #[inline]
    pub fn elastic_limit(&self) -> f64 {
        self.ft / self.e
    }
}
