use std::f64::consts::PI;
use std::fmt;

use log::info;

use super::{bond_stiffness, kernels, validate_discretisation};
use crate::error::{require_positive, Result};
use crate::materials::Material;

/// Brittle linear elastic bonds with a single critical stretch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Linear {
    c: f64,
    sc: f64,
    damage_on: bool,
}

impl Linear {
    /// Derive the bond stiffness and critical stretch.
    ///
    /// `thickness` is the out-of-plane depth of the 2-D body (usually the
    /// particle spacing). Explicit `c` or `sc` replace the derived values.
    /// With `damage_on = false` bonds never break.
    pub fn new(
        material: &Material,
        horizon: f64,
        thickness: f64,
        c: Option<f64>,
        sc: Option<f64>,
        damage_on: bool,
    ) -> Result<Self> {
        validate_discretisation(material, horizon, thickness)?;
        let c = match c {
            Some(c) => require_positive("c", c)?,
            None => bond_stiffness(material, horizon, thickness),
        };
        let sc = match sc {
            Some(sc) => require_positive("sc", sc)?,
            None => critical_stretch(material, horizon),
        };
        let law = Self { c, sc, damage_on };
        info!("constructed {law}");
        Ok(law)
    }

    /// Bond stiffness (micromodulus).
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Critical stretch.
    pub fn sc(&self) -> f64 {
        self.sc
    }

    pub fn damage_on(&self) -> bool {
        self.damage_on
    }

    /// New damage for one bond.
    #[inline]
    pub fn damage(&self, stretch: f64, d: f64) -> f64 {
        if self.damage_on {
            kernels::linear(stretch, d, self.sc)
        } else {
            0.0
        }
    }
}

/// Critical stretch of a 2-D linear elastic bond: `sqrt(4πGf / (9Eδ))`.
pub fn critical_stretch(material: &Material, horizon: f64) -> f64 {
    ((4.0 * PI * material.gf) / (9.0 * material.e * horizon)).sqrt()
}

impl fmt::Display for Linear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "linear law (c = {:.5e}, sc = {:.5e}, damage {})",
            self.c,
            self.sc,
            if self.damage_on { "on" } else { "off" }
        )
    }
}
