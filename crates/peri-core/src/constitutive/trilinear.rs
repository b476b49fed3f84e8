use std::fmt;

use log::info;

use super::{bond_stiffness, kernels, validate_discretisation};
use crate::error::{require_positive, Error, Result};
use crate::materials::Material;

/// Trilinear softening law.
///
/// The stress-stretch curve is elastic up to `s0`, softens to `β` of the peak
/// force at `s1`, then reaches zero at `sc`. `γ` fixes the ratio of the two
/// softening slopes so that the dissipated energy matches `Gf`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trilinear {
    c: f64,
    s0: f64,
    s1: f64,
    sc: f64,
    beta: f64,
    gamma: f64,
}

impl Trilinear {
    pub const DEFAULT_BETA: f64 = 0.25;

    /// Derive `γ`, `c`, `s0`, `sc` and `s1`, in that order.
    ///
    /// `beta` must lie strictly inside `(0, 1)`. Explicit `c`, `s0` or `sc`
    /// replace the derived values; `s1` is always derived.
    pub fn new(
        material: &Material,
        horizon: f64,
        thickness: f64,
        c: Option<f64>,
        s0: Option<f64>,
        sc: Option<f64>,
        beta: f64,
    ) -> Result<Self> {
        validate_discretisation(material, horizon, thickness)?;
        validate_beta(beta)?;

        let gamma = (3.0 + 2.0 * beta) / (2.0 * beta * (1.0 - beta));
        let c = match c {
            Some(c) => require_positive("c", c)?,
            None => bond_stiffness(material, horizon, thickness),
        };
        let s0 = match s0 {
            Some(s0) => require_positive("s0", s0)?,
            None => material.elastic_limit(),
        };
        let sc = match sc {
            Some(sc) => require_positive("sc", sc)?,
            None => {
                let numerator = 4.0 * gamma * material.gf;
                let denominator = thickness * horizon.powi(4) * c * s0 * (1.0 + gamma * beta);
                (numerator / denominator) + s0
            }
        };
        let s1 = s0 + ((sc - s0) / gamma);

        if !(sc.is_finite() && s0 < s1 && s1 < sc) {
            return Err(Error::inconsistent(
                "trilinear",
                format!("expected 0 < s0 < s1 < sc, got s0 = {s0:e}, s1 = {s1:e}, sc = {sc:e}"),
            ));
        }

        let law = Self {
            c,
            s0,
            s1,
            sc,
            beta,
            gamma,
        };
        info!("constructed {law}");
        Ok(law)
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// Linear elastic limit.
    pub fn s0(&self) -> f64 {
        self.s0
    }

    /// Stretch at the kink between the two softening branches.
    pub fn s1(&self) -> f64 {
        self.s1
    }

    pub fn sc(&self) -> f64 {
        self.sc
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    #[inline]
    pub fn damage(&self, stretch: f64, d: f64) -> f64 {
        kernels::trilinear(stretch, d, self.s0, self.s1, self.sc, self.beta)
    }
}

pub(crate) fn validate_beta(beta: f64) -> Result<()> {
    if beta > 0.0 && beta < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            parameter: "beta",
            value: beta,
            reason: "must lie strictly between 0 and 1",
        })
    }
}

impl fmt::Display for Trilinear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trilinear law (c = {:.5e}, s0 = {:.5e}, s1 = {:.5e}, sc = {:.5e}, beta = {:.2})",
            self.c, self.s0, self.s1, self.sc, self.beta
        )
    }
}
