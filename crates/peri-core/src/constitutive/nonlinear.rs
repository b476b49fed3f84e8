use std::fmt;

use log::info;

use super::{bond_stiffness, kernels, validate_discretisation};
use crate::error::{require_positive, Error, Result};
use crate::materials::Material;

/// Exponential-to-linear softening law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NonLinear {
    c: f64,
    s0: f64,
    sc: f64,
    alpha: f64,
    k: f64,
}

impl NonLinear {
    pub const DEFAULT_ALPHA: f64 = 0.25;
    pub const DEFAULT_K: f64 = 25.0;

    /// Derive `c`, `s0` and `sc`.
    ///
    /// `alpha` positions the switch from exponential to linear decay and `k`
    /// is the exponential decay rate. Explicit `c`, `s0` or `sc` replace the
    /// derived values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        material: &Material,
        horizon: f64,
        thickness: f64,
        c: Option<f64>,
        s0: Option<f64>,
        sc: Option<f64>,
        alpha: f64,
        k: f64,
    ) -> Result<Self> {
        validate_discretisation(material, horizon, thickness)?;
        validate_shape(alpha, k)?;

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
            None => critical_stretch(material, horizon, thickness, c, s0, alpha, k),
        };

        if !(sc.is_finite() && s0 < sc) {
            return Err(Error::inconsistent(
                "nonlinear",
                format!("expected 0 < s0 < sc, got s0 = {s0:e}, sc = {sc:e}"),
            ));
        }

        let law = Self {
            c,
            s0,
            sc,
            alpha,
            k,
        };
        info!("constructed {law}");
        Ok(law)
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn s0(&self) -> f64 {
        self.s0
    }

    pub fn sc(&self) -> f64 {
        self.sc
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    #[inline]
    pub fn damage(&self, stretch: f64, d: f64) -> f64 {
        kernels::nonlinear(stretch, d, self.s0, self.sc, self.alpha, self.k)
    }
}

pub(crate) fn validate_shape(alpha: f64, k: f64) -> Result<()> {
    if !(alpha.is_finite() && alpha >= 0.0) {
        return Err(Error::InvalidConfiguration {
            parameter: "alpha",
            value: alpha,
            reason: "must be non-negative and finite",
        });
    }
    require_positive("k", k)?;
    Ok(())
}

/// Critical stretch that makes the dissipated energy equal `Gf` (2-D).
///
/// The grouping of terms is kept as derived: the two bracketed sums differ in
/// the sign of the trailing constant and must not be merged.
fn critical_stretch(
    material: &Material,
    horizon: f64,
    thickness: f64,
    c: f64,
    s0: f64,
    alpha: f64,
    k: f64,
) -> f64 {
    let exp_k = k.exp();
    let numerator_a = 4.0 * k * (1.0 - exp_k) * (1.0 + alpha);
    let numerator_b = (thickness
        * c
        * horizon.powi(4)
        * s0.powi(2)
        * ((2.0 * k) - (2.0 * exp_k) + (alpha * k) - (alpha * k * exp_k + 2.0)))
        / ((4.0 * k) + (exp_k - 1.0) * (1.0 + alpha));
    let numerator = numerator_a * (material.gf - numerator_b);
    let denominator_a = thickness * c * horizon.powi(4) * s0;
    let denominator_b = (2.0 * k) - (2.0 * exp_k) + (alpha * k) - (alpha * k * exp_k) + 2.0;
    let denominator = denominator_a * denominator_b;
    numerator / denominator
}

impl fmt::Display for NonLinear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nonlinear law (c = {:.5e}, s0 = {:.5e}, sc = {:.5e}, alpha = {:.2}, k = {:.2})",
            self.c, self.s0, self.sc, self.alpha, self.k
        )
    }
}
