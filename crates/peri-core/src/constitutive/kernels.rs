//! Softening curves, one scalar function per law.
//!
//! Every kernel takes the bond stretch and the damage carried over from the
//! previous step and returns the new damage. The result is clamped to
//! `[0, 1]` and never drops below the previous value: a bond does not heal.
//! A NaN stretch (zero-length bond) leaves the damage untouched.

/// Keep damage monotone and bounded.
#[inline]
fn ratchet(d_prev: f64, d_trial: f64) -> f64 {
    d_trial.max(d_prev).clamp(0.0, 1.0)
}

/// Brittle law: the bond fails outright once `|stretch|` reaches `sc`.
#[inline]
pub fn linear(stretch: f64, d: f64, sc: f64) -> f64 {
    let d_trial = if stretch.abs() >= sc { 1.0 } else { 0.0 };
    ratchet(d, d_trial)
}

/// Trilinear softening.
///
/// The bond force rises linearly to `c·s0`, drops linearly to `β·c·s0` at
/// `s1`, then to zero at `sc`. Damage is whatever fraction of the elastic
/// force `c·s` has been lost: `d = 1 - f(s) / (c·s)`.
#[inline]
pub fn trilinear(stretch: f64, d: f64, s0: f64, s1: f64, sc: f64, beta: f64) -> f64 {
    let d_trial = if stretch.is_nan() || stretch <= s0 {
        0.0
    } else if stretch <= s1 {
        let eta = s1 / s0;
        1.0 - ((eta - beta) / (eta - 1.0)) * (s0 / stretch) + ((1.0 - beta) / (eta - 1.0))
    } else if stretch < sc {
        1.0 - (s0 * beta / stretch) * ((sc - stretch) / (sc - s1))
    } else {
        1.0
    };
    ratchet(d, d_trial)
}

/// Exponential softening with a linear tail.
///
/// `alpha` weights the linear part against the exponential part and `k` sets
/// how quickly the exponential part decays between `s0` and `sc`.
#[inline]
pub fn nonlinear(stretch: f64, d: f64, s0: f64, sc: f64, alpha: f64, k: f64) -> f64 {
    let d_trial = if stretch.is_nan() || stretch <= s0 {
        0.0
    } else if stretch < sc {
        let x = (stretch - s0) / (sc - s0);
        let decay = (1.0 - (-k * x).exp()) / (1.0 - (-k).exp());
        let residual = alpha * (1.0 - x);
        1.0 - (s0 / stretch) * ((1.0 - decay) + residual) / (1.0 + alpha)
    } else {
        1.0
    };
    ratchet(d, d_trial)
}
