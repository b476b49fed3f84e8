/// Cubic Hermite ease - GLSL smoothstep.
///
/// Returns `3t² - 2t³` with `t = (x - edge0) / (edge1 - edge0)` clamped to
/// `[0, 1]`. Equal edges behave as a step: 0 below the edge, 1 at or above it.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let span = edge1 - edge0;
    if span == 0.0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Ease `y` from `y_start` to `y_end` while `i` runs from `x_start` to `x_end`.
///
/// Returns exactly `y_start` at `x_start` and exactly `y_end` at `x_end`, and
/// holds those values outside the range. A degenerate range
/// (`x_end <= x_start`) jumps straight to `y_end` once `i` reaches it.
pub fn smooth_step_data(i: usize, x_start: usize, x_end: usize, y_start: f64, y_end: f64) -> f64 {
    if x_end <= x_start {
        return if i < x_end { y_start } else { y_end };
    }
    if i <= x_start {
        return y_start;
    }
    if i >= x_end {
        return y_end;
    }
    lerp(y_start, y_end, smoothstep(x_start as f64, x_end as f64, i as f64))
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
