use kurbo::Vec2;

const SOLVE_EPSILON: f64 = 1e-7;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Position of `value` between `a` and `b`; degenerate spans map to `1.0`.
pub(crate) fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    let span = b - a;
    if span.abs() <= f64::EPSILON {
        return 1.0;
    }
    (value - a) / span
}

/// One-dimensional cubic Bernstein polynomial.
pub(crate) fn bezier3(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let inv = 1.0 - t;
    inv * inv * inv * p0 + 3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t * p3
}

fn bezier3_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    // p0 = 0 and p3 = 1 for timing curves.
    let inv = 1.0 - t;
    3.0 * inv * inv * p1 + 6.0 * inv * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Evaluate a CSS-style `cubic-bezier(p1, p2)` timing function at progress `x`, for `CubicEase`.
///
/// The curve runs from `(0,0)` to `(1,1)`. The curve parameter whose x coordinate
/// equals `x` is solved first (Newton, then bisection), and the y coordinate at that
/// parameter is returned. `x` is clamped to `[0, 1]`.
pub(crate) fn cubic_bezier_ease(p1: Vec2, p2: Vec2, x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x == 0.0 || x == 1.0 {
        return x;
    }
    let s = solve_curve_x(p1.x, p2.x, x);
    bezier3(0.0, p1.y, p2.y, 1.0, s)
}

fn solve_curve_x(x1: f64, x2: f64, x: f64) -> f64 {
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier3(0.0, x1, x2, 1.0, s) - x;
        if err.abs() < SOLVE_EPSILON {
            return s;
        }
        let d = bezier3_derivative(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let v = bezier3(0.0, x1, x2, 1.0, s);
        if (v - x).abs() < SOLVE_EPSILON {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    s
}

/// Unit vector along `v`, or zero when `v` has no length.
pub(crate) fn unit_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len <= f64::EPSILON {
        Vec2::ZERO
    } else {
        v / len
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
