use crate::CoreError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Absolute plus relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Acceptance band around a target value: `abs + rel * |target|`.
    pub fn band(&self, target: Real) -> Real {
        self.abs + self.rel * target.abs()
    }

    /// True when `residual` lies inside the band around `target`.
    pub fn accepts(&self, residual: Real, target: Real) -> bool {
        residual.abs() <= self.band(target)
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite-difference step scaled to the magnitude of `x`, never below `floor`.
pub fn scaled_step(x: Real, relative: Real, floor: Real) -> Real {
    (relative * x.abs()).max(floor)
}

/// Linear interpolation of `x` at `y` between `(x0, y0)` and `(x1, y1)`.
///
/// Falls back to the midpoint when the secant is degenerate.
pub fn secant_point(x0: Real, y0: Real, x1: Real, y1: Real, y: Real) -> Real {
    let dy = y1 - y0;
    if dy == 0.0 || !dy.is_finite() {
        return 0.5 * (x0 + x1);
    }
    x0 + (y - y0) * (x1 - x0) / dy
}
