//! Validity bounds and input clipping.

use crate::config::ConfigError;
use crate::error::{PropertyError, PropertyResult};
use tracing::debug;

/// Lowest temperature handed to the oracle [K].
pub const T_MIN: f64 = 273.0;

/// Highest temperature handed to the oracle [K].
pub const T_MAX: f64 = 1073.0;

/// Default lower pressure bound: the triple-point pressure [Pa].
pub const DEFAULT_P_MIN: f64 = 611.657;

/// Default upper pressure bound, also the highest accepted one [Pa].
pub const DEFAULT_P_MAX: f64 = sp_if97::P_MAX;

/// How out-of-bounds inputs are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClipMode {
    /// Clamp silently into the bounds.
    #[default]
    Clip,
    /// Report an `OutOfRange` error instead of clamping.
    Strict,
}

/// Pressure bounds of one engine instance; temperature bounds are global.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Bounds {
    /// Lower pressure bound [Pa]
    pub p_min: f64,
    /// Upper pressure bound [Pa]
    pub p_max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            p_min: DEFAULT_P_MIN,
            p_max: DEFAULT_P_MAX,
        }
    }
}

impl Bounds {
    pub fn new(p_min: f64, p_max: f64) -> Result<Self, ConfigError> {
        let bounds = Self { p_min, p_max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Requires `0 < p_min < p_max <= 100 MPa`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.p_min.is_finite()
            && self.p_max.is_finite()
            && self.p_min > 0.0
            && self.p_min < self.p_max
            && self.p_max <= DEFAULT_P_MAX;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                p_min: self.p_min,
                p_max: self.p_max,
            })
        }
    }

    /// Clamp (p, T) into the bounds. Pure, total and idempotent for finite input.
    pub fn clip(&self, p: f64, t: f64) -> (f64, f64) {
        (self.clip_pressure(p), Self::clip_temperature(t))
    }

    pub fn clip_pressure(&self, p: f64) -> f64 {
        p.clamp(self.p_min, self.p_max)
    }

    pub fn clip_temperature(t: f64) -> f64 {
        t.clamp(T_MIN, T_MAX)
    }

    pub fn contains_pressure(&self, p: f64) -> bool {
        (self.p_min..=self.p_max).contains(&p)
    }

    pub fn contains_temperature(t: f64) -> bool {
        (T_MIN..=T_MAX).contains(&t)
    }

    /// Apply the clip policy to a pressure.
    pub fn enforce_pressure(&self, mode: ClipMode, p: f64) -> PropertyResult<f64> {
        if !p.is_finite() {
            return Err(PropertyError::NonPhysical {
                what: "pressure must be finite",
            });
        }
        if self.contains_pressure(p) {
            return Ok(p);
        }
        match mode {
            ClipMode::Strict => Err(PropertyError::OutOfRange {
                what: "pressure",
                value: p,
            }),
            ClipMode::Clip => {
                let clipped = self.clip_pressure(p);
                debug!(p, clipped, "pressure clipped into bounds");
                Ok(clipped)
            }
        }
    }

    /// Apply the clip policy to a temperature.
    pub fn enforce_temperature(mode: ClipMode, t: f64) -> PropertyResult<f64> {
        if !t.is_finite() {
            return Err(PropertyError::NonPhysical {
                what: "temperature must be finite",
            });
        }
        if Self::contains_temperature(t) {
            return Ok(t);
        }
        match mode {
            ClipMode::Strict => Err(PropertyError::OutOfRange {
                what: "temperature",
                value: t,
            }),
            ClipMode::Clip => {
                let clipped = Self::clip_temperature(t);
                debug!(t, clipped, "temperature clipped into bounds");
                Ok(clipped)
            }
        }
    }

    /// Apply the clip policy to a (p, T) pair.
    pub fn enforce(&self, mode: ClipMode, p: f64, t: f64) -> PropertyResult<(f64, f64)> {
        Ok((
            self.enforce_pressure(mode, p)?,
            Self::enforce_temperature(mode, t)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_cover_if97_envelope() {
        let b = Bounds::default();
        assert_eq!(b.p_min, DEFAULT_P_MIN);
        assert_eq!(b.p_max, DEFAULT_P_MAX);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(Bounds::new(1.0e6, 1.0e5).is_err());
        assert!(Bounds::new(0.0, 1.0e5).is_err());
        assert!(Bounds::new(f64::NAN, 1.0e5).is_err());
    }

    #[test]
    fn upper_bound_limited_to_formulation_range() {
        assert!(Bounds::new(1.0e3, DEFAULT_P_MAX).is_ok());
        assert!(matches!(
            Bounds::new(1.0e3, 2.0e8),
            Err(ConfigError::InvalidBounds { p_max, .. }) if p_max == 2.0e8
        ));
        let mut b = Bounds::default();
        b.p_max = 100.5e6;
        assert!(b.validate().is_err());
    }

    #[test]
    fn clip_clamps_both_axes() {
        let b = Bounds::default();
        assert_eq!(b.clip(1.0, 200.0), (DEFAULT_P_MIN, T_MIN));
        assert_eq!(b.clip(1.0e9, 2000.0), (DEFAULT_P_MAX, T_MAX));
        assert_eq!(b.clip(1.0e5, 300.0), (1.0e5, 300.0));
    }

    #[test]
    fn strict_mode_reports_out_of_range() {
        let b = Bounds::default();
        let err = b.enforce(ClipMode::Strict, 1.0e9, 300.0).unwrap_err();
        assert!(matches!(err, PropertyError::OutOfRange { what: "pressure", .. }));
        let err = b.enforce(ClipMode::Strict, 1.0e5, 5000.0).unwrap_err();
        assert!(matches!(err, PropertyError::OutOfRange { what: "temperature", .. }));
        assert_eq!(b.enforce(ClipMode::Strict, 1.0e5, 300.0).unwrap(), (1.0e5, 300.0));
    }

    #[test]
    fn non_finite_rejected_in_both_modes() {
        let b = Bounds::default();
        assert!(b.enforce(ClipMode::Clip, f64::NAN, 300.0).is_err());
        assert!(b.enforce(ClipMode::Clip, 1.0e5, f64::INFINITY).is_err());
        assert!(b.enforce(ClipMode::Strict, f64::NAN, 300.0).is_err());
    }

    proptest! {
        #[test]
        fn clip_is_idempotent(p in -1.0e9f64..1.0e9, t in -100.0f64..3000.0) {
            let b = Bounds::default();
            let once = b.clip(p, t);
            let twice = b.clip(once.0, once.1);
            prop_assert_eq!(once, twice);
            prop_assert!(b.contains_pressure(once.0));
            prop_assert!(Bounds::contains_temperature(once.1));
        }
    }
}
