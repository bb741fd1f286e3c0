//! Engine configuration.
//!
//! All knobs have defaults; `validate()` is called by the engine constructor,
//! so an engine never runs with an inconsistent configuration.

use crate::bounds::{Bounds, ClipMode};
use sp_core::Tolerances;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("pressure bounds invalid: p_min={p_min} Pa, p_max={p_max} Pa")]
    InvalidBounds { p_min: f64, p_max: f64 },

    #[error("max_iters must be at least 1")]
    ZeroIterations,

    #[error("{what} must be finite and non-negative (got {value})")]
    InvalidTolerance { what: &'static str, value: f64 },

    #[error("enthalpy tolerances must not both be zero")]
    ZeroTolerance,

    #[error("{what} must be positive and finite (got {value})")]
    InvalidStep { what: &'static str, value: f64 },
}

/// Settings of the h → T inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InversionConfig {
    /// Iteration cap.
    pub max_iters: usize,
    /// Absolute enthalpy tolerance [J/kg].
    pub h_abs_tol: f64,
    /// Relative enthalpy tolerance.
    pub h_rel_tol: f64,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            max_iters: 50,
            h_abs_tol: 1e-3,
            h_rel_tol: 1e-6,
        }
    }
}

impl InversionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iters == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        non_negative("h_abs_tol", self.h_abs_tol)?;
        non_negative("h_rel_tol", self.h_rel_tol)?;
        if self.h_abs_tol == 0.0 && self.h_rel_tol == 0.0 {
            return Err(ConfigError::ZeroTolerance);
        }
        Ok(())
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            abs: self.h_abs_tol,
            rel: self.h_rel_tol,
        }
    }
}

/// Finite-difference step settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DerivativeConfig {
    /// Step as a fraction of the perturbed variable.
    pub relative_step: f64,
    /// Smallest pressure step [Pa].
    pub min_pressure_step: f64,
    /// Smallest temperature step [K].
    pub min_temperature_step: f64,
    /// Smallest enthalpy step [J/kg].
    pub min_enthalpy_step: f64,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            relative_step: 1e-5,
            min_pressure_step: 1.0,
            min_temperature_step: 1e-6,
            min_enthalpy_step: 1e-2,
        }
    }
}

impl DerivativeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("relative_step", self.relative_step)?;
        positive("min_pressure_step", self.min_pressure_step)?;
        positive("min_temperature_step", self.min_temperature_step)?;
        positive("min_enthalpy_step", self.min_enthalpy_step)?;
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub bounds: Bounds,
    pub clip_mode: ClipMode,
    pub inversion: InversionConfig,
    pub derivatives: DerivativeConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        self.inversion.validate()?;
        self.derivatives.validate()
    }

    pub fn strict(mut self) -> Self {
        self.clip_mode = ClipMode::Strict;
        self
    }
}

fn non_negative(what: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { what, value })
    }
}

fn positive(what: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStep { what, value })
    }
}
