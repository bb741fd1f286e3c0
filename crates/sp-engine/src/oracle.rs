//! Region oracle trait and validation helpers.
//!
//! The oracle is the correlation backend: it classifies (p, T) points, builds
//! state snapshots and answers per-state properties. The engine never calls a
//! correlation directly, so any backend (or a test double) can be plugged in.
//!
//! All quantities crossing this trait are raw SI `f64` values: Pa, K, kg/m³,
//! J/kg, J/(kg·K), Pa·s and W/(m·K).

use crate::error::{PropertyError, PropertyResult};
use crate::state::{Region, ThermoState};

/// Raw partial derivatives of density at one single-phase state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPartials {
    /// (∂ρ/∂p)_T [kg/(m³·Pa)]
    pub drho_dp_t: f64,
    /// (∂ρ/∂T)_p [kg/(m³·K)]
    pub drho_dt_p: f64,
}

/// Correlation backend consumed by the property engine.
///
/// Implementations must be thread-safe (Send + Sync) to support parallel
/// evaluation.
pub trait RegionOracle: Send + Sync {
    /// Backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Specific gas constant [J/(kg·K)].
    fn specific_gas_constant(&self) -> f64;

    /// Critical pressure [Pa]; the dome exists strictly below it.
    fn critical_pressure(&self) -> f64;

    /// Critical density [kg/m³]; splits liquid-like from vapor-like region-3 states.
    fn critical_density(&self) -> f64;

    /// Single-phase region of a (p, T) point.
    fn region(&self, p: f64, t: f64) -> PropertyResult<Region>;

    /// Build the snapshot of a single-phase state in `region`.
    fn state(&self, region: Region, p: f64, t: f64) -> PropertyResult<ThermoState>;

    /// Build a two-phase snapshot at T = Tsat(p) with quality `x`.
    fn saturated_state(&self, p: f64, t: f64, x: f64) -> PropertyResult<ThermoState> {
        if !(0.0..=1.0).contains(&x) {
            return Err(PropertyError::NonPhysical {
                what: "quality must lie in [0, 1]",
            });
        }
        Ok(ThermoState::TwoPhase { p, t, x })
    }

    /// Density [kg/m³].
    fn density(&self, state: &ThermoState) -> PropertyResult<f64>;

    /// Specific enthalpy [J/kg].
    fn enthalpy(&self, state: &ThermoState) -> PropertyResult<f64>;

    /// Specific entropy [J/(kg·K)].
    fn entropy(&self, state: &ThermoState) -> PropertyResult<f64>;

    /// Isobaric heat capacity [J/(kg·K)].
    fn cp(&self, state: &ThermoState) -> PropertyResult<f64>;

    /// Isochoric heat capacity [J/(kg·K)].
    fn cv(&self, state: &ThermoState) -> PropertyResult<f64>;

    /// Vapor mass fraction.
    ///
    /// Single-phase states report the degenerate values 0 (liquid-like) or 1
    /// (vapor-like); region-3 states split on the critical density.
    fn quality(&self, state: &ThermoState) -> PropertyResult<f64> {
        Ok(match *state {
            ThermoState::Liquid { .. } => 0.0,
            ThermoState::Vapor { .. } => 1.0,
            ThermoState::Supercritical { rho, .. } => {
                if rho >= self.critical_density() {
                    0.0
                } else {
                    1.0
                }
            }
            ThermoState::TwoPhase { x, .. } => x,
        })
    }

    /// (∂ρ/∂p)_T and (∂ρ/∂T)_p when the backend can provide them.
    ///
    /// Default: not offered; the engine falls back to finite differences.
    fn raw_partials(&self, _state: &ThermoState) -> PropertyResult<Option<RawPartials>> {
        Ok(None)
    }

    /// Saturation pressure [Pa] at `t`.
    fn saturation_pressure(&self, t: f64) -> PropertyResult<f64>;

    /// Saturation temperature [K] at `p`.
    fn saturation_temperature(&self, p: f64) -> PropertyResult<f64>;

    /// Saturated liquid enthalpy [J/kg] at `t`.
    fn saturated_liquid_enthalpy(&self, t: f64) -> PropertyResult<f64>;

    /// Saturated vapor enthalpy [J/kg] at `t`.
    fn saturated_vapor_enthalpy(&self, t: f64) -> PropertyResult<f64>;

    /// Saturated liquid density [kg/m³] at `t`.
    fn saturated_liquid_density(&self, t: f64) -> PropertyResult<f64>;

    /// Saturated vapor density [kg/m³] at `t`.
    fn saturated_vapor_density(&self, t: f64) -> PropertyResult<f64>;

    /// Dynamic viscosity [Pa·s] from (ρ, T).
    fn viscosity(&self, rho: f64, t: f64) -> PropertyResult<f64>;

    /// Thermal conductivity [W/(m·K)] from (ρ, T).
    fn thermal_conductivity(&self, rho: f64, t: f64) -> PropertyResult<f64>;
}

/// Validation helpers for oracle inputs and outputs.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: f64) -> PropertyResult<()> {
        if !p.is_finite() || p <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: f64) -> PropertyResult<()> {
        if !t.is_finite() || t <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy is finite.
    pub fn validate_enthalpy(h: f64) -> PropertyResult<()> {
        if !h.is_finite() {
            return Err(PropertyError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: f64) -> PropertyResult<()> {
        if !rho.is_finite() || rho <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure heat capacity is positive and finite.
    pub fn validate_cp(cp: f64) -> PropertyResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "heat capacity must be positive and finite",
            });
        }
        Ok(())
    }
}
