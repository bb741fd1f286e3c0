//! Density derivatives for the pressure-correction equation.
//!
//! ψ = (∂ρ/∂p)_h and (∂ρ/∂h)_p. Single-phase states use the chain rule on
//! (∂ρ/∂p)_T and (∂ρ/∂T)_p, taken from the oracle when offered and differenced
//! in (p, T) otherwise:
//!
//! ```text
//! (∂h/∂p)_T = 1/ρ + (T/ρ²)(∂ρ/∂T)_p
//! (∂ρ/∂h)_p = (∂ρ/∂T)_p / cp
//! ψ         = (∂ρ/∂p)_T − (∂ρ/∂T)_p (∂h/∂p)_T / cp
//! ```
//!
//! Two-phase states have T pinned to Tsat(p), so ρ(p, h) is differenced
//! directly with the quality recomputed from h.

use crate::bounds::Bounds;
use crate::config::EngineConfig;
use crate::direct::{DirectEvaluator, PropertySet};
use crate::error::{PropertyError, PropertyResult};
use crate::oracle::{RawPartials, RegionOracle};
use crate::state::{Region, ThermoState};
use sp_core::{ensure_finite, scaled_step};

/// ψ and (∂ρ/∂h)_p of one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivatives {
    /// (∂ρ/∂p)_h [kg/(m³·Pa)]
    pub psi: f64,
    /// (∂ρ/∂h)_p [kg²/(m³·J)]
    pub drhodh: f64,
}

/// Chain rule from raw partials.
pub fn chain_rule(rho: f64, t: f64, cp: f64, raw: RawPartials) -> PropertyResult<Derivatives> {
    if !cp.is_finite() || cp <= 0.0 {
        return Err(PropertyError::NonPhysical {
            what: "cp must be positive and finite for derivatives",
        });
    }
    let dhdp_t = 1.0 / rho + t / (rho * rho) * raw.drho_dt_p;
    let drhodh = raw.drho_dt_p / cp;
    let psi = raw.drho_dp_t - raw.drho_dt_p * dhdp_t / cp;
    Ok(Derivatives {
        psi: ensure_finite(psi, "psi")?,
        drhodh: ensure_finite(drhodh, "drhodh")?,
    })
}

/// Central difference, one-sided when a stencil point is unusable.
fn difference(
    x: f64,
    step: f64,
    centre: f64,
    mut f: impl FnMut(f64) -> PropertyResult<Option<f64>>,
) -> PropertyResult<f64> {
    let plus = f(x + step)?;
    let minus = f(x - step)?;
    match (plus, minus) {
        (Some(a), Some(b)) => Ok((a - b) / (2.0 * step)),
        (Some(a), None) => Ok((a - centre) / step),
        (None, Some(b)) => Ok((centre - b) / step),
        (None, None) => Err(PropertyError::NonPhysical {
            what: "no finite-difference stencil point stays in the region",
        }),
    }
}

pub struct DerivativeEstimator<'a, O: RegionOracle + ?Sized> {
    oracle: &'a O,
    config: &'a EngineConfig,
}

impl<'a, O: RegionOracle + ?Sized> DerivativeEstimator<'a, O> {
    pub fn new(oracle: &'a O, config: &'a EngineConfig) -> Self {
        Self { oracle, config }
    }

    /// Derivatives at an evaluated state.
    pub fn at(&self, set: &PropertySet) -> PropertyResult<Derivatives> {
        match set.state {
            ThermoState::TwoPhase { p, .. } => self.two_phase(p, set.h, set.rho),
            state => {
                let raw = match self.oracle.raw_partials(&state)? {
                    Some(raw) => raw,
                    None => self.differenced_partials(&state, set.rho)?,
                };
                chain_rule(set.rho, state.t(), set.cp, raw)
            }
        }
    }

    /// ρ at (p, T) when the point is inside the bounds and in `region`.
    fn density_in_region(&self, p: f64, t: f64, region: Region) -> PropertyResult<Option<f64>> {
        if !self.config.bounds.contains_pressure(p) || !Bounds::contains_temperature(t) {
            return Ok(None);
        }
        let direct = DirectEvaluator::new(self.oracle);
        let state = direct.classify(p, t)?;
        if state.region() != region {
            return Ok(None);
        }
        Ok(Some(self.oracle.density(&state)?))
    }

    /// (∂ρ/∂p)_T and (∂ρ/∂T)_p by differencing in (p, T).
    fn differenced_partials(&self, state: &ThermoState, rho: f64) -> PropertyResult<RawPartials> {
        let steps = &self.config.derivatives;
        let (p, t, region) = (state.p(), state.t(), state.region());
        let dp = scaled_step(p, steps.relative_step, steps.min_pressure_step);
        let dt = scaled_step(t, steps.relative_step, steps.min_temperature_step);

        let drho_dp_t = difference(p, dp, rho, |pp| self.density_in_region(pp, t, region))?;
        let drho_dt_p = difference(t, dt, rho, |tt| self.density_in_region(p, tt, region))?;
        Ok(RawPartials {
            drho_dp_t,
            drho_dt_p,
        })
    }

    /// Mixture density at (p, h) when the point is still under the dome.
    fn two_phase_density(&self, p: f64, h: f64) -> PropertyResult<Option<f64>> {
        if !self.config.bounds.contains_pressure(p) || p >= self.oracle.critical_pressure() {
            return Ok(None);
        }
        let t_sat = self.oracle.saturation_temperature(p)?;
        let hf = self.oracle.saturated_liquid_enthalpy(t_sat)?;
        let hg = self.oracle.saturated_vapor_enthalpy(t_sat)?;
        if hg <= hf {
            return Ok(None);
        }
        let x = (h - hf) / (hg - hf);
        if !(0.0..=1.0).contains(&x) {
            return Ok(None);
        }
        let state = self.oracle.saturated_state(p, t_sat, x)?;
        Ok(Some(self.oracle.density(&state)?))
    }

    fn two_phase(&self, p: f64, h: f64, rho: f64) -> PropertyResult<Derivatives> {
        let steps = &self.config.derivatives;
        let dp = scaled_step(p, steps.relative_step, steps.min_pressure_step);
        let dh = scaled_step(h, steps.relative_step, steps.min_enthalpy_step);

        let psi = difference(p, dp, rho, |pp| self.two_phase_density(pp, h))?;
        let drhodh = difference(h, dh, rho, |hh| self.two_phase_density(p, hh))?;
        Ok(Derivatives {
            psi: ensure_finite(psi, "psi")?,
            drhodh: ensure_finite(drhodh, "drhodh")?,
        })
    }
}
