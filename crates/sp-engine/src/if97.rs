//! IAPWS-IF97 region oracle backed by `sp-if97`.

use crate::error::{PropertyError, PropertyResult};
use crate::oracle::{RawPartials, RegionOracle, validation};
use crate::state::{Region, ThermoState};
use sp_if97::region3::Branch;
use sp_if97::region4::SaturatedPhase;
use sp_if97::{If97Result, boundary, region1, region2, region3, region4, transport};

/// IF97 correlations as a [`RegionOracle`].
///
/// Stateless; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct If97Oracle;

impl If97Oracle {
    pub fn new() -> Self {
        Self
    }

    fn saturated_phases(&self, t: f64) -> PropertyResult<(SaturatedPhase, SaturatedPhase)> {
        Ok((
            backend(region4::saturated_liquid(t))?,
            backend(region4::saturated_vapor(t))?,
        ))
    }

    /// Quality-weighted mix of a saturated-phase property.
    fn mix<F>(&self, t: f64, x: f64, f: F) -> PropertyResult<f64>
    where
        F: Fn(&SaturatedPhase) -> f64,
    {
        let (liq, vap) = self.saturated_phases(t)?;
        Ok(f(&liq) + x * (f(&vap) - f(&liq)))
    }
}

/// Map a correlation error into the engine's error type.
fn backend<T>(result: If97Result<T>) -> PropertyResult<T> {
    result.map_err(|e| PropertyError::Oracle {
        message: format!("IF97: {e}"),
    })
}

impl RegionOracle for If97Oracle {
    fn name(&self) -> &str {
        "IAPWS-IF97"
    }

    fn specific_gas_constant(&self) -> f64 {
        sp_if97::R
    }

    fn critical_pressure(&self) -> f64 {
        sp_if97::P_CRIT
    }

    fn critical_density(&self) -> f64 {
        sp_if97::RHO_CRIT
    }

    fn region(&self, p: f64, t: f64) -> PropertyResult<Region> {
        Ok(match backend(boundary::region_pt(p, t))? {
            sp_if97::Region::One => Region::Liquid,
            sp_if97::Region::Two => Region::Vapor,
            sp_if97::Region::Three => Region::Supercritical,
        })
    }

    fn state(&self, region: Region, p: f64, t: f64) -> PropertyResult<ThermoState> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;
        match region {
            Region::Liquid => Ok(ThermoState::Liquid { p, t }),
            Region::Vapor => Ok(ThermoState::Vapor { p, t }),
            Region::Supercritical => {
                let branch = backend(Branch::for_state(p, t))?;
                let rho = backend(region3::density(p, t, branch))?;
                Ok(ThermoState::Supercritical { rho, t, p })
            }
            Region::TwoPhase => Err(PropertyError::NonPhysical {
                what: "two-phase states need a quality; use saturated_state",
            }),
        }
    }

    fn density(&self, state: &ThermoState) -> PropertyResult<f64> {
        match *state {
            ThermoState::Liquid { p, t } => Ok(1.0 / backend(region1::specific_volume(p, t))?),
            ThermoState::Vapor { p, t } => Ok(1.0 / backend(region2::specific_volume(p, t))?),
            ThermoState::Supercritical { rho, .. } => Ok(rho),
            ThermoState::TwoPhase { t, x, .. } => {
                let v = self.mix(t, x, |phase| 1.0 / phase.rho)?;
                Ok(1.0 / v)
            }
        }
    }

    fn enthalpy(&self, state: &ThermoState) -> PropertyResult<f64> {
        match *state {
            ThermoState::Liquid { p, t } => backend(region1::enthalpy(p, t)),
            ThermoState::Vapor { p, t } => backend(region2::enthalpy(p, t)),
            ThermoState::Supercritical { rho, t, .. } => backend(region3::enthalpy(rho, t)),
            ThermoState::TwoPhase { t, x, .. } => self.mix(t, x, |phase| phase.h),
        }
    }

    fn entropy(&self, state: &ThermoState) -> PropertyResult<f64> {
        match *state {
            ThermoState::Liquid { p, t } => backend(region1::entropy(p, t)),
            ThermoState::Vapor { p, t } => backend(region2::entropy(p, t)),
            ThermoState::Supercritical { rho, t, .. } => backend(region3::entropy(rho, t)),
            ThermoState::TwoPhase { t, x, .. } => self.mix(t, x, |phase| phase.s),
        }
    }

    fn cp(&self, state: &ThermoState) -> PropertyResult<f64> {
        match *state {
            ThermoState::Liquid { p, t } => backend(region1::cp(p, t)),
            ThermoState::Vapor { p, t } => backend(region2::cp(p, t)),
            ThermoState::Supercritical { rho, t, .. } => backend(region3::cp(rho, t)),
            ThermoState::TwoPhase { t, x, .. } => self.mix(t, x, |phase| phase.cp),
        }
    }

    fn cv(&self, state: &ThermoState) -> PropertyResult<f64> {
        match *state {
            ThermoState::Liquid { p, t } => backend(region1::cv(p, t)),
            ThermoState::Vapor { p, t } => backend(region2::cv(p, t)),
            ThermoState::Supercritical { rho, t, .. } => backend(region3::cv(rho, t)),
            ThermoState::TwoPhase { t, x, .. } => self.mix(t, x, |phase| phase.cv),
        }
    }

    fn raw_partials(&self, state: &ThermoState) -> PropertyResult<Option<RawPartials>> {
        let partials = match *state {
            ThermoState::Liquid { p, t } => {
                let rho = 1.0 / backend(region1::specific_volume(p, t))?;
                RawPartials {
                    drho_dp_t: rho * backend(region1::isothermal_compressibility(p, t))?,
                    drho_dt_p: -rho * backend(region1::expansion_coefficient(p, t))?,
                }
            }
            ThermoState::Vapor { p, t } => {
                let rho = 1.0 / backend(region2::specific_volume(p, t))?;
                RawPartials {
                    drho_dp_t: rho * backend(region2::isothermal_compressibility(p, t))?,
                    drho_dt_p: -rho * backend(region2::expansion_coefficient(p, t))?,
                }
            }
            ThermoState::Supercritical { rho, t, .. } => {
                let dp_drho = backend(region3::dp_drho(rho, t))?;
                let dp_dt = backend(region3::dp_dt(rho, t))?;
                if dp_drho <= 0.0 {
                    return Err(PropertyError::NonPhysical {
                        what: "region 3 state is mechanically unstable",
                    });
                }
                RawPartials {
                    drho_dp_t: 1.0 / dp_drho,
                    drho_dt_p: -dp_dt / dp_drho,
                }
            }
            ThermoState::TwoPhase { .. } => return Ok(None),
        };
        Ok(Some(partials))
    }

    fn saturation_pressure(&self, t: f64) -> PropertyResult<f64> {
        backend(region4::saturation_pressure(t))
    }

    fn saturation_temperature(&self, p: f64) -> PropertyResult<f64> {
        backend(region4::saturation_temperature(p))
    }

    fn saturated_liquid_enthalpy(&self, t: f64) -> PropertyResult<f64> {
        Ok(backend(region4::saturated_liquid(t))?.h)
    }

    fn saturated_vapor_enthalpy(&self, t: f64) -> PropertyResult<f64> {
        Ok(backend(region4::saturated_vapor(t))?.h)
    }

    fn saturated_liquid_density(&self, t: f64) -> PropertyResult<f64> {
        Ok(backend(region4::saturated_liquid(t))?.rho)
    }

    fn saturated_vapor_density(&self, t: f64) -> PropertyResult<f64> {
        Ok(backend(region4::saturated_vapor(t))?.rho)
    }

    fn viscosity(&self, rho: f64, t: f64) -> PropertyResult<f64> {
        backend(transport::viscosity(rho, t))
    }

    fn thermal_conductivity(&self, rho: f64, t: f64) -> PropertyResult<f64> {
        backend(transport::thermal_conductivity(rho, t))
    }
}
