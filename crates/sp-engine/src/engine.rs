//! Property service exposed to the host flow solver.

use crate::config::{ConfigError, EngineConfig};
use crate::derivative::{Derivatives, DerivativeEstimator};
use crate::direct::{DirectEvaluator, PropertySet};
use crate::error::PropertyResult;
use crate::if97::If97Oracle;
use crate::inverse::InverseSolver;
use crate::oracle::RegionOracle;
use crate::state::{Region, SpecEnthalpy, SpecEntropy, SpecHeatCapacity};
use sp_core::units::{
    Density, DynVisc, Pressure, Temperature, ThermalCond, k, kg_per_m3, pa_s, w_per_m_k,
};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

/// Every property the flow solver needs for one cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertyBundle {
    /// Pressure [Pa] after clipping
    pub p: Pressure,

    /// Temperature [K]
    pub t: Temperature,

    /// Density [kg/m³]
    pub rho: Density,

    /// Specific enthalpy [J/kg]
    pub h: SpecEnthalpy,

    /// Specific entropy [J/(kg·K)]
    pub s: SpecEntropy,

    /// Specific heat capacity at constant pressure [J/(kg·K)]
    pub cp: SpecHeatCapacity,

    /// Specific heat capacity at constant volume [J/(kg·K)]
    pub cv: SpecHeatCapacity,

    /// Compressibility (∂ρ/∂p)_h [kg/(m³·Pa)]
    pub psi: f64,

    /// (∂ρ/∂h)_p [kg²/(m³·J)]
    pub drhodh: f64,

    /// Dynamic viscosity [Pa·s]
    pub mu: DynVisc,

    /// Thermal conductivity [W/(m·K)]
    pub kappa: ThermalCond,

    /// Thermal diffusivity for enthalpy, k/cp [kg/(m·s)]
    pub alphah: f64,

    /// Vapor mass fraction; 0 or 1 outside the dome
    pub x: f64,

    pub region: Region,
}

impl PropertyBundle {
    fn from_parts(set: &PropertySet, derivatives: Derivatives) -> Self {
        Self {
            p: set.state.pressure(),
            t: set.state.temperature(),
            rho: kg_per_m3(set.rho),
            h: set.h,
            s: set.s,
            cp: set.cp,
            cv: set.cv,
            psi: derivatives.psi,
            drhodh: derivatives.drhodh,
            mu: pa_s(set.mu),
            kappa: w_per_m_k(set.kappa),
            alphah: set.kappa / set.cp,
            x: set.x,
            region: set.state.region(),
        }
    }

    /// Return a summary string of the bundle (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Bundle({},P={:.0}Pa,T={:.3}K,ρ={:.4}kg/m³,h={:.1}J/kg,x={:.4},ψ={:.4e},∂ρ/∂h={:.4e})",
            self.region,
            self.p.value,
            self.t.value,
            self.rho.value,
            self.h,
            self.x,
            self.psi,
            self.drhodh
        )
    }
}

/// Property queries used by a pressure-based flow solver.
///
/// Implementations must be thread-safe (Send + Sync) so cells can be
/// evaluated in parallel. The scalar accessors default to the full bundle;
/// implementations override the ones they can answer more cheaply.
pub trait PropertyService: Send + Sync {
    /// Full bundle at (p, T); x is the degenerate 0/1 value.
    fn evaluate_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<PropertyBundle>;

    /// Full bundle at (p, h); T comes from the inversion, x is the true quality.
    fn evaluate_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<PropertyBundle>;

    /// Specific gas constant [J/(kg·K)].
    fn specific_gas_constant(&self) -> f64;

    fn rho_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<Density> {
        Ok(self.evaluate_pt(p, t)?.rho)
    }

    fn rho_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<Density> {
        Ok(self.evaluate_ph(p, h)?.rho)
    }

    fn cp_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.evaluate_pt(p, t)?.cp)
    }

    fn cp_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.evaluate_ph(p, h)?.cp)
    }

    fn cv_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.evaluate_pt(p, t)?.cv)
    }

    fn cv_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.evaluate_ph(p, h)?.cv)
    }

    fn h_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecEnthalpy> {
        Ok(self.evaluate_pt(p, t)?.h)
    }

    fn s_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecEntropy> {
        Ok(self.evaluate_pt(p, t)?.s)
    }

    fn t_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<Temperature> {
        Ok(self.evaluate_ph(p, h)?.t)
    }

    fn mu_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<DynVisc> {
        Ok(self.evaluate_pt(p, t)?.mu)
    }

    fn kappa_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<ThermalCond> {
        Ok(self.evaluate_pt(p, t)?.kappa)
    }

    fn psi_h_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        Ok(self.evaluate_pt(p, t)?.psi)
    }

    fn psi_h_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<f64> {
        Ok(self.evaluate_ph(p, h)?.psi)
    }

    fn drhodh_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        Ok(self.evaluate_pt(p, t)?.drhodh)
    }

    fn drhodh_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<f64> {
        Ok(self.evaluate_ph(p, h)?.drhodh)
    }

    /// ρ/p [s²/m²], both at the admitted (clipped) state.
    fn psi_eos(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        let bundle = self.evaluate_pt(p, t)?;
        Ok(bundle.rho.value / bundle.p.get::<pascal>())
    }

    /// Compressibility factor Z = p/(ρRT) at the admitted (clipped) state.
    fn compression_factor(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        let bundle = self.evaluate_pt(p, t)?;
        Ok(compressibility(
            bundle.p.get::<pascal>(),
            bundle.rho.value,
            self.specific_gas_constant(),
            bundle.t.get::<kelvin>(),
        ))
    }

    /// cp − cv [J/(kg·K)].
    fn cp_minus_cv(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecHeatCapacity> {
        let bundle = self.evaluate_pt(p, t)?;
        Ok(bundle.cp - bundle.cv)
    }

    /// k/cp [kg/(m·s)].
    fn alphah(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        Ok(self.evaluate_pt(p, t)?.alphah)
    }

    fn is_incompressible(&self) -> bool {
        false
    }

    fn is_isochoric(&self) -> bool {
        false
    }
}

fn compressibility(p: f64, rho: f64, r: f64, t: f64) -> f64 {
    p / (rho * r * t)
}

/// Water/steam property engine over a region oracle.
///
/// Read-only after construction; share it across threads by reference.
#[derive(Debug, Clone)]
pub struct PropertyEngine<O: RegionOracle = If97Oracle> {
    oracle: O,
    config: EngineConfig,
}

impl PropertyEngine<If97Oracle> {
    /// IF97 engine with the default configuration.
    pub fn new() -> Self {
        Self {
            oracle: If97Oracle::new(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_oracle(If97Oracle::new(), config)
    }
}

impl Default for PropertyEngine<If97Oracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: RegionOracle> PropertyEngine<O> {
    pub fn with_oracle(oracle: O, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { oracle, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    fn direct(&self) -> DirectEvaluator<'_, O> {
        DirectEvaluator::new(&self.oracle)
    }

    /// Clipped (or strictly checked) raw (p, T).
    fn admit_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<(f64, f64)> {
        self.config.bounds.enforce(
            self.config.clip_mode,
            p.get::<pascal>(),
            t.get::<kelvin>(),
        )
    }

    fn bundle(&self, set: &PropertySet) -> PropertyResult<PropertyBundle> {
        let derivatives = DerivativeEstimator::new(&self.oracle, &self.config).at(set)?;
        Ok(PropertyBundle::from_parts(set, derivatives))
    }

    /// Property vector at (p, T) without derivatives.
    pub fn properties_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<PropertySet> {
        let (p, t) = self.admit_pt(p, t)?;
        self.direct().evaluate(p, t)
    }

    /// Property vector at (p, h) without derivatives.
    pub fn properties_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<PropertySet> {
        let solution = InverseSolver::new(&self.oracle, &self.config).solve(p.get::<pascal>(), h)?;
        self.direct().properties(&solution.state)
    }
}

impl<O: RegionOracle> PropertyService for PropertyEngine<O> {
    fn evaluate_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<PropertyBundle> {
        let set = self.properties_pt(p, t)?;
        self.bundle(&set)
    }

    fn evaluate_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<PropertyBundle> {
        let set = self.properties_ph(p, h)?;
        self.bundle(&set)
    }

    fn specific_gas_constant(&self) -> f64 {
        self.oracle.specific_gas_constant()
    }

    fn rho_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<Density> {
        let (p, t) = self.admit_pt(p, t)?;
        Ok(kg_per_m3(self.direct().density(p, t)?))
    }

    fn rho_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<Density> {
        Ok(kg_per_m3(self.properties_ph(p, h)?.rho))
    }

    fn cp_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.properties_pt(p, t)?.cp)
    }

    fn cp_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.properties_ph(p, h)?.cp)
    }

    fn cv_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.properties_pt(p, t)?.cv)
    }

    fn cv_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<SpecHeatCapacity> {
        Ok(self.properties_ph(p, h)?.cv)
    }

    fn h_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecEnthalpy> {
        let (p, t) = self.admit_pt(p, t)?;
        Ok(self.direct().enthalpy_and_cp(p, t)?.0)
    }

    fn s_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecEntropy> {
        Ok(self.properties_pt(p, t)?.s)
    }

    fn t_ph(&self, p: Pressure, h: SpecEnthalpy) -> PropertyResult<Temperature> {
        let solution = InverseSolver::new(&self.oracle, &self.config).solve(p.get::<pascal>(), h)?;
        Ok(k(solution.state.t()))
    }

    fn mu_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<DynVisc> {
        Ok(pa_s(self.properties_pt(p, t)?.mu))
    }

    fn kappa_pt(&self, p: Pressure, t: Temperature) -> PropertyResult<ThermalCond> {
        Ok(w_per_m_k(self.properties_pt(p, t)?.kappa))
    }

    fn psi_eos(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        let (p, t) = self.admit_pt(p, t)?;
        Ok(self.direct().density(p, t)? / p)
    }

    fn compression_factor(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        let (p, t) = self.admit_pt(p, t)?;
        let rho = self.direct().density(p, t)?;
        Ok(compressibility(p, rho, self.specific_gas_constant(), t))
    }

    fn cp_minus_cv(&self, p: Pressure, t: Temperature) -> PropertyResult<SpecHeatCapacity> {
        let set = self.properties_pt(p, t)?;
        Ok(set.cp - set.cv)
    }

    fn alphah(&self, p: Pressure, t: Temperature) -> PropertyResult<f64> {
        let set = self.properties_pt(p, t)?;
        Ok(set.kappa / set.cp)
    }
}
