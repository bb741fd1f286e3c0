//! Direct state evaluation from (p, T).
//!
//! The region is classified once per query and every property is answered
//! from the same snapshot. Inputs are expected to be clipped already.

use crate::error::PropertyResult;
use crate::oracle::{RegionOracle, validation};
use crate::state::{SpecEnthalpy, SpecEntropy, SpecHeatCapacity, ThermoState};

/// Raw SI property vector of one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySet {
    pub state: ThermoState,
    /// Density [kg/m³]
    pub rho: f64,
    pub h: SpecEnthalpy,
    pub s: SpecEntropy,
    pub cp: SpecHeatCapacity,
    pub cv: SpecHeatCapacity,
    /// Dynamic viscosity [Pa·s]
    pub mu: f64,
    /// Thermal conductivity [W/(m·K)]
    pub kappa: f64,
    /// Vapor mass fraction (degenerate 0/1 outside the dome)
    pub x: f64,
}

/// Evaluates property vectors through a borrowed oracle.
pub struct DirectEvaluator<'a, O: RegionOracle + ?Sized> {
    oracle: &'a O,
}

impl<'a, O: RegionOracle + ?Sized> DirectEvaluator<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// Classify (p, T) and build its snapshot.
    pub fn classify(&self, p: f64, t: f64) -> PropertyResult<ThermoState> {
        let region = self.oracle.region(p, t)?;
        self.oracle.state(region, p, t)
    }

    /// Full property vector at (p, T).
    pub fn evaluate(&self, p: f64, t: f64) -> PropertyResult<PropertySet> {
        let state = self.classify(p, t)?;
        self.properties(&state)
    }

    /// Enthalpy and cp at (p, T); the inversion probes through this.
    pub fn enthalpy_and_cp(&self, p: f64, t: f64) -> PropertyResult<(SpecEnthalpy, SpecHeatCapacity)> {
        let state = self.classify(p, t)?;
        let h = self.oracle.enthalpy(&state)?;
        validation::validate_enthalpy(h)?;
        Ok((h, self.oracle.cp(&state)?))
    }

    /// Density at (p, T).
    pub fn density(&self, p: f64, t: f64) -> PropertyResult<f64> {
        let state = self.classify(p, t)?;
        let rho = self.oracle.density(&state)?;
        validation::validate_density(rho)?;
        Ok(rho)
    }

    /// Property vector of an existing snapshot.
    pub fn properties(&self, state: &ThermoState) -> PropertyResult<PropertySet> {
        let oracle = self.oracle;
        let rho = oracle.density(state)?;
        validation::validate_density(rho)?;
        let h = oracle.enthalpy(state)?;
        validation::validate_enthalpy(h)?;
        let s = oracle.entropy(state)?;
        let cp = oracle.cp(state)?;
        validation::validate_cp(cp)?;
        let cv = oracle.cv(state)?;
        validation::validate_cp(cv)?;

        let t = state.t();
        let mu = oracle.viscosity(rho, t)?;
        let kappa = oracle.thermal_conductivity(rho, t)?;
        let x = oracle.quality(state)?;

        Ok(PropertySet {
            state: *state,
            rho,
            h,
            s,
            cp,
            cv,
            mu,
            kappa,
            x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::if97::If97Oracle;
    use crate::state::Region;

    #[test]
    fn ambient_water_is_liquid() {
        let oracle = If97Oracle::new();
        let set = DirectEvaluator::new(&oracle).evaluate(1.0e5, 300.0).unwrap();
        assert_eq!(set.state.region(), Region::Liquid);
        assert!((set.rho - 996.6).abs() < 0.2, "rho = {}", set.rho);
        assert_eq!(set.x, 0.0);
        assert!(set.cp > set.cv);
        assert!(set.mu > 5.0e-4 && set.mu < 1.2e-3);
        assert!(set.kappa > 0.5 && set.kappa < 0.7);
    }

    #[test]
    fn low_pressure_steam_is_vapor() {
        let oracle = If97Oracle::new();
        let set = DirectEvaluator::new(&oracle).evaluate(1.0e5, 400.0).unwrap();
        assert_eq!(set.state.region(), Region::Vapor);
        assert_eq!(set.x, 1.0);
        assert!(set.rho < 1.0);
    }

    #[test]
    fn supercritical_point_resolves_density() {
        let oracle = If97Oracle::new();
        // above B23 (30.48 MPa at 700 K)
        let set = DirectEvaluator::new(&oracle).evaluate(40.0e6, 700.0).unwrap();
        assert_eq!(set.state.region(), Region::Supercritical);
        assert!(set.rho > 322.0 && set.rho < 700.0, "rho = {}", set.rho);
        assert!(set.h.is_finite() && set.s.is_finite());
        assert!(set.cp > 0.0);

        let set = DirectEvaluator::new(&oracle).evaluate(25.583_701_8e6, 650.0).unwrap();
        assert_eq!(set.state.region(), Region::Supercritical);
        assert!((set.rho - 500.0).abs() < 1e-3, "rho = {}", set.rho);
    }

    #[test]
    fn compressed_liquid_above_623k_uses_the_liquid_root() {
        let oracle = If97Oracle::new();
        let direct = DirectEvaluator::new(&oracle);
        let set = direct.evaluate(20.0e6, 623.16).unwrap();
        assert_eq!(set.state.region(), Region::Supercritical);
        assert!((set.rho - 600.6).abs() < 0.5, "rho = {}", set.rho);
        assert!(set.cp > 0.0);

        let set = direct.evaluate(100.0e6, 647.005).unwrap();
        assert!((set.rho - 730.3).abs() < 0.5, "rho = {}", set.rho);
        assert!(set.cp > 0.0);
    }

    #[test]
    fn enthalpy_probe_matches_full_evaluation() {
        let oracle = If97Oracle::new();
        let direct = DirectEvaluator::new(&oracle);
        let (h, cp) = direct.enthalpy_and_cp(3.0e6, 500.0).unwrap();
        let set = direct.evaluate(3.0e6, 500.0).unwrap();
        assert_eq!(h, set.h);
        assert_eq!(cp, set.cp);
    }

    #[test]
    fn two_phase_snapshot_is_total() {
        let oracle = If97Oracle::new();
        let t = oracle.saturation_temperature(1.0e5).unwrap();
        let state = oracle.saturated_state(1.0e5, t, 0.5).unwrap();
        let set = DirectEvaluator::new(&oracle).properties(&state).unwrap();
        assert_eq!(set.x, 0.5);
        assert!(set.mu > 0.0 && set.kappa > 0.0);
    }
}
