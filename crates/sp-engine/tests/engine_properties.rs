//! End-to-end property checks through the IF97 engine.
//!
//! Reference values are from the IAPWS-IF97 verification tables.

use proptest::prelude::*;
use sp_core::units::{k, mpa, pa};
use sp_engine::{PropertyEngine, PropertyService, Region, RegionOracle};
use sp_if97::{P_CRIT, T_B23_MIN, boundary};

fn rel(a: f64, b: f64) -> f64 {
    ((a - b) / b).abs()
}

#[test]
fn water_at_1bar_300k() {
    let engine = PropertyEngine::new();
    let bundle = engine.evaluate_pt(pa(1.0e5), k(300.0)).unwrap();
    assert_eq!(bundle.region, Region::Liquid);
    assert!(
        (bundle.rho.value - 996.6).abs() < 0.2,
        "rho = {} kg/m³",
        bundle.rho.value
    );
    assert_eq!(bundle.x, 0.0);
}

#[test]
fn region1_reference_point() {
    let engine = PropertyEngine::new();
    let bundle = engine.evaluate_pt(mpa(3.0), k(300.0)).unwrap();
    assert!(rel(1.0 / bundle.rho.value, 0.100_215_168e-2) < 1e-7);
    assert!(rel(bundle.h, 0.115_331_273e6) < 1e-7);
    assert!(rel(bundle.s, 0.392_294_792e3) < 1e-7);
}

#[test]
fn region2_reference_point() {
    let engine = PropertyEngine::new();
    let bundle = engine.evaluate_pt(pa(3500.0), k(700.0)).unwrap();
    assert_eq!(bundle.region, Region::Vapor);
    assert_eq!(bundle.x, 1.0);
    assert!(rel(1.0 / bundle.rho.value, 0.923_015_898e2) < 1e-7);
    assert!(rel(bundle.h, 0.333_568_375e7) < 1e-7);
}

#[test]
fn region3_reference_point() {
    let engine = PropertyEngine::new();
    let bundle = engine.evaluate_pt(pa(0.255_837_018e8), k(650.0)).unwrap();
    assert_eq!(bundle.region, Region::Supercritical);
    assert!(rel(bundle.rho.value, 500.0) < 1e-6);
    assert!(rel(bundle.h, 0.186_343_019e7) < 1e-6);
    assert!(bundle.psi > 0.0);
}

#[test]
fn saturation_reference_points() {
    let engine = PropertyEngine::new();
    let oracle = engine.oracle();
    assert!(rel(oracle.saturation_temperature(1.0e5).unwrap(), 0.372_755_919e3) < 1e-8);
    assert!(rel(oracle.saturation_pressure(300.0).unwrap(), 0.353_658_941e4) < 1e-8);
}

#[test]
fn saturated_enthalpies_are_ordered_below_critical() {
    let engine = PropertyEngine::new();
    let oracle = engine.oracle();
    for t in [280.0, 350.0, 450.0, 550.0, 620.0, 630.0, 640.0, 645.0] {
        let hf = oracle.saturated_liquid_enthalpy(t).unwrap();
        let hg = oracle.saturated_vapor_enthalpy(t).unwrap();
        assert!(hf < hg, "t={t}: hf={hf} hg={hg}");
        let rho_f = oracle.saturated_liquid_density(t).unwrap();
        let rho_g = oracle.saturated_vapor_density(t).unwrap();
        assert!(rho_f > rho_g, "t={t}");
    }
}

#[test]
fn dome_returns_exact_saturation_temperature() {
    let engine = PropertyEngine::new();
    for p in [1.0e4, 1.0e5, 1.0e6, 5.0e6, 15.0e6, 20.0e6] {
        let oracle = engine.oracle();
        let t_sat = oracle.saturation_temperature(p).unwrap();
        let hf = oracle.saturated_liquid_enthalpy(t_sat).unwrap();
        let hg = oracle.saturated_vapor_enthalpy(t_sat).unwrap();
        for x in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let bundle = engine.evaluate_ph(pa(p), hf + x * (hg - hf)).unwrap();
            assert_eq!(bundle.region, Region::TwoPhase);
            assert_eq!(bundle.t.value, t_sat, "p={p} x={x}");
            assert!((bundle.x - x).abs() < 1e-9, "p={p} x={x}");
        }
    }
}

#[test]
fn two_phase_bundle_is_complete() {
    let engine = PropertyEngine::new();
    let oracle = engine.oracle();
    let t_sat = oracle.saturation_temperature(1.0e6).unwrap();
    let hf = oracle.saturated_liquid_enthalpy(t_sat).unwrap();
    let hg = oracle.saturated_vapor_enthalpy(t_sat).unwrap();
    let bundle = engine.evaluate_ph(pa(1.0e6), hf + 0.4 * (hg - hf)).unwrap();
    assert!(bundle.rho.value > oracle.saturated_vapor_density(t_sat).unwrap());
    assert!(bundle.rho.value < oracle.saturated_liquid_density(t_sat).unwrap());
    assert!(bundle.psi.is_finite());
    assert!(bundle.drhodh < 0.0);
    assert!(bundle.mu.value > 0.0 && bundle.kappa.value > 0.0);
}

#[test]
fn supercritical_round_trips() {
    let engine = PropertyEngine::new();
    for (p, t) in [(25.0e6, 700.0), (30.0e6, 650.0), (50.0e6, 800.0), (23.0e6, 640.0)] {
        let forward = engine.evaluate_pt(pa(p), k(t)).unwrap();
        let back = engine.evaluate_ph(pa(p), forward.h).unwrap();
        assert!(
            (back.t.value - t).abs() < 1e-2,
            "p={p} t={t}: got {}",
            back.t.value
        );
    }
}

#[test]
fn psi_positive_in_near_critical_region() {
    let engine = PropertyEngine::new();
    for (p, t) in [(25.0e6, 700.0), (30.0e6, 650.0), (50.0e6, 800.0)] {
        let bundle = engine.evaluate_pt(pa(p), k(t)).unwrap();
        assert!(bundle.psi > 0.0, "p={p} t={t}: psi={}", bundle.psi);
    }
}

#[test]
fn transport_magnitudes() {
    let engine = PropertyEngine::new();
    let mu = engine.mu_pt(pa(1.0e5), k(300.0)).unwrap().value;
    let kappa = engine.kappa_pt(pa(1.0e5), k(300.0)).unwrap().value;
    assert!(mu > 8.0e-4 && mu < 9.0e-4, "mu = {mu}");
    assert!(kappa > 0.58 && kappa < 0.64, "kappa = {kappa}");

    let mu_steam = engine.mu_pt(pa(1.0e5), k(500.0)).unwrap().value;
    assert!(mu_steam > 1.0e-5 && mu_steam < 2.5e-5, "mu = {mu_steam}");
}

/// Region boundaries where adjacent IF97 equations disagree by up to ~100 J/kg,
/// so h(T) is not strictly monotone within a few hundredths of a kelvin.
fn near_region_boundary(p: f64, t: f64) -> bool {
    let b23 = boundary::b23_temperature(p).unwrap();
    (t - T_B23_MIN).abs() < 0.1 || (p > 16.5e6 && (t - b23).abs() < 0.1)
}

#[test]
fn compressed_liquid_above_623k_round_trips() {
    let engine = PropertyEngine::new();
    for (p, t) in [(17.6e6, 487.0), (17.6e6, 625.0), (20.0e6, 623.16), (100.0e6, 647.005)] {
        let forward = engine.evaluate_pt(pa(p), k(t)).unwrap();
        assert!(forward.cp > 0.0, "p={p} t={t}");
        let back = engine.evaluate_ph(pa(p), forward.h).unwrap();
        assert_eq!(back.region, forward.region, "p={p} t={t}");
        assert!((back.t.value - t).abs() < 1e-2, "p={p} t={t}: got {}", back.t.value);
    }
}

#[test]
fn region3_liquid_density_reference() {
    let engine = PropertyEngine::new();
    let bundle = engine.evaluate_pt(pa(17.6e6), k(628.28)).unwrap();
    assert_eq!(bundle.region, Region::Supercritical);
    assert!((bundle.rho.value - 552.58).abs() < 0.1, "rho = {}", bundle.rho.value);
    assert!((bundle.h - 1.7149e6).abs() < 1.0e3, "h = {}", bundle.h);
}

proptest! {
    #[test]
    fn ph_inverts_pt_outside_dome(p in 1.0e4f64..100.0e6, t in 280.0f64..1000.0) {
        let engine = PropertyEngine::new();
        if p < P_CRIT {
            let t_sat = engine.oracle().saturation_temperature(p).unwrap();
            prop_assume!((t - t_sat).abs() > 0.5);
        }
        prop_assume!(!near_region_boundary(p, t));

        let forward = engine.evaluate_pt(pa(p), k(t)).unwrap();
        let back = engine.evaluate_ph(pa(p), forward.h).unwrap();
        prop_assert!((back.t.value - t).abs() < 1e-2, "t={} back={}", t, back.t.value);
        prop_assert_eq!(back.region, forward.region);
    }

    #[test]
    fn enthalpy_increases_with_temperature(p in 1.0e4f64..100.0e6, t in 280.0f64..1000.0) {
        let engine = PropertyEngine::new();
        let lo = engine.evaluate_pt(pa(p), k(t)).unwrap();
        let hi = engine.evaluate_pt(pa(p), k(t + 0.5)).unwrap();
        prop_assume!(lo.region == hi.region);
        prop_assert!(hi.h > lo.h);
    }

    #[test]
    fn psi_positive_in_single_phase(p in 1.0e4f64..100.0e6, t in 280.0f64..1000.0) {
        let engine = PropertyEngine::new();
        let bundle = engine.evaluate_pt(pa(p), k(t)).unwrap();
        prop_assert!(bundle.region.is_single_phase());
        prop_assert!(bundle.cp > 0.0, "cp={}", bundle.cp);
        prop_assert!(bundle.psi > 0.0, "psi={}", bundle.psi);
    }

    #[test]
    fn clipped_queries_equal_queries_at_the_clip(p in 1.0e3f64..2.0e8, t in 200.0f64..1500.0) {
        let engine = PropertyEngine::new();
        let (pc, tc) = engine.config().bounds.clip(p, t);
        let raw = engine.evaluate_pt(pa(p), k(t)).unwrap();
        let clipped = engine.evaluate_pt(pa(pc), k(tc)).unwrap();
        prop_assert_eq!(raw, clipped);
    }
}
