//! Region 4: the saturation line.
//!
//! Saturation pressure and temperature come from the IF97 saturation
//! equation. Saturated-phase properties are evaluated on the adjoining
//! single-phase region: regions 1/2 at psat up to 623.15 K, region 3 above it
//! with phase densities from the IAPWS auxiliary saturated-density equations.

use crate::{
    If97Error, If97Result, P_CRIT, RHO_CRIT, T_B23_MIN, T_CRIT, check_positive, check_result,
    region1, region2, region3,
};

const N: [f64; 10] = [
    1_167.052_145_276_7,
    -724_213.167_032_06,
    -17.073_846_940_092,
    12_020.824_702_47,
    -3_232_555.032_233_3,
    14.915_108_613_53,
    -4_823.265_736_159_1,
    405_113.405_420_57,
    -0.238_555_575_678_49,
    650.175_348_447_98,
];

// Auxiliary saturated liquid density: (exponent, b)
const LIQUID_AUX: [(f64, f64); 6] = [
    (1.0 / 3.0, 1.992_740_64),
    (2.0 / 3.0, 1.099_653_42),
    (5.0 / 3.0, -0.510_839_303),
    (16.0 / 3.0, -1.754_934_79),
    (43.0 / 3.0, -45.517_035_2),
    (110.0 / 3.0, -6.746_944_50e5),
];

// Auxiliary saturated vapor density: (exponent, c)
const VAPOR_AUX: [(f64, f64); 6] = [
    (2.0 / 6.0, -2.031_502_40),
    (4.0 / 6.0, -2.683_029_40),
    (8.0 / 6.0, -5.386_264_92),
    (18.0 / 6.0, -17.299_160_5),
    (37.0 / 6.0, -44.758_658_1),
    (71.0 / 6.0, -63.920_106_3),
];

/// Saturation pressure [Pa] at temperature `t` [K].
///
/// Defined up to the critical temperature. IF97 validates the equation from
/// 273.15 K; slightly colder inputs are extrapolated.
pub fn saturation_pressure(t: f64) -> If97Result<f64> {
    check_positive("saturation temperature", t)?;
    if t > T_CRIT {
        return Err(If97Error::OutOfRange {
            what: "saturation temperature",
            value: t,
        });
    }
    let theta = t + N[8] / (t - N[9]);
    let a = theta * theta + N[0] * theta + N[1];
    let b = N[2] * theta * theta + N[3] * theta + N[4];
    let c = N[5] * theta * theta + N[6] * theta + N[7];
    let root = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let p_mpa = (2.0 * c / (-b + root)).powi(4);
    check_result("saturation pressure", p_mpa * 1.0e6)
}

/// Saturation temperature [K] at pressure `p` [Pa].
pub fn saturation_temperature(p: f64) -> If97Result<f64> {
    check_positive("saturation pressure", p)?;
    if p > P_CRIT {
        return Err(If97Error::OutOfRange {
            what: "saturation pressure",
            value: p,
        });
    }
    let beta = (p / 1.0e6).powf(0.25);
    let e = beta * beta + N[2] * beta + N[5];
    let f = N[0] * beta * beta + N[3] * beta + N[6];
    let g = N[1] * beta * beta + N[4] * beta + N[7];
    let d = 2.0 * g / (-f - (f * f - 4.0 * e * g).max(0.0).sqrt());
    let s = N[9] + d;
    let t = 0.5 * (s - (s * s - 4.0 * (N[8] + N[9] * d)).max(0.0).sqrt());
    check_result("saturation temperature", t)
}

/// Saturated liquid density from the auxiliary equation [kg/m³].
pub fn auxiliary_liquid_density(t: f64) -> If97Result<f64> {
    let theta = reduced_distance(t)?;
    let sum: f64 = LIQUID_AUX
        .iter()
        .map(|&(e, b)| b * theta.powf(e))
        .sum();
    check_result("auxiliary liquid density", RHO_CRIT * (1.0 + sum))
}

/// Saturated vapor density from the auxiliary equation [kg/m³].
pub fn auxiliary_vapor_density(t: f64) -> If97Result<f64> {
    let theta = reduced_distance(t)?;
    let sum: f64 = VAPOR_AUX.iter().map(|&(e, c)| c * theta.powf(e)).sum();
    check_result("auxiliary vapor density", RHO_CRIT * sum.exp())
}

fn reduced_distance(t: f64) -> If97Result<f64> {
    check_positive("saturation temperature", t)?;
    if t > T_CRIT {
        return Err(If97Error::OutOfRange {
            what: "saturation temperature",
            value: t,
        });
    }
    Ok(1.0 - t / T_CRIT)
}

/// Properties of one saturated phase at a given temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturatedPhase {
    /// Density [kg/m³]
    pub rho: f64,
    /// Specific enthalpy [J/kg]
    pub h: f64,
    /// Specific entropy [J/(kg·K)]
    pub s: f64,
    /// Isobaric heat capacity [J/(kg·K)]
    pub cp: f64,
    /// Isochoric heat capacity [J/(kg·K)]
    pub cv: f64,
}

/// Saturated liquid at temperature `t`.
pub fn saturated_liquid(t: f64) -> If97Result<SaturatedPhase> {
    let p = saturation_pressure(t)?;
    if t <= T_B23_MIN {
        Ok(SaturatedPhase {
            rho: 1.0 / region1::specific_volume(p, t)?,
            h: region1::enthalpy(p, t)?,
            s: region1::entropy(p, t)?,
            cp: region1::cp(p, t)?,
            cv: region1::cv(p, t)?,
        })
    } else {
        near_critical_phase(auxiliary_liquid_density(t)?, t)
    }
}

/// Saturated vapor at temperature `t`.
pub fn saturated_vapor(t: f64) -> If97Result<SaturatedPhase> {
    let p = saturation_pressure(t)?;
    if t <= T_B23_MIN {
        Ok(SaturatedPhase {
            rho: 1.0 / region2::specific_volume(p, t)?,
            h: region2::enthalpy(p, t)?,
            s: region2::entropy(p, t)?,
            cp: region2::cp(p, t)?,
            cv: region2::cv(p, t)?,
        })
    } else {
        near_critical_phase(auxiliary_vapor_density(t)?, t)
    }
}

fn near_critical_phase(rho: f64, t: f64) -> If97Result<SaturatedPhase> {
    Ok(SaturatedPhase {
        rho,
        h: region3::enthalpy(rho, t)?,
        s: region3::entropy(rho, t)?,
        cp: region3::cp(rho, t)?,
        cv: region3::cv(rho, t)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn saturation_pressure_verification() {
        assert!(rel(saturation_pressure(300.0).unwrap(), 0.353_658_941e4) < 1e-7);
        assert!(rel(saturation_pressure(500.0).unwrap(), 0.263_889_776e7) < 1e-7);
        assert!(rel(saturation_pressure(600.0).unwrap(), 0.123_443_146e8) < 1e-7);
    }

    #[test]
    fn saturation_temperature_verification() {
        assert!(rel(saturation_temperature(0.1e6).unwrap(), 372.755_919) < 1e-8);
        assert!(rel(saturation_temperature(1.0e6).unwrap(), 453.035_632) < 1e-8);
        assert!(rel(saturation_temperature(10.0e6).unwrap(), 584.149_488) < 1e-8);
    }

    #[test]
    fn saturation_pair_is_consistent() {
        for &t in &[280.0, 350.0, 450.0, 550.0, 620.0, 640.0] {
            let p = saturation_pressure(t).unwrap();
            let back = saturation_temperature(p).unwrap();
            assert!((back - t).abs() < 1e-6, "T={t} back={back}");
        }
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        assert!(saturation_pressure(700.0).is_err());
        assert!(saturation_temperature(30.0e6).is_err());
        assert!(saturation_temperature(-1.0).is_err());
    }

    #[test]
    fn auxiliary_densities_near_350c() {
        let t = 623.15;
        assert!((auxiliary_liquid_density(t).unwrap() - 574.7).abs() < 1.0);
        assert!((auxiliary_vapor_density(t).unwrap() - 113.6).abs() < 1.0);
    }

    #[test]
    fn saturated_phases_at_normal_boiling_point() {
        let t = 373.124;
        let liq = saturated_liquid(t).unwrap();
        let vap = saturated_vapor(t).unwrap();
        assert!((liq.rho - 958.4).abs() < 0.5, "rho_f = {}", liq.rho);
        assert!((liq.h - 419.1e3).abs() < 1.0e3, "h_f = {}", liq.h);
        assert!((vap.h - 2675.6e3).abs() < 1.0e3, "h_g = {}", vap.h);
        assert!(vap.rho < 1.0);
    }

    #[test]
    fn latent_heat_positive_up_to_critical() {
        for &t in &[300.0, 400.0, 500.0, 600.0, 630.0, 645.0] {
            let liq = saturated_liquid(t).unwrap();
            let vap = saturated_vapor(t).unwrap();
            assert!(vap.h > liq.h, "T={t}");
            assert!(liq.rho > vap.rho, "T={t}");
        }
    }
}
