//! Region 3: near-critical states.
//!
//! Helmholtz free energy φ(δ, τ) with δ = ρ / ρc and τ = Tc / T. The natural
//! variables are (ρ, T); [`density`] resolves ρ from (p, T) by a directional
//! scan of the isotherm followed by bisection.

use crate::{If97Error, If97Result, P_MAX, R, RHO_CRIT, T_B23_MIN, T_CRIT};
use crate::{check_positive, check_result, region1, region4};

// First entry is the coefficient of ln δ; the rest are (I, J, n).
const N1: f64 = 1.065_807_002_851_3;
const COEFFS: [(i32, i32, f64); 39] = [
    (0, 0, -15.732_845_290_239),
    (0, 1, 20.944_396_974_307),
    (0, 2, -7.686_770_787_871_6),
    (0, 7, 2.618_594_778_795_4),
    (0, 10, -2.808_078_114_862),
    (0, 12, 1.205_336_969_651_7),
    (0, 23, -8.456_681_281_250_2e-3),
    (1, 2, -1.265_431_547_771_4),
    (1, 6, -1.152_440_780_668_1),
    (1, 15, 0.885_210_439_843_18),
    (1, 17, -0.642_077_651_816_07),
    (2, 0, 0.384_934_601_866_71),
    (2, 2, -0.852_147_088_242_06),
    (2, 6, 4.897_228_154_187_7),
    (2, 7, -3.050_261_725_696_5),
    (2, 22, 0.039_420_536_879_154),
    (2, 26, 0.125_584_084_243_08),
    (3, 0, -0.279_993_296_987_1),
    (3, 2, 1.389_979_956_946),
    (3, 4, -2.018_991_502_357),
    (3, 16, -8.214_763_717_396_3e-3),
    (3, 26, -0.475_960_357_349_23),
    (4, 0, 0.043_984_074_473_5),
    (4, 2, -0.444_764_354_287_39),
    (4, 4, 0.905_720_707_197_33),
    (4, 26, 0.705_224_500_879_67),
    (5, 1, 0.107_705_126_263_32),
    (5, 3, -0.329_136_232_589_54),
    (5, 26, -0.508_710_620_411_58),
    (6, 0, -0.022_175_400_873_096),
    (6, 2, 0.094_260_751_665_092),
    (6, 26, 0.164_362_784_479_61),
    (7, 2, -0.013_503_372_241_348),
    (8, 26, -0.014_834_345_352_472),
    (9, 2, 5.792_295_362_808_4e-4),
    (9, 26, 3.230_890_470_371_1e-3),
    (10, 0, 8.096_480_299_621_5e-5),
    (10, 1, -1.655_767_979_503_7e-4),
    (11, 26, -4.492_389_906_181_5e-5),
];

/// Density scan limits and step for the (p, T) → ρ root search [kg/m³].
const SCAN_LOW: f64 = 1.0;
const SCAN_HIGH: f64 = 1100.0;
const SCAN_STEP: f64 = 5.0;
/// Head room above the region-1 density at 623.15 K where the liquid scan starts.
const LIQUID_SCAN_MARGIN: f64 = 0.03;
const BISECT_MAX_ITER: usize = 100;

/// Which root of a subcritical isotherm to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Densest root; scanned downward from just above the region-1 density
    /// on the same isobar at 623.15 K.
    Liquid,
    /// Lightest root; scanned upward from dilute densities.
    Vapor,
}

impl Branch {
    /// Branch of a region-3 state given by (p, T).
    ///
    /// Below the critical temperature a pressure at or above saturation picks
    /// the liquid branch; above it the isotherm is monotone and either works.
    pub fn for_state(p: f64, t: f64) -> If97Result<Self> {
        if t < T_CRIT && p < region4::saturation_pressure(t)? {
            Ok(Branch::Vapor)
        } else if t < T_CRIT {
            Ok(Branch::Liquid)
        } else {
            Ok(Branch::Vapor)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Helmholtz {
    delta: f64,
    tau: f64,
    phi: f64,
    phi_d: f64,
    phi_dd: f64,
    phi_t: f64,
    phi_tt: f64,
    phi_dt: f64,
}

impl Helmholtz {
    fn at(rho: f64, t: f64) -> If97Result<Self> {
        check_positive("region 3 density", rho)?;
        check_positive("region 3 temperature", t)?;
        let delta = rho / RHO_CRIT;
        let tau = T_CRIT / t;

        let mut out = Self {
            delta,
            tau,
            phi: N1 * delta.ln(),
            phi_d: N1 / delta,
            phi_dd: -N1 / (delta * delta),
            phi_t: 0.0,
            phi_tt: 0.0,
            phi_dt: 0.0,
        };
        for &(i, j, n) in COEFFS.iter() {
            let (fi, fj) = (f64::from(i), f64::from(j));
            let di = delta.powi(i);
            let di1 = delta.powi(i - 1);
            let tj = tau.powi(j);
            let tj1 = tau.powi(j - 1);
            out.phi += n * di * tj;
            out.phi_d += n * fi * di1 * tj;
            out.phi_dd += n * fi * (fi - 1.0) * delta.powi(i - 2) * tj;
            out.phi_t += n * di * fj * tj1;
            out.phi_tt += n * di * fj * (fj - 1.0) * tau.powi(j - 2);
            out.phi_dt += n * fi * di1 * fj * tj1;
        }
        Ok(out)
    }

    fn pressure(&self, rho: f64, t: f64) -> f64 {
        rho * R * t * self.delta * self.phi_d
    }
}

/// Pressure [Pa].
pub fn pressure(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    let p = check_result("region 3 pressure", f.pressure(rho, t))?;
    if p <= 0.0 {
        return Err(If97Error::InvalidIntermediate {
            what: "region 3 pressure",
        });
    }
    Ok(p)
}

/// Specific enthalpy [J/kg].
pub fn enthalpy(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    check_result(
        "region 3 enthalpy",
        R * t * (f.tau * f.phi_t + f.delta * f.phi_d),
    )
}

/// Specific entropy [J/(kg·K)].
pub fn entropy(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    check_result("region 3 entropy", R * (f.tau * f.phi_t - f.phi))
}

/// Isobaric heat capacity [J/(kg·K)].
pub fn cp(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    let num = f.delta * f.phi_d - f.delta * f.tau * f.phi_dt;
    let den = 2.0 * f.delta * f.phi_d + f.delta * f.delta * f.phi_dd;
    check_result(
        "region 3 cp",
        R * (-f.tau * f.tau * f.phi_tt + num * num / den),
    )
}

/// Isochoric heat capacity [J/(kg·K)].
pub fn cv(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    check_result("region 3 cv", -R * f.tau * f.tau * f.phi_tt)
}

/// (∂p/∂ρ)_T [Pa·m³/kg].
pub fn dp_drho(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    check_result(
        "region 3 dp/drho",
        R * t * (2.0 * f.delta * f.phi_d + f.delta * f.delta * f.phi_dd),
    )
}

/// (∂p/∂T)_ρ [Pa/K].
pub fn dp_dt(rho: f64, t: f64) -> If97Result<f64> {
    let f = Helmholtz::at(rho, t)?;
    check_result(
        "region 3 dp/dT",
        rho * R * (f.delta * f.phi_d - f.delta * f.tau * f.phi_dt),
    )
}

/// Density [kg/m³] of the region-3 state at (p, T) on the given branch.
pub fn density(p: f64, t: f64, branch: Branch) -> If97Result<f64> {
    check_positive("region 3 pressure", p)?;
    check_positive("region 3 temperature", t)?;

    let residual = |rho: f64| -> If97Result<f64> {
        let f = Helmholtz::at(rho, t)?;
        check_result("region 3 pressure residual", f.pressure(rho, t) - p)
    };

    let (start, step) = match branch {
        Branch::Liquid => (liquid_scan_start(p)?, -SCAN_STEP),
        Branch::Vapor => (SCAN_LOW, SCAN_STEP),
    };

    let mut a = start;
    let mut fa = residual(a)?;
    if fa == 0.0 {
        return Ok(a);
    }
    loop {
        let b = a + step;
        if !(SCAN_LOW..=SCAN_HIGH).contains(&b) {
            return Err(If97Error::NoDensityRoot { p, t });
        }
        let fb = residual(b)?;
        if fb == 0.0 {
            return Ok(b);
        }
        if fa.signum() != fb.signum() {
            return bisect(residual, a, fa, b, p, t);
        }
        a = b;
        fa = fb;
    }
}

/// Upper density for the liquid scan on isobar `p`.
///
/// Region 3 is bounded below by 623.15 K, so no region-3 liquid root is denser
/// than region 1 at (p, 623.15 K). Above that the Helmholtz pressure leaves its
/// range of validity and turns back through the target.
fn liquid_scan_start(p: f64) -> If97Result<f64> {
    let rho1 = 1.0 / region1::specific_volume(p.min(P_MAX), T_B23_MIN)?;
    Ok((rho1 * (1.0 + LIQUID_SCAN_MARGIN)).min(SCAN_HIGH))
}

fn bisect<F>(residual: F, mut a: f64, mut fa: f64, mut b: f64, p: f64, t: f64) -> If97Result<f64>
where
    F: Fn(f64) -> If97Result<f64>,
{
    let tol_p = 1e-10 * p;
    for _ in 0..BISECT_MAX_ITER {
        let mid = 0.5 * (a + b);
        let fm = residual(mid)?;
        if fm.abs() <= tol_p || (b - a).abs() <= 1e-12 * mid {
            return Ok(mid);
        }
        if fm.signum() == fa.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    Err(If97Error::NoDensityRoot { p, t })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn verification_table_500_650() {
        let (rho, t) = (500.0, 650.0);
        assert!(rel(pressure(rho, t).unwrap(), 25.583_701_8e6) < 1e-7);
        assert!(rel(enthalpy(rho, t).unwrap(), 1863.430_19e3) < 1e-7);
        assert!(rel(entropy(rho, t).unwrap(), 4.054_272_73e3) < 1e-7);
        assert!(rel(cp(rho, t).unwrap(), 13.893_571_7e3) < 1e-7);
    }

    #[test]
    fn verification_table_200_650() {
        let (rho, t) = (200.0, 650.0);
        assert!(rel(pressure(rho, t).unwrap(), 22.293_064_3e6) < 1e-7);
        assert!(rel(enthalpy(rho, t).unwrap(), 2375.124_01e3) < 1e-7);
    }

    #[test]
    fn verification_table_500_750() {
        let (rho, t) = (500.0, 750.0);
        assert!(rel(pressure(rho, t).unwrap(), 78.309_563_9e6) < 1e-7);
        assert!(rel(enthalpy(rho, t).unwrap(), 2258.688_45e3) < 1e-7);
    }

    #[test]
    fn density_recovers_verification_point() {
        let rho = density(25.583_701_8e6, 650.0, Branch::Vapor).unwrap();
        assert!(rel(rho, 500.0) < 1e-6, "rho = {rho}");
    }

    #[test]
    fn liquid_branch_on_subcritical_isotherm() {
        let t = 640.0;
        let p = 25.0e6;
        assert_eq!(Branch::for_state(p, t).unwrap(), Branch::Liquid);
        let rho = density(p, t, Branch::Liquid).unwrap();
        assert!((rho - 557.95).abs() < 0.1, "rho = {rho}");
        assert!(rel(pressure(rho, t).unwrap(), p) < 1e-8);
        assert!(dp_drho(rho, t).unwrap() > 0.0);
    }

    #[test]
    fn liquid_branch_just_above_saturation_near_623k() {
        let t = 628.28;
        let p = 17.6e6;
        assert!(p > region4::saturation_pressure(t).unwrap());
        let rho = density(p, t, Branch::Liquid).unwrap();
        assert!((rho - 552.58).abs() < 0.1, "rho = {rho}");
        let h = enthalpy(rho, t).unwrap();
        assert!((h - 1.7149e6).abs() < 1.0e3, "h = {h}");
    }

    #[test]
    fn liquid_branch_at_pressure_limit() {
        let rho = density(100.0e6, 647.005, Branch::Liquid).unwrap();
        assert!((rho - 730.34).abs() < 0.1, "rho = {rho}");
        assert!(dp_drho(rho, 647.005).unwrap() > 0.0);
        assert!(cp(rho, 647.005).unwrap() > 0.0);
    }

    #[test]
    fn liquid_scan_start_sits_above_region1_density() {
        let rho1 = 1.0 / region1::specific_volume(40.0e6, T_B23_MIN).unwrap();
        let start = liquid_scan_start(40.0e6).unwrap();
        assert!(start > rho1 && start < 1.05 * rho1);
        assert!(liquid_scan_start(1.0e9).unwrap() <= SCAN_HIGH);
    }

    #[test]
    fn vapor_branch_below_saturation() {
        let t = 640.0;
        let p = 19.0e6;
        assert_eq!(Branch::for_state(p, t).unwrap(), Branch::Vapor);
        let rho = density(p, t, Branch::Vapor).unwrap();
        assert!(rho < RHO_CRIT, "rho = {rho}");
        assert!(rel(pressure(rho, t).unwrap(), p) < 1e-8);
    }

    #[test]
    fn analytic_slopes_match_differences() {
        let (rho, t) = (500.0, 700.0);
        let dr = 1e-3;
        let fd = (pressure(rho + dr, t).unwrap() - pressure(rho - dr, t).unwrap()) / (2.0 * dr);
        assert!(rel(dp_drho(rho, t).unwrap(), fd) < 1e-6);
        let dt = 1e-4;
        let fd = (pressure(rho, t + dt).unwrap() - pressure(rho, t - dt).unwrap()) / (2.0 * dt);
        assert!(rel(dp_dt(rho, t).unwrap(), fd) < 1e-6);
    }
}
