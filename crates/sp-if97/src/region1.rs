//! Region 1: compressed liquid.
//!
//! Dimensionless Gibbs free energy γ(π, τ) with π = p / 16.53 MPa and
//! τ = 1386 K / T.

use crate::{If97Result, R, check_positive, check_result};

const P_STAR: f64 = 16.53e6;
const T_STAR: f64 = 1386.0;

// (I, J, n)
const COEFFS: [(i32, i32, f64); 34] = [
    (0, -2, 0.146_329_712_131_67),
    (0, -1, -0.845_481_871_691_14),
    (0, 0, -3.756_360_367_204),
    (0, 1, 3.385_516_916_838_5),
    (0, 2, -0.957_919_633_878_72),
    (0, 3, 0.157_720_385_132_28),
    (0, 4, -0.016_616_417_199_501),
    (0, 5, 8.121_462_998_356_8e-4),
    (1, -9, 2.831_908_012_380_4e-4),
    (1, -7, -6.070_630_156_587_4e-4),
    (1, -1, -0.018_990_068_218_419),
    (1, 0, -0.032_529_748_770_505),
    (1, 1, -0.021_841_717_175_414),
    (1, 3, -5.283_835_796_993e-5),
    (2, -3, -4.718_432_107_326_7e-4),
    (2, 0, -3.000_178_079_302_6e-4),
    (2, 1, 4.766_139_390_698_7e-5),
    (2, 3, -4.414_184_533_084_6e-6),
    (2, 17, -7.269_499_629_759_4e-16),
    (3, -4, -3.167_964_484_505_4e-5),
    (3, 0, -2.827_079_798_531_2e-6),
    (3, 6, -8.520_512_812_010_3e-10),
    (4, -5, -2.242_528_190_8e-6),
    (4, -2, -6.517_122_289_560_1e-7),
    (4, 10, -1.434_172_993_792_4e-13),
    (5, -8, -4.051_699_686_011_7e-7),
    (8, -11, -1.273_430_174_164_1e-9),
    (8, -6, -1.742_487_123_063_4e-10),
    (21, -29, -6.876_213_129_553_1e-19),
    (23, -31, 1.447_830_782_852_1e-20),
    (29, -38, 2.633_578_166_279_5e-23),
    (30, -39, -1.194_762_264_007_1e-23),
    (31, -40, 1.822_809_458_140_4e-24),
    (32, -41, -9.353_708_729_245_8e-26),
];

/// γ and its first and second partial derivatives at one (p, T).
#[derive(Debug, Clone, Copy)]
struct Gibbs {
    pi: f64,
    tau: f64,
    g: f64,
    g_pi: f64,
    g_pipi: f64,
    g_tau: f64,
    g_tautau: f64,
    g_pitau: f64,
}

impl Gibbs {
    fn at(p: f64, t: f64) -> If97Result<Self> {
        check_positive("region 1 pressure", p)?;
        check_positive("region 1 temperature", t)?;
        let pi = p / P_STAR;
        let tau = T_STAR / t;
        let a = 7.1 - pi;
        let b = tau - 1.222;

        let mut out = Self {
            pi,
            tau,
            g: 0.0,
            g_pi: 0.0,
            g_pipi: 0.0,
            g_tau: 0.0,
            g_tautau: 0.0,
            g_pitau: 0.0,
        };
        for &(i, j, n) in COEFFS.iter() {
            let (fi, fj) = (f64::from(i), f64::from(j));
            let ai = a.powi(i);
            let bj = b.powi(j);
            out.g += n * ai * bj;
            out.g_pi -= n * fi * a.powi(i - 1) * bj;
            out.g_pipi += n * fi * (fi - 1.0) * a.powi(i - 2) * bj;
            out.g_tau += n * ai * fj * b.powi(j - 1);
            out.g_tautau += n * ai * fj * (fj - 1.0) * b.powi(j - 2);
            out.g_pitau -= n * fi * a.powi(i - 1) * fj * b.powi(j - 1);
        }
        Ok(out)
    }
}

/// Specific volume [m³/kg].
pub fn specific_volume(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result("region 1 specific volume", R * t * g.pi * g.g_pi / p)
}

/// Specific enthalpy [J/kg].
pub fn enthalpy(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result("region 1 enthalpy", R * t * g.tau * g.g_tau)
}

/// Specific entropy [J/(kg·K)].
pub fn entropy(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result("region 1 entropy", R * (g.tau * g.g_tau - g.g))
}

/// Isobaric heat capacity [J/(kg·K)].
pub fn cp(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result("region 1 cp", -R * g.tau * g.tau * g.g_tautau)
}

/// Isochoric heat capacity [J/(kg·K)].
pub fn cv(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    let cross = g.g_pi - g.tau * g.g_pitau;
    check_result(
        "region 1 cv",
        R * (-g.tau * g.tau * g.g_tautau + cross * cross / g.g_pipi),
    )
}

/// Isothermal compressibility κ_T = -(1/v)(∂v/∂p)_T [1/Pa].
pub fn isothermal_compressibility(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 1 isothermal compressibility",
        -(1.0 / p) * g.pi * g.g_pipi / g.g_pi,
    )
}

/// Isobaric cubic expansion coefficient α_v = (1/v)(∂v/∂T)_p [1/K].
pub fn expansion_coefficient(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 1 expansion coefficient",
        (1.0 - g.tau * g.g_pitau / g.g_pi) / t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn verification_table_300k_3mpa() {
        let (p, t) = (3.0e6, 300.0);
        assert!(rel(specific_volume(p, t).unwrap(), 0.100_215_168e-2) < 1e-7);
        assert!(rel(enthalpy(p, t).unwrap(), 115.331_273e3) < 1e-7);
        assert!(rel(entropy(p, t).unwrap(), 0.392_294_792e3) < 1e-7);
        assert!(rel(cp(p, t).unwrap(), 4.173_012_18e3) < 1e-7);
    }

    #[test]
    fn verification_table_300k_80mpa() {
        let (p, t) = (80.0e6, 300.0);
        assert!(rel(specific_volume(p, t).unwrap(), 0.971_180_894e-3) < 1e-7);
        assert!(rel(enthalpy(p, t).unwrap(), 184.142_828e3) < 1e-7);
        assert!(rel(cp(p, t).unwrap(), 4.010_089_87e3) < 1e-7);
    }

    #[test]
    fn verification_table_500k_3mpa() {
        let (p, t) = (3.0e6, 500.0);
        assert!(rel(specific_volume(p, t).unwrap(), 0.120_241_800e-2) < 1e-7);
        assert!(rel(enthalpy(p, t).unwrap(), 975.542_239e3) < 1e-7);
        assert!(rel(entropy(p, t).unwrap(), 2.580_419_12e3) < 1e-7);
        assert!(rel(cp(p, t).unwrap(), 4.655_806_82e3) < 1e-7);
    }

    #[test]
    fn cv_below_cp() {
        let (p, t) = (3.0e6, 500.0);
        let cv = cv(p, t).unwrap();
        assert!(cv > 0.0 && cv < cp(p, t).unwrap());
    }

    #[test]
    fn compressibility_matches_volume_difference() {
        let (p, t) = (3.0e6, 400.0);
        let dp = 1.0e3;
        let v = specific_volume(p, t).unwrap();
        let dv = specific_volume(p + dp, t).unwrap() - specific_volume(p - dp, t).unwrap();
        let kappa_fd = -dv / (2.0 * dp) / v;
        let kappa = isothermal_compressibility(p, t).unwrap();
        assert!(rel(kappa, kappa_fd) < 1e-5, "{kappa} vs {kappa_fd}");
    }

    #[test]
    fn expansion_matches_volume_difference() {
        let (p, t) = (3.0e6, 400.0);
        let dt = 1.0e-3;
        let v = specific_volume(p, t).unwrap();
        let dv = specific_volume(p, t + dt).unwrap() - specific_volume(p, t - dt).unwrap();
        let alpha_fd = dv / (2.0 * dt) / v;
        let alpha = expansion_coefficient(p, t).unwrap();
        assert!(rel(alpha, alpha_fd) < 1e-5, "{alpha} vs {alpha_fd}");
    }

    #[test]
    fn rejects_non_positive_pressure() {
        assert!(enthalpy(0.0, 300.0).is_err());
        assert!(enthalpy(f64::NAN, 300.0).is_err());
    }
}
