//! Region 2: superheated vapor.
//!
//! Gibbs free energy split into an ideal-gas part γ⁰ and a residual part γʳ,
//! with π = p / 1 MPa and τ = 540 K / T.

use crate::{If97Result, R, check_positive, check_result};

const P_STAR: f64 = 1.0e6;
const T_STAR: f64 = 540.0;

// Ideal-gas part: (J, n)
const IDEAL: [(i32, f64); 9] = [
    (0, -9.692_768_650_021_7),
    (1, 10.086_655_968_018),
    (-5, -0.005_608_791_128_302),
    (-4, 0.071_452_738_081_455),
    (-3, -0.407_104_982_239_28),
    (-2, 1.424_081_917_144_4),
    (-1, -4.383_951_131_945),
    (2, -0.284_086_324_607_72),
    (3, 0.021_268_463_753_307),
];

// Residual part: (I, J, n)
const RESIDUAL: [(i32, i32, f64); 43] = [
    (1, 0, -1.773_174_247_321_3e-3),
    (1, 1, -0.017_834_862_292_358),
    (1, 2, -0.045_996_013_696_365),
    (1, 3, -0.057_581_259_083_432),
    (1, 6, -0.050_325_278_727_93),
    (2, 1, -3.303_264_167_020_3e-5),
    (2, 2, -1.894_898_751_631_5e-4),
    (2, 4, -3.939_277_724_335_5e-3),
    (2, 7, -0.043_797_295_650_573),
    (2, 36, -2.667_454_791_408_7e-5),
    (3, 0, 2.048_173_769_230_9e-8),
    (3, 1, 4.387_066_728_443_5e-7),
    (3, 3, -3.227_767_723_857e-5),
    (3, 6, -1.503_392_454_214_8e-3),
    (3, 35, -0.040_668_253_562_649),
    (4, 1, -7.884_730_955_936_7e-10),
    (4, 2, 1.279_071_785_228_5e-8),
    (4, 3, 4.822_537_271_850_7e-7),
    (5, 7, 2.292_207_633_766_1e-6),
    (6, 3, -1.671_476_645_106_1e-11),
    (6, 16, -2.117_147_232_135_5e-3),
    (6, 35, -23.895_741_934_104),
    (7, 0, -5.905_956_432_427e-18),
    (7, 11, -1.262_180_889_910_1e-6),
    (7, 25, -0.038_946_842_435_739),
    (8, 8, 1.125_621_136_045_9e-11),
    (8, 36, -8.231_134_089_799_8),
    (9, 13, 1.980_971_280_208_8e-8),
    (10, 4, 1.040_696_521_017_4e-19),
    (10, 10, -1.023_474_709_592_9e-13),
    (10, 14, -1.001_817_937_951_1e-9),
    (16, 29, -8.088_290_864_698_5e-11),
    (16, 50, 0.106_930_318_794_09),
    (18, 57, -0.336_622_505_741_71),
    (20, 20, 8.918_584_535_542_1e-25),
    (20, 35, 3.062_931_687_623_2e-13),
    (20, 48, -4.200_246_769_820_8e-6),
    (21, 21, -5.905_602_968_563_9e-26),
    (22, 53, 3.782_694_761_345_7e-6),
    (23, 39, -1.276_860_893_468_1e-15),
    (24, 26, 7.308_761_059_506_1e-29),
    (24, 40, 5.541_471_535_077_8e-17),
    (24, 58, -9.436_970_724_121e-7),
];

#[derive(Debug, Clone, Copy)]
struct Gibbs {
    pi: f64,
    tau: f64,
    // ideal-gas part
    g0: f64,
    g0_tau: f64,
    g0_tautau: f64,
    // residual part
    gr: f64,
    gr_pi: f64,
    gr_pipi: f64,
    gr_tau: f64,
    gr_tautau: f64,
    gr_pitau: f64,
}

impl Gibbs {
    fn at(p: f64, t: f64) -> If97Result<Self> {
        check_positive("region 2 pressure", p)?;
        check_positive("region 2 temperature", t)?;
        let pi = p / P_STAR;
        let tau = T_STAR / t;
        let b = tau - 0.5;

        let mut out = Self {
            pi,
            tau,
            g0: pi.ln(),
            g0_tau: 0.0,
            g0_tautau: 0.0,
            gr: 0.0,
            gr_pi: 0.0,
            gr_pipi: 0.0,
            gr_tau: 0.0,
            gr_tautau: 0.0,
            gr_pitau: 0.0,
        };
        for &(j, n) in IDEAL.iter() {
            let fj = f64::from(j);
            out.g0 += n * tau.powi(j);
            out.g0_tau += n * fj * tau.powi(j - 1);
            out.g0_tautau += n * fj * (fj - 1.0) * tau.powi(j - 2);
        }
        for &(i, j, n) in RESIDUAL.iter() {
            let (fi, fj) = (f64::from(i), f64::from(j));
            let pi_i = pi.powi(i);
            let pi_i1 = pi.powi(i - 1);
            let bj = b.powi(j);
            let bj1 = b.powi(j - 1);
            out.gr += n * pi_i * bj;
            out.gr_pi += n * fi * pi_i1 * bj;
            out.gr_pipi += n * fi * (fi - 1.0) * pi.powi(i - 2) * bj;
            out.gr_tau += n * pi_i * fj * bj1;
            out.gr_tautau += n * pi_i * fj * (fj - 1.0) * b.powi(j - 2);
            out.gr_pitau += n * fi * pi_i1 * fj * bj1;
        }
        Ok(out)
    }
}

/// Specific volume [m³/kg].
pub fn specific_volume(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 2 specific volume",
        R * t / p * (1.0 + g.pi * g.gr_pi),
    )
}

/// Specific enthalpy [J/kg].
pub fn enthalpy(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result("region 2 enthalpy", R * t * g.tau * (g.g0_tau + g.gr_tau))
}

/// Specific entropy [J/(kg·K)].
pub fn entropy(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 2 entropy",
        R * (g.tau * (g.g0_tau + g.gr_tau) - (g.g0 + g.gr)),
    )
}

/// Isobaric heat capacity [J/(kg·K)].
pub fn cp(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 2 cp",
        -R * g.tau * g.tau * (g.g0_tautau + g.gr_tautau),
    )
}

/// Isochoric heat capacity [J/(kg·K)].
pub fn cv(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    let num = 1.0 + g.pi * g.gr_pi - g.tau * g.pi * g.gr_pitau;
    let den = 1.0 - g.pi * g.pi * g.gr_pipi;
    check_result(
        "region 2 cv",
        R * (-g.tau * g.tau * (g.g0_tautau + g.gr_tautau) - num * num / den),
    )
}

/// Isothermal compressibility κ_T [1/Pa].
pub fn isothermal_compressibility(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 2 isothermal compressibility",
        (1.0 - g.pi * g.pi * g.gr_pipi) / (1.0 + g.pi * g.gr_pi) / p,
    )
}

/// Isobaric cubic expansion coefficient α_v [1/K].
pub fn expansion_coefficient(p: f64, t: f64) -> If97Result<f64> {
    let g = Gibbs::at(p, t)?;
    check_result(
        "region 2 expansion coefficient",
        (1.0 + g.pi * g.gr_pi - g.tau * g.pi * g.gr_pitau) / (1.0 + g.pi * g.gr_pi) / t,
    )
}
