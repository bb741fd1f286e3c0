//! Transport properties as functions of (ρ, T).
//!
//! Viscosity follows the IAPWS 1985 formulation without the critical
//! enhancement; thermal conductivity follows the IAPWS 1985 simplified
//! industrial equation. Both are evaluated over the whole (ρ, T) envelope of
//! the property engine without range rejection.

use crate::{If97Result, check_positive, check_result};

// Viscosity reducing parameters
const MU_T_STAR: f64 = 647.226;
const MU_RHO_STAR: f64 = 317.763;
const MU_STAR: f64 = 55.071e-6;

const MU0: [f64; 4] = [1.0, 0.978_197, 0.579_829, -0.202_354];

// H[i][j]: i indexes (1/T̄ - 1)^i, j indexes (ρ̄ - 1)^j
const MU1: [[f64; 7]; 6] = [
    [0.513_204_7, 0.215_177_8, -0.281_810_7, 0.177_806_4, -0.041_766_1, 0.0, 0.0],
    [0.320_565_6, 0.731_788_3, -1.070_786, 0.460_504, 0.0, -0.015_783_86, 0.0],
    [0.0, 1.241_044, -1.263_184, 0.234_037_9, 0.0, 0.0, 0.0],
    [0.0, 1.476_783, 0.0, -0.492_417_9, 0.160_043_5, 0.0, -0.003_629_481],
    [-0.778_256_7, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.188_544_7, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

// Thermal conductivity reducing parameters
const K_T_STAR: f64 = 647.26;
const K_RHO_STAR: f64 = 317.7;

/// Dynamic viscosity [Pa·s].
pub fn viscosity(rho: f64, t: f64) -> If97Result<f64> {
    check_positive("viscosity density", rho)?;
    check_positive("viscosity temperature", t)?;
    let tr = t / MU_T_STAR;
    let dr = rho / MU_RHO_STAR;

    let mu0 = tr.sqrt() / (MU0[0] + MU0[1] / tr + MU0[2] / (tr * tr) + MU0[3] / (tr * tr * tr));

    let x = 1.0 / tr - 1.0;
    let y = dr - 1.0;
    let mut sum = 0.0;
    let mut xi = 1.0;
    for row in MU1.iter() {
        let mut yj = 1.0;
        for &h in row.iter() {
            sum += h * xi * yj;
            yj *= y;
        }
        xi *= x;
    }
    let mu1 = (dr * sum).exp();

    check_result("viscosity", MU_STAR * mu0 * mu1)
}

/// Thermal conductivity [W/(m·K)].
pub fn thermal_conductivity(rho: f64, t: f64) -> If97Result<f64> {
    check_positive("conductivity density", rho)?;
    check_positive("conductivity temperature", t)?;
    let tr = t / K_T_STAR;
    let dr = rho / K_RHO_STAR;

    let k0 = tr.sqrt()
        * (0.010_281_1 + 0.029_962_1 * tr + 0.015_614_6 * tr * tr - 0.004_224_64 * tr * tr * tr);
    let k1 = -0.397_07 + 0.400_302 * dr + 1.06 * (-0.171_587 * (dr + 2.392_19).powi(2)).exp();

    let dt = (tr - 1.0).abs() + 0.003_089_76;
    let q = 2.0 + 0.082_299_4 / dt.powf(0.6);
    let s = if tr >= 1.0 {
        1.0 / dt
    } else {
        10.093_2 / dt.powf(0.6)
    };
    let k2 = (0.070_130_9 / tr.powi(10) + 0.011_852)
        * dr.powf(1.8)
        * (0.642_857 * (1.0 - dr.powf(2.8))).exp()
        + 0.001_699_37 * s * dr.powf(q) * ((q / (1.0 + q)) * (1.0 - dr.powf(1.0 + q))).exp()
        - 1.02 * (-4.117_17 * tr.powf(1.5) - 6.179_37 / dr.powi(5)).exp();

    check_result("thermal conductivity", k0 + k1 + k2)
}
