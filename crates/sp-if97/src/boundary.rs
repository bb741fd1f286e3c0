//! Region boundaries.

use crate::{If97Result, T_B23_MIN, check_positive, check_result, region4};

const B23: [f64; 5] = [
    0.348_051_856_289_69e3,
    -0.116_718_598_799_75e1,
    0.101_929_700_393_26e-2,
    0.572_544_598_627_46e3,
    0.139_188_397_788_70e2,
];

/// Single-phase IF97 region of a (p, T) point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Compressed liquid.
    One,
    /// Superheated vapor.
    Two,
    /// Near-critical states above the B23 boundary.
    Three,
}

/// Pressure on the region 2/3 boundary [Pa] at temperature `t` [K].
pub fn b23_pressure(t: f64) -> If97Result<f64> {
    check_positive("B23 temperature", t)?;
    check_result("B23 pressure", (B23[0] + B23[1] * t + B23[2] * t * t) * 1.0e6)
}

/// Temperature on the region 2/3 boundary [K] at pressure `p` [Pa].
pub fn b23_temperature(p: f64) -> If97Result<f64> {
    check_positive("B23 pressure", p)?;
    let pi = p / 1.0e6;
    check_result(
        "B23 temperature",
        B23[3] + ((pi - B23[4]) / B23[2]).max(0.0).sqrt(),
    )
}

/// Classify a (p, T) point.
///
/// A point exactly on the saturation line is reported as liquid.
pub fn region_pt(p: f64, t: f64) -> If97Result<Region> {
    check_positive("pressure", p)?;
    check_positive("temperature", t)?;
    if t <= T_B23_MIN {
        if p >= region4::saturation_pressure(t)? {
            Ok(Region::One)
        } else {
            Ok(Region::Two)
        }
    } else if p > b23_pressure(t)? {
        Ok(Region::Three)
    } else {
        Ok(Region::Two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b23_verification_point() {
        let p = b23_pressure(623.15).unwrap();
        assert!(((p - 16.529_164_3e6) / 16.529_164_3e6).abs() < 1e-8);
        let t = b23_temperature(16.529_164_3e6).unwrap();
        assert!((t - 623.15).abs() < 1e-5);
    }

    #[test]
    fn classification_examples() {
        assert_eq!(region_pt(1.0e5, 300.0).unwrap(), Region::One);
        assert_eq!(region_pt(1.0e5, 400.0).unwrap(), Region::Two);
        assert_eq!(region_pt(25.0e6, 650.0).unwrap(), Region::Three);
        assert_eq!(region_pt(10.0e6, 700.0).unwrap(), Region::Two);
        assert_eq!(region_pt(50.0e6, 1000.0).unwrap(), Region::Two);
    }

    #[test]
    fn saturation_tie_goes_to_liquid() {
        let t = 450.0;
        let psat = region4::saturation_pressure(t).unwrap();
        assert_eq!(region_pt(psat, t).unwrap(), Region::One);
    }
}
