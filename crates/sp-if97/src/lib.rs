//! sp-if97: IAPWS-IF97 correlations for water and steam.
//!
//! Pure functions of the natural variables of each region, all in SI units:
//! pressure in Pa, temperature in K, density in kg/m³, specific enthalpy and
//! entropy in J/kg and J/(kg·K).
//!
//! - [`region1`]: compressed liquid, Gibbs free energy in (p, T)
//! - [`region2`]: superheated vapor, Gibbs free energy in (p, T)
//! - [`region3`]: near-critical region, Helmholtz free energy in (ρ, T)
//! - [`region4`]: saturation line, saturated-phase properties
//! - [`boundary`]: B23 boundary and (p, T) region classification
//! - [`transport`]: density-based viscosity and thermal conductivity
//!
//! # Example
//!
//! ```
//! use sp_if97::{boundary, region1, Region};
//!
//! let region = boundary::region_pt(1.0e5, 300.0).unwrap();
//! assert_eq!(region, Region::One);
//! let rho = 1.0 / region1::specific_volume(1.0e5, 300.0).unwrap();
//! assert!((rho - 996.5).abs() < 0.5);
//! ```

pub mod boundary;
pub mod error;
pub mod region1;
pub mod region2;
pub mod region3;
pub mod region4;
pub mod transport;

pub use boundary::Region;
pub use error::{If97Error, If97Result};

/// Specific gas constant of water [J/(kg·K)].
pub const R: f64 = 461.526;

/// Critical temperature [K].
pub const T_CRIT: f64 = 647.096;

/// Critical pressure [Pa].
pub const P_CRIT: f64 = 22.064e6;

/// Critical density [kg/m³].
pub const RHO_CRIT: f64 = 322.0;

/// Upper pressure limit of the formulation for T up to 1073.15 K [Pa].
pub const P_MAX: f64 = 100.0e6;

/// Lowest temperature of the B23 boundary; regions 1/2 only below it [K].
pub const T_B23_MIN: f64 = 623.15;

pub(crate) fn check_finite(what: &'static str, value: f64) -> If97Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(If97Error::NonFinite { what, value })
    }
}

pub(crate) fn check_positive(what: &'static str, value: f64) -> If97Result<f64> {
    check_finite(what, value)?;
    if value <= 0.0 {
        return Err(If97Error::OutOfRange { what, value });
    }
    Ok(value)
}

pub(crate) fn check_result(what: &'static str, value: f64) -> If97Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(If97Error::InvalidIntermediate { what })
    }
}
