//! Thermodynamic state definitions.

use sp_core::units::{Pressure, Temperature, k, pa};
use std::fmt;

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEntropy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Phase region of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Compressed liquid (IF97 region 1).
    Liquid,
    /// Superheated vapor (IF97 region 2).
    Vapor,
    /// Near-critical and supercritical states (IF97 region 3).
    Supercritical,
    /// Liquid-vapor mixture under the dome (IF97 region 4).
    TwoPhase,
}

impl Region {
    pub fn is_single_phase(self) -> bool {
        !matches!(self, Region::TwoPhase)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Region::Liquid => "liquid",
            Region::Vapor => "vapor",
            Region::Supercritical => "supercritical",
            Region::TwoPhase => "two-phase",
        };
        f.write_str(label)
    }
}

/// Immutable snapshot of one evaluated point.
///
/// Each variant carries the natural independent pair of its region, so the
/// oracle can answer every property without re-solving anything. Snapshots
/// are built fresh per query and never shared between queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermoState {
    /// Region 1, natural variables (p, T).
    Liquid { p: f64, t: f64 },
    /// Region 2, natural variables (p, T).
    Vapor { p: f64, t: f64 },
    /// Region 3, natural variables (ρ, T); `p` is the query pressure.
    Supercritical { rho: f64, t: f64, p: f64 },
    /// Region 4 at T = Tsat(p) with vapor mass fraction `x`.
    TwoPhase { p: f64, t: f64, x: f64 },
}

impl ThermoState {
    pub fn region(&self) -> Region {
        match self {
            ThermoState::Liquid { .. } => Region::Liquid,
            ThermoState::Vapor { .. } => Region::Vapor,
            ThermoState::Supercritical { .. } => Region::Supercritical,
            ThermoState::TwoPhase { .. } => Region::TwoPhase,
        }
    }

    /// Pressure [Pa] as a raw SI value.
    pub fn p(&self) -> f64 {
        match *self {
            ThermoState::Liquid { p, .. }
            | ThermoState::Vapor { p, .. }
            | ThermoState::Supercritical { p, .. }
            | ThermoState::TwoPhase { p, .. } => p,
        }
    }

    /// Temperature [K] as a raw SI value.
    pub fn t(&self) -> f64 {
        match *self {
            ThermoState::Liquid { t, .. }
            | ThermoState::Vapor { t, .. }
            | ThermoState::Supercritical { t, .. }
            | ThermoState::TwoPhase { t, .. } => t,
        }
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.p())
    }

    pub fn temperature(&self) -> Temperature {
        k(self.t())
    }
}
