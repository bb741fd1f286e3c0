//! sp-engine: water/steam property engine for pressure-based flow solvers.
//!
//! Provides:
//! - Region oracle trait and its IAPWS-IF97 implementation
//! - Bounds clipping (or strict rejection) of (p, T) inputs
//! - Direct evaluation of the property vector from (p, T)
//! - Temperature inversion from (p, h) with an explicit iteration state machine
//! - Density derivatives ψ = (∂ρ/∂p)_h and (∂ρ/∂h)_p
//! - Parallel batch evaluation of many cells
//!
//! # Architecture
//!
//! The host solver talks to the [`PropertyService`] trait. [`PropertyEngine`]
//! implements it on top of any [`RegionOracle`]; [`If97Oracle`] is the default
//! backend. The engine holds no mutable state and every query builds its own
//! [`ThermoState`] snapshot, so one engine can serve all threads.
//!
//! # Example
//!
//! ```
//! use sp_core::units::{k, pa};
//! use sp_engine::{PropertyEngine, PropertyService, Region};
//!
//! let engine = PropertyEngine::new();
//! let bundle = engine.evaluate_pt(pa(1.0e5), k(300.0)).unwrap();
//! assert_eq!(bundle.region, Region::Liquid);
//!
//! let back = engine.evaluate_ph(pa(1.0e5), bundle.h).unwrap();
//! assert!((back.t.value - 300.0).abs() < 1e-3);
//! ```

pub mod batch;
pub mod bounds;
pub mod config;
pub mod derivative;
pub mod direct;
pub mod engine;
pub mod error;
pub mod if97;
pub mod inverse;
pub mod oracle;
pub mod state;

// Re-exports for ergonomics
pub use bounds::{Bounds, ClipMode, DEFAULT_P_MAX, DEFAULT_P_MIN, T_MAX, T_MIN};
pub use config::{ConfigError, DerivativeConfig, EngineConfig, InversionConfig};
pub use derivative::{Derivatives, DerivativeEstimator};
pub use direct::{DirectEvaluator, PropertySet};
pub use engine::{PropertyBundle, PropertyEngine, PropertyService};
pub use error::{PropertyError, PropertyResult};
pub use if97::If97Oracle;
pub use inverse::{
    Bracket, FailureReason, InverseSolution, InverseSolver, InversionState, Probe, Solution,
    TemperatureInversion,
};
pub use oracle::{RawPartials, RegionOracle};
pub use state::{Region, SpecEnthalpy, SpecEntropy, SpecHeatCapacity, ThermoState};
