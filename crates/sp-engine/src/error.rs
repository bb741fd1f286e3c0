//! Property evaluation errors.

use crate::config::ConfigError;
use crate::inverse::FailureReason;
use sp_core::CoreError;
use thiserror::Error;

/// Result type for property evaluations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors that can occur during a property query.
///
/// Every failure is local to the query that raised it; the engine holds no
/// state that a failed query could corrupt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// Input outside the validity bounds while strict clipping is active.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Non-physical value (non-finite input, non-positive heat capacity, ...).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// The region oracle rejected an evaluation.
    #[error("Oracle error: {message}")]
    Oracle { message: String },

    /// The h → T inversion did not reach its enthalpy tolerance.
    #[error(
        "Temperature inversion failed at p={p} Pa, h={h} J/kg after {iterations} iterations \
         (residual {residual} J/kg): {reason}"
    )]
    ConvergenceFailed {
        p: f64,
        h: f64,
        iterations: usize,
        residual: f64,
        reason: FailureReason,
    },

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Numeric helper failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}
