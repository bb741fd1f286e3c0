//! Correlation errors.

use thiserror::Error;

/// Result type for correlation evaluations.
pub type If97Result<T> = Result<T, If97Error>;

/// Errors raised while evaluating an IF97 correlation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum If97Error {
    /// Input was NaN or infinite.
    #[error("Non-finite input for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Input outside the domain of the correlation.
    #[error("Input out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// An intermediate or final value was non-finite or non-physical.
    #[error("Invalid intermediate value in {what}")]
    InvalidIntermediate { what: &'static str },

    /// Density root search failed.
    #[error("No density root found for p={p} Pa, T={t} K")]
    NoDensityRoot { p: f64, t: f64 },
}
