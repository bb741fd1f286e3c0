//! sp-core: shared foundation for the steam property workspace.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real, tolerances, finite-difference step helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
