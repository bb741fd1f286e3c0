//! Temperature from (p, h).
//!
//! Two layers:
//! - [`TemperatureInversion`]: a bracketed, safeguarded Newton iteration on
//!   h(p, T) = h written as an explicit state machine. One call to
//!   [`TemperatureInversion::step`] performs one transition.
//! - [`InverseSolver`]: the (p, h) entry point. It short-circuits the
//!   saturation dome, picks the bracket on the correct side of it, handles
//!   targets outside the bracket and runs the inversion.
//!
//! Convergence is judged on the enthalpy residual only. A failed inversion
//! never hands back its last iterate.

use crate::bounds::{Bounds, ClipMode, T_MAX, T_MIN};
use crate::config::{EngineConfig, InversionConfig};
use crate::direct::DirectEvaluator;
use crate::error::{PropertyError, PropertyResult};
use crate::oracle::RegionOracle;
use crate::state::ThermoState;
use std::fmt;
use tracing::{debug, trace, warn};

/// Offset of the single-phase bracket ends from Tsat [K].
const SATURATION_NUDGE: f64 = 1e-7;

/// Why an inversion gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// `max_iters` probes without meeting the tolerance.
    IterationLimit,
    /// Bracket shrank to machine precision with the residual still too large.
    BracketCollapsed,
    /// Target enthalpy outside the endpoint enthalpies.
    NotBracketed,
    /// The enthalpy probe returned NaN or infinity.
    NonFiniteProbe,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::IterationLimit => "iteration limit reached",
            Self::BracketCollapsed => "bracket collapsed above tolerance",
            Self::NotBracketed => "target enthalpy not bracketed",
            Self::NonFiniteProbe => "non-finite enthalpy probe",
        };
        f.write_str(msg)
    }
}

/// Enthalpy and its temperature slope at one trial temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// h(p, T) [J/kg]
    pub h: f64,
    /// (∂h/∂T)_p = cp [J/(kg·K)]
    pub cp: f64,
}

/// Temperature interval with its endpoint enthalpies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub t_lo: f64,
    pub h_lo: f64,
    pub t_hi: f64,
    pub h_hi: f64,
}

impl Bracket {
    pub fn width(&self) -> f64 {
        self.t_hi - self.t_lo
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.t_lo + self.t_hi)
    }

    pub fn brackets(&self, h: f64) -> bool {
        self.h_lo <= h && h <= self.h_hi
    }

    fn strictly_inside(&self, t: f64) -> bool {
        t > self.t_lo && t < self.t_hi
    }

    fn collapsed(&self) -> bool {
        self.width() <= 4.0 * f64::EPSILON * self.t_hi.abs().max(1.0)
    }

    /// Replace the endpoint on the same side of the target as `h`.
    fn tighten(&mut self, t: f64, h: f64, target: f64) {
        if h < target {
            self.t_lo = t;
            self.h_lo = h;
        } else {
            self.t_hi = t;
            self.h_hi = h;
        }
    }
}

/// Iteration state of one inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InversionState {
    /// Bracket validated, no probe made yet.
    Initializing,
    /// At least one probe made; `iteration` counts probes.
    Iterating {
        iteration: usize,
        t: f64,
        residual: f64,
        slope: f64,
        /// False when the previous Newton step did not halve the residual.
        newton_ok: bool,
        bracket: Bracket,
    },
    Converged {
        t: f64,
        iterations: usize,
        residual: f64,
    },
    Failed {
        reason: FailureReason,
        iterations: usize,
        last_t: f64,
        residual: f64,
    },
}

/// Converged result of an inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Temperature [K]
    pub t: f64,
    pub iterations: usize,
    /// Final enthalpy residual [J/kg]
    pub residual: f64,
}

/// h → T iteration at fixed pressure.
#[derive(Debug, Clone)]
pub struct TemperatureInversion {
    p: f64,
    h_target: f64,
    initial: Bracket,
    config: InversionConfig,
    state: InversionState,
}

impl TemperatureInversion {
    pub fn new(p: f64, h_target: f64, bracket: Bracket, config: InversionConfig) -> Self {
        Self {
            p,
            h_target,
            initial: bracket,
            config,
            state: InversionState::Initializing,
        }
    }

    pub fn state(&self) -> &InversionState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(
            self.state,
            InversionState::Converged { .. } | InversionState::Failed { .. }
        )
    }

    fn accepts(&self, residual: f64) -> bool {
        self.config.tolerances().accepts(residual, self.h_target)
    }

    fn fail(
        &self,
        reason: FailureReason,
        iterations: usize,
        last_t: f64,
        residual: f64,
    ) -> InversionState {
        InversionState::Failed {
            reason,
            iterations,
            last_t,
            residual,
        }
    }

    /// Probe `t`, then either converge or continue on the tightened bracket.
    fn advance<F>(
        &self,
        probe: &mut F,
        t: f64,
        iteration: usize,
        mut bracket: Bracket,
        previous_residual: Option<f64>,
    ) -> PropertyResult<InversionState>
    where
        F: FnMut(f64) -> PropertyResult<Probe>,
    {
        let Probe { h, cp } = probe(t)?;
        if !h.is_finite() {
            return Ok(self.fail(FailureReason::NonFiniteProbe, iteration, t, f64::NAN));
        }
        let residual = h - self.h_target;
        trace!(p = self.p, iteration, t, residual, "inversion step");
        if self.accepts(residual) {
            return Ok(InversionState::Converged {
                t,
                iterations: iteration,
                residual,
            });
        }
        bracket.tighten(t, h, self.h_target);
        let newton_ok = previous_residual.is_none_or(|prev| residual.abs() <= 0.5 * prev.abs());
        Ok(InversionState::Iterating {
            iteration,
            t,
            residual,
            slope: cp,
            newton_ok,
            bracket,
        })
    }

    /// Perform one transition. Oracle errors raised by `probe` propagate.
    pub fn step<F>(&mut self, mut probe: F) -> PropertyResult<&InversionState>
    where
        F: FnMut(f64) -> PropertyResult<Probe>,
    {
        let next = match self.state {
            InversionState::Initializing => self.initialize(&mut probe)?,
            InversionState::Iterating {
                iteration,
                t,
                residual,
                slope,
                newton_ok,
                bracket,
            } => {
                if iteration >= self.config.max_iters {
                    self.fail(FailureReason::IterationLimit, iteration, t, residual)
                } else if bracket.collapsed() {
                    self.fail(FailureReason::BracketCollapsed, iteration, t, residual)
                } else {
                    let newton = t - residual / slope;
                    let usable = newton_ok && slope.is_finite() && slope > 0.0;
                    let candidate = if usable && bracket.strictly_inside(newton) {
                        newton
                    } else {
                        bracket.midpoint()
                    };
                    self.advance(&mut probe, candidate, iteration + 1, bracket, Some(residual))?
                }
            }
            InversionState::Converged { .. } | InversionState::Failed { .. } => self.state,
        };
        self.state = next;
        Ok(&self.state)
    }

    fn initialize<F>(&self, probe: &mut F) -> PropertyResult<InversionState>
    where
        F: FnMut(f64) -> PropertyResult<Probe>,
    {
        let b = self.initial;
        let finite = [b.t_lo, b.t_hi, b.h_lo, b.h_hi].iter().all(|v| v.is_finite());
        if !finite {
            return Ok(self.fail(FailureReason::NonFiniteProbe, 0, b.t_lo, f64::NAN));
        }
        let lo_residual = b.h_lo - self.h_target;
        let hi_residual = b.h_hi - self.h_target;
        if self.accepts(lo_residual) {
            return Ok(InversionState::Converged {
                t: b.t_lo,
                iterations: 0,
                residual: lo_residual,
            });
        }
        if self.accepts(hi_residual) {
            return Ok(InversionState::Converged {
                t: b.t_hi,
                iterations: 0,
                residual: hi_residual,
            });
        }
        if b.t_lo >= b.t_hi || !b.brackets(self.h_target) {
            let (last_t, residual) = if lo_residual.abs() <= hi_residual.abs() {
                (b.t_lo, lo_residual)
            } else {
                (b.t_hi, hi_residual)
            };
            return Ok(self.fail(FailureReason::NotBracketed, 0, last_t, residual));
        }

        let guess = sp_core::secant_point(b.t_lo, b.h_lo, b.t_hi, b.h_hi, self.h_target);
        let t0 = if b.strictly_inside(guess) {
            guess
        } else {
            b.midpoint()
        };
        self.advance(probe, t0, 1, b, None)
    }

    /// Step until converged or failed.
    pub fn run<F>(mut self, mut probe: F) -> PropertyResult<Solution>
    where
        F: FnMut(f64) -> PropertyResult<Probe>,
    {
        while !self.is_done() {
            self.step(&mut probe)?;
        }
        match self.state {
            InversionState::Converged {
                t,
                iterations,
                residual,
            } => Ok(Solution {
                t,
                iterations,
                residual,
            }),
            InversionState::Failed {
                reason,
                iterations,
                last_t,
                residual,
            } => {
                warn!(
                    p = self.p,
                    h = self.h_target,
                    iterations,
                    last_t,
                    residual,
                    %reason,
                    "temperature inversion failed"
                );
                Err(PropertyError::ConvergenceFailed {
                    p: self.p,
                    h: self.h_target,
                    iterations,
                    residual,
                    reason,
                })
            }
            InversionState::Initializing | InversionState::Iterating { .. } => {
                Err(PropertyError::NonPhysical {
                    what: "inversion stopped before a terminal state",
                })
            }
        }
    }
}

/// Resolved (p, h) query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseSolution {
    pub state: ThermoState,
    /// Inversion probes spent; zero for dome and boundary short-circuits.
    pub iterations: usize,
}

/// Saturation data at one subcritical pressure.
#[derive(Debug, Clone, Copy)]
struct Dome {
    t_sat: f64,
    hf: f64,
    hg: f64,
}

/// (p, h) → state through an oracle.
pub struct InverseSolver<'a, O: RegionOracle + ?Sized> {
    oracle: &'a O,
    config: &'a EngineConfig,
}

impl<'a, O: RegionOracle + ?Sized> InverseSolver<'a, O> {
    pub fn new(oracle: &'a O, config: &'a EngineConfig) -> Self {
        Self { oracle, config }
    }

    fn dome(&self, p: f64) -> PropertyResult<Option<Dome>> {
        if p >= self.oracle.critical_pressure() {
            return Ok(None);
        }
        let t_sat = self.oracle.saturation_temperature(p)?;
        if t_sat < T_MIN {
            return Ok(None);
        }
        Ok(Some(Dome {
            t_sat,
            hf: self.oracle.saturated_liquid_enthalpy(t_sat)?,
            hg: self.oracle.saturated_vapor_enthalpy(t_sat)?,
        }))
    }

    fn saturated(&self, p: f64, t_sat: f64, x: f64) -> PropertyResult<InverseSolution> {
        Ok(InverseSolution {
            state: self.oracle.saturated_state(p, t_sat, x)?,
            iterations: 0,
        })
    }

    /// Target beyond T_MIN or T_MAX: pin T there, or report in strict mode.
    fn at_limit(&self, p: f64, h: f64, t_limit: f64) -> PropertyResult<InverseSolution> {
        match self.config.clip_mode {
            ClipMode::Strict => Err(PropertyError::OutOfRange {
                what: "enthalpy",
                value: h,
            }),
            ClipMode::Clip => {
                debug!(p, h, t_limit, "enthalpy beyond temperature bounds, clipped");
                Ok(InverseSolution {
                    state: DirectEvaluator::new(self.oracle).classify(p, t_limit)?,
                    iterations: 0,
                })
            }
        }
    }

    /// Resolve the state at (p, h).
    pub fn solve(&self, p: f64, h: f64) -> PropertyResult<InverseSolution> {
        let p = self
            .config
            .bounds
            .enforce_pressure(self.config.clip_mode, p)?;
        if !h.is_finite() {
            return Err(PropertyError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }

        let dome = self.dome(p)?;
        if let Some(Dome { t_sat, hf, hg }) = dome {
            if hf <= h && h <= hg {
                let x = if hg > hf { (h - hf) / (hg - hf) } else { 0.0 };
                debug!(p, h, t_sat, x, "two-phase state");
                return self.saturated(p, t_sat, x);
            }
        }

        let (t_lo, t_hi) = match dome {
            Some(d) if h < d.hf => (T_MIN, d.t_sat - SATURATION_NUDGE),
            Some(d) => (d.t_sat + SATURATION_NUDGE, T_MAX),
            None => (T_MIN, T_MAX),
        };
        if t_hi <= t_lo {
            return self.at_limit(p, h, T_MIN);
        }

        let direct = DirectEvaluator::new(self.oracle);
        let (h_lo, _) = direct.enthalpy_and_cp(p, t_lo)?;
        let (h_hi, _) = direct.enthalpy_and_cp(p, t_hi)?;

        if h < h_lo {
            return match dome {
                // gap between the vapor dome edge and the first vapor point
                Some(d) if t_lo > d.t_sat => self.saturated(p, d.t_sat, 1.0),
                _ => self.at_limit(p, h, T_MIN),
            };
        }
        if h > h_hi {
            return match dome {
                Some(d) if t_hi < d.t_sat => self.saturated(p, d.t_sat, 0.0),
                _ => self.at_limit(p, h, T_MAX),
            };
        }

        let bracket = Bracket {
            t_lo,
            h_lo,
            t_hi,
            h_hi,
        };
        let solution = TemperatureInversion::new(p, h, bracket, self.config.inversion).run(|t| {
            let (h, cp) = direct.enthalpy_and_cp(p, t)?;
            Ok(Probe { h, cp })
        })?;
        debug_assert!(Bounds::contains_temperature(solution.t));

        Ok(InverseSolution {
            state: direct.classify(p, solution.t)?,
            iterations: solution.iterations,
        })
    }
}
