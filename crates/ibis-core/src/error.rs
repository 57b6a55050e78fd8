//! Error types shared across the Ibis workspace.
//!
//! Organized by subsystem: step (sequencer), solver collaborators,
//! force transfer, and inter-rank exchange. Restart-state
//! incompleteness and stale processor-boundary values are deliberately
//! absent here: both are expected conditions repaired in place by the
//! sequencer, not faults.

use std::error::Error;
use std::fmt;

/// The phase of the per-step coupling sequence that an error occurred in.
///
/// Phases are listed in execution order; the sequencer records one
/// timing entry per phase in this order every step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Cell-to-surface force/stress transfer.
    ForceTransfer,
    /// Structural displacement solve.
    Solid,
    /// Immersed-boundary geometry update.
    Geometry,
    /// Pressure-velocity coupling solve.
    Fluid,
    /// Closure-model correction.
    Closure,
    /// Processor-boundary field reconciliation.
    Reconcile,
    /// Checkpoint write.
    Checkpoint,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ForceTransfer => "force transfer",
            Self::Solid => "solid solve",
            Self::Geometry => "geometry update",
            Self::Fluid => "fluid solve",
            Self::Closure => "closure correction",
            Self::Reconcile => "parallel reconciliation",
            Self::Checkpoint => "checkpoint write",
        };
        write!(f, "{name}")
    }
}

/// Errors reported by an external solver collaborator.
///
/// Returned by the solid, fluid, and closure solver boundaries and
/// wrapped in [`StepError::SolverFailed`] by the sequencer.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// The solver's internal iteration failed to converge or produced
    /// non-finite values.
    Diverged {
        /// Human-readable description of the divergence.
        reason: String,
    },
    /// A required old-time field was not seeded before the solve.
    ///
    /// Unreachable in a correctly sequenced run: the restart guard
    /// seeds old-time state before the first solve of any run.
    MissingHistory {
        /// Which old-time quantity was missing.
        what: &'static str,
    },
    /// Any other solver-internal failure.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diverged { reason } => write!(f, "solver diverged: {reason}"),
            Self::MissingHistory { what } => {
                write!(f, "old-time {what} not seeded before solve")
            }
            Self::Failed { reason } => write!(f, "solver failed: {reason}"),
        }
    }
}

impl Error for SolverError {}

/// Errors from inter-rank communication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeError {
    /// The peer rank's channel endpoint is gone.
    Disconnected {
        /// The unreachable peer rank.
        peer: usize,
    },
    /// A received buffer did not have the expected length.
    SizeMismatch {
        /// Number of values expected.
        expected: usize,
        /// Number of values received.
        got: usize,
    },
    /// The requested peer rank does not exist in this communicator.
    NoSuchRank {
        /// The invalid rank index.
        rank: usize,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::SizeMismatch { expected, got } => {
                write!(f, "exchange size mismatch: expected {expected} values, got {got}")
            }
            Self::NoSuchRank { rank } => write!(f, "no such rank: {rank}"),
        }
    }
}

impl Error for ExchangeError {}

/// Errors from the cell-to-surface force transfer.
#[derive(Clone, Debug, PartialEq)]
pub enum TransferError {
    /// No fluid-side cell fell inside a load point's interpolation
    /// stencil on any rank. The stencil radius is too small for the
    /// mesh resolution, or the surface left the background mesh.
    EmptySupport {
        /// The unsupported load point.
        point: usize,
    },
    /// The cross-rank gather failed.
    Exchange(ExchangeError),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySupport { point } => {
                write!(f, "load point {point} has no interpolation support")
            }
            Self::Exchange(e) => write!(f, "force transfer gather: {e}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExchangeError> for TransferError {
    fn from(e: ExchangeError) -> Self {
        Self::Exchange(e)
    }
}

/// Fatal errors from the step sequencer.
///
/// Every variant aborts the entire run on all ranks; there is no
/// step-level retry or rollback. Partial-rank continuation would leave
/// the lockstep collectives inconsistent.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The adaptive timestep came out non-positive or non-finite,
    /// signalling a diverged or ill-posed flow field upstream.
    DivergedTimestep {
        /// The offending timestep value.
        value: f64,
    },
    /// An external solver collaborator failed.
    SolverFailed {
        /// Which phase of the step sequence failed.
        phase: Phase,
        /// The underlying solver error.
        reason: SolverError,
    },
    /// The cell-to-surface force transfer failed.
    Transfer(TransferError),
    /// Inter-rank reconciliation failed.
    Exchange(ExchangeError),
    /// A peer rank raised a fatal error; this rank stops in sympathy
    /// so the lockstep collectives never wait on a dead peer.
    PeerAborted,
    /// A checkpoint write failed.
    CheckpointFailed {
        /// Human-readable description of the write failure.
        reason: String,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivergedTimestep { value } => {
                write!(f, "computed timestep {value} is not positive and finite")
            }
            Self::SolverFailed { phase, reason } => {
                write!(f, "{phase} failed: {reason}")
            }
            Self::Transfer(e) => write!(f, "{e}"),
            Self::Exchange(e) => write!(f, "{e}"),
            Self::PeerAborted => write!(f, "a peer rank aborted the run"),
            Self::CheckpointFailed { reason } => write!(f, "checkpoint write failed: {reason}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SolverFailed { reason, .. } => Some(reason),
            Self::Transfer(e) => Some(e),
            Self::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransferError> for StepError {
    fn from(e: TransferError) -> Self {
        Self::Transfer(e)
    }
}

impl From<ExchangeError> for StepError {
    fn from(e: ExchangeError) -> Self {
        Self::Exchange(e)
    }
}
