//! Case configuration, validation, and the run context.
//!
//! [`CaseConfig`] is the builder-input for constructing a run.
//! [`validate()`](CaseConfig::validate) checks structural invariants
//! at startup, before any mesh or partition is built; the sequencer
//! constructor calls it and refuses to start an ill-posed case.

use std::error::Error;
use std::fmt;

use ibis_core::Vec2;
use ibis_mesh::{MeshError, SolidMesh};

// ── RunContext ─────────────────────────────────────────────────────

/// Where this rank sits in the run, decided once at startup.
///
/// Replaces repeated runtime mode queries: components receive the
/// context and branch on [`parallel`](RunContext::parallel) instead of
/// re-asking the communicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunContext {
    /// This rank's index, `0..n_ranks`.
    pub rank: usize,
    /// Total rank count.
    pub n_ranks: usize,
}

impl RunContext {
    /// Context for the rank `rank` of `n_ranks`.
    pub fn new(rank: usize, n_ranks: usize) -> Self {
        Self { rank, n_ranks }
    }

    /// Whether the run is decomposed across more than one rank.
    pub fn parallel(&self) -> bool {
        self.n_ranks > 1
    }

    /// Whether this rank writes checkpoints and run-level logs.
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }
}

// ── CaseConfig ─────────────────────────────────────────────────────

/// Full description of a coupled case.
///
/// Mesh geometry, the initial solid surface, time control, transfer
/// parameters, and the checkpoint cadence. The solver collaborators
/// are not part of the config; they are passed to the sequencer
/// separately as boxed trait objects.
#[derive(Clone, Debug)]
pub struct CaseConfig {
    /// Background cells in x.
    pub nx: usize,
    /// Background cells in y.
    pub ny: usize,
    /// Cell extent in x.
    pub dx: f64,
    /// Cell extent in y.
    pub dy: f64,
    /// Position of the mesh's lower-left corner.
    pub origin: Vec2,
    /// Initial solid surface.
    pub solid: SolidMesh,
    /// Initial timestep, seconds.
    pub dt_initial: f64,
    /// Whether the timestep adapts to the Courant target.
    pub adjust_dt: bool,
    /// Lower timestep clamp.
    pub min_dt: f64,
    /// Upper timestep clamp.
    pub max_dt: f64,
    /// Target Courant number for the adaptive timestep.
    pub target_courant: f64,
    /// Simulated end time, seconds.
    pub end_time: f64,
    /// Write a checkpoint every this many steps. `None` disables
    /// checkpointing.
    pub checkpoint_every: Option<u64>,
    /// Dynamic viscosity entering the wall-shear estimate.
    pub viscosity: f64,
    /// Interpolation stencil radius, in smallest-cell-extent units.
    pub stencil_radius: f64,
    /// Number of ranks the case is decomposed over.
    pub n_ranks: usize,
}

impl CaseConfig {
    /// Check structural invariants.
    ///
    /// Returns the first violation found; a passing config can still
    /// fail mesh or partition construction (those report their own
    /// [`MeshError`]s), but every value here is at least well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::ZeroMeshDimension);
        }
        for value in [self.dx, self.dy] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSpacing { value });
            }
        }
        for value in [self.dt_initial, self.min_dt, self.max_dt] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTimestep { value });
            }
        }
        if self.min_dt > self.max_dt {
            return Err(ConfigError::TimestepBoundsInverted {
                min: self.min_dt,
                max: self.max_dt,
            });
        }
        if !self.target_courant.is_finite() || self.target_courant <= 0.0 {
            return Err(ConfigError::InvalidCourantTarget {
                value: self.target_courant,
            });
        }
        if !self.end_time.is_finite() || self.end_time <= 0.0 {
            return Err(ConfigError::InvalidEndTime {
                value: self.end_time,
            });
        }
        if self.checkpoint_every == Some(0) {
            return Err(ConfigError::ZeroCheckpointInterval);
        }
        if !self.viscosity.is_finite() || self.viscosity < 0.0 {
            return Err(ConfigError::InvalidViscosity {
                value: self.viscosity,
            });
        }
        if !self.stencil_radius.is_finite() || self.stencil_radius <= 0.0 {
            return Err(ConfigError::InvalidStencilRadius {
                value: self.stencil_radius,
            });
        }
        if self.n_ranks == 0 {
            return Err(ConfigError::ZeroRanks);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`CaseConfig::validate()`] or case setup.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A background-mesh dimension is zero.
    ZeroMeshDimension,
    /// A cell spacing is not positive and finite.
    InvalidSpacing {
        /// The invalid value.
        value: f64,
    },
    /// A timestep bound or the initial timestep is not positive and
    /// finite.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// The minimum timestep exceeds the maximum.
    TimestepBoundsInverted {
        /// Configured lower clamp.
        min: f64,
        /// Configured upper clamp.
        max: f64,
    },
    /// The Courant target is not positive and finite.
    InvalidCourantTarget {
        /// The invalid value.
        value: f64,
    },
    /// The end time is not positive and finite.
    InvalidEndTime {
        /// The invalid value.
        value: f64,
    },
    /// A checkpoint interval of zero steps was configured.
    ZeroCheckpointInterval,
    /// The viscosity is negative or non-finite.
    InvalidViscosity {
        /// The invalid value.
        value: f64,
    },
    /// The stencil radius is not positive and finite.
    InvalidStencilRadius {
        /// The invalid value.
        value: f64,
    },
    /// A rank count of zero was configured.
    ZeroRanks,
    /// The configured rank count disagrees with the communicator.
    RankMismatch {
        /// Rank count from the configuration.
        configured: usize,
        /// Rank count reported by the communicator.
        communicator: usize,
    },
    /// A checkpoint snapshot did not fit the configured case.
    Restart {
        /// Description of the mismatch.
        detail: String,
    },
    /// Mesh or partition construction failed.
    Mesh(MeshError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMeshDimension => write!(f, "background-mesh dimensions must be nonzero"),
            Self::InvalidSpacing { value } => {
                write!(f, "cell spacing must be positive and finite, got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "timestep must be positive and finite, got {value}")
            }
            Self::TimestepBoundsInverted { min, max } => {
                write!(f, "min_dt {min} exceeds max_dt {max}")
            }
            Self::InvalidCourantTarget { value } => {
                write!(f, "Courant target must be positive and finite, got {value}")
            }
            Self::InvalidEndTime { value } => {
                write!(f, "end time must be positive and finite, got {value}")
            }
            Self::ZeroCheckpointInterval => {
                write!(f, "checkpoint interval must be at least one step")
            }
            Self::InvalidViscosity { value } => {
                write!(f, "viscosity must be non-negative and finite, got {value}")
            }
            Self::InvalidStencilRadius { value } => {
                write!(f, "stencil radius must be positive and finite, got {value}")
            }
            Self::ZeroRanks => write!(f, "rank count must be at least one"),
            Self::RankMismatch {
                configured,
                communicator,
            } => write!(
                f,
                "config expects {configured} ranks but the communicator has {communicator}"
            ),
            Self::Restart { detail } => write!(f, "restart snapshot rejected: {detail}"),
            Self::Mesh(e) => write!(f, "case setup: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for ConfigError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}
