//! Ibis: a fluid-structure interaction framework with an
//! immersed-boundary coupling core.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Ibis sub-crates. For most users, adding `ibis` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ibis::prelude::*;
//!
//! // A 24x24 channel with a tethered circle immersed in it.
//! let config = CaseConfig {
//!     nx: 24,
//!     ny: 24,
//!     dx: 0.05,
//!     dy: 0.05,
//!     origin: [0.0, 0.0],
//!     solid: SolidMesh::circle([0.5, 0.6], 0.15, 16).unwrap(),
//!     dt_initial: 0.005,
//!     adjust_dt: true,
//!     min_dt: 1e-8,
//!     max_dt: 0.05,
//!     target_courant: 0.5,
//!     end_time: 0.05,
//!     checkpoint_every: None,
//!     viscosity: 1e-3,
//!     stencil_radius: 3.0,
//!     n_ranks: 1,
//! };
//! let solvers = CaseSolvers {
//!     solid: Box::new(SpringSolid::new(200.0, 4.0, 1.0)),
//!     fluid: Box::new(RelaxationFluid::new([1.0, 0.0], 1.0, 0.3)),
//!     closure: Box::new(LaminarClosure),
//! };
//! let mut sequencer =
//!     Sequencer::new(config, solvers, Box::new(SingleProcess::new()), None).unwrap();
//! let summary = sequencer.run().unwrap();
//! assert!(summary.steps > 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ibis-core` | Fields, time levels, IDs, error taxonomy |
//! | [`mesh`] | `ibis-mesh` | Background mesh, solid surface, partitions |
//! | [`exchange`] | `ibis-exchange` | The `Communicator` seam and transports |
//! | [`coupling`] | `ibis-coupling` | Force transfer, geometry update, solver traits |
//! | [`solvers`] | `ibis-solvers` | Reference solid, fluid and closure solvers |
//! | [`checkpoint`] | `ibis-checkpoint` | Binary restart files |
//! | [`engine`] | `ibis-engine` | The step sequencer and run orchestration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core fields, time levels, IDs, and the error taxonomy (`ibis-core`).
pub use ibis_core as types;

/// Background mesh, solid surface, and rank partitions (`ibis-mesh`).
///
/// The [`mesh::BackgroundMesh`] carries the immersed-boundary
/// classification; [`mesh::SolidMesh`] is the deformable surface.
pub use ibis_mesh as mesh;

/// Inter-rank communication (`ibis-exchange`).
///
/// The [`exchange::Communicator`] trait is the seam a real MPI
/// transport would implement; [`exchange::SingleProcess`] and
/// [`exchange::LocalComm`] ship in-tree.
pub use ibis_exchange as exchange;

/// Coupling algorithms and solver-boundary traits (`ibis-coupling`).
///
/// [`coupling::ForceTransferEngine`] maps fluid loads onto the
/// surface; [`coupling::GeometryUpdater`] reclassifies the mesh after
/// solid motion.
pub use ibis_coupling as coupling;

/// Reference solver implementations (`ibis-solvers`).
///
/// Includes [`solvers::SpringSolid`], [`solvers::RelaxationFluid`],
/// [`solvers::LaminarClosure`], and [`solvers::KEpsilonClosure`].
pub use ibis_solvers as solvers;

/// Binary checkpoint format and stores (`ibis-checkpoint`).
///
/// Capture state with [`checkpoint::Snapshot`], persist it through a
/// [`checkpoint::CheckpointStore`].
pub use ibis_checkpoint as checkpoint;

/// Step sequencing and run orchestration (`ibis-engine`).
///
/// [`engine::Sequencer`] drives the fixed per-step coupling order;
/// [`engine::CaseConfig`] describes the case it runs.
pub use ibis_engine as engine;

/// Common imports for typical Ibis usage.
///
/// ```rust
/// use ibis::prelude::*;
/// ```
pub mod prelude {
    pub use ibis_checkpoint::{CheckpointStore, Snapshot};
    pub use ibis_core::{FlowField, StepError, SurfaceLoad, TimeState};
    pub use ibis_coupling::{
        ClosureKind, ClosureModel, FluidSolver, SolidSolver, WallShearModel,
    };
    pub use ibis_engine::{CaseConfig, CaseSolvers, RunSummary, Sequencer, StepMetrics};
    pub use ibis_exchange::{Communicator, LocalComm, SingleProcess};
    pub use ibis_mesh::{BackgroundMesh, SolidMesh};
    pub use ibis_solvers::{KEpsilonClosure, LaminarClosure, RelaxationFluid, SpringSolid};
}
