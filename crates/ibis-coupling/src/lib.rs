//! The fluid-solid coupling surface of the Ibis framework.
//!
//! Two of the step loop's non-trivial algorithms live here: the
//! cell-to-surface force transfer that loads the structural solver,
//! and the geometry update that propagates solid deformation into a
//! fresh immersed-boundary classification. The solver-boundary traits
//! the sequencer drives are also defined here, since they are the
//! contracts the coupling is written against.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod force_transfer;
pub mod geometry;
pub mod shear;
pub mod solver;

pub use force_transfer::ForceTransferEngine;
pub use geometry::GeometryUpdater;
pub use shear::{WallGradientShear, WallShearModel};
pub use solver::{ClosureKind, ClosureModel, FluidSolver, SolidSolver};
