//! Mesh data structures for the Ibis FSI framework.
//!
//! Three structures live here: the fixed-topology background fluid
//! mesh with its per-cell immersed-boundary classification, the
//! deformable solid surface, and the slab partition that maps cells to
//! ranks for distributed runs. Classification is mutated only by the
//! geometry updater in `ibis-coupling`; nothing here solves anything.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod background;
pub mod error;
pub mod geom;
pub mod mask;
pub mod partition;
pub mod solid;

pub use background::{BackgroundMesh, CellClass};
pub use error::MeshError;
pub use mask::ibm_mask;
pub use partition::{BoundaryPatch, ParallelPartition};
pub use solid::{LoadPoint, SolidMesh};
