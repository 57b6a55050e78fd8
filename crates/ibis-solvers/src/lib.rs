//! Reference solver implementations for the Ibis coupling loop.
//!
//! These are deliberately small models: a damped-spring structural
//! solver, a relaxation fluid solver and two closure models. They
//! exercise every coupling contract, including the old-time history
//! dependence of the fluid solve, and give integration tests a
//! complete case to run. Production deployments swap in their own
//! implementations of the [`ibis_coupling::solver`] traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod closure;
pub mod fluid;
pub mod solid;

pub use closure::{KEpsilonClosure, LaminarClosure};
pub use fluid::RelaxationFluid;
pub use solid::SpringSolid;
