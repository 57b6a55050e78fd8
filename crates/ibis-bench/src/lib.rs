//! Shared case profiles for the Ibis benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use ibis_engine::{CaseConfig, CaseSolvers};
use ibis_mesh::SolidMesh;
use ibis_solvers::{KEpsilonClosure, LaminarClosure, RelaxationFluid, SpringSolid};

/// The benchmark reference case: a 128x128 background mesh with a
/// 64-segment immersed circle.
pub fn reference_profile() -> CaseConfig {
    CaseConfig {
        nx: 128,
        ny: 128,
        dx: 0.01,
        dy: 0.01,
        origin: [0.0, 0.0],
        solid: SolidMesh::circle([0.5, 0.64], 0.2, 64).expect("valid benchmark circle"),
        dt_initial: 0.002,
        adjust_dt: true,
        min_dt: 1e-8,
        max_dt: 0.01,
        target_courant: 0.5,
        end_time: 10.0,
        checkpoint_every: None,
        viscosity: 1e-3,
        stencil_radius: 3.0,
        n_ranks: 1,
    }
}

pub fn laminar_solvers() -> CaseSolvers {
    CaseSolvers {
        solid: Box::new(SpringSolid::new(500.0, 10.0, 1.0)),
        fluid: Box::new(RelaxationFluid::new([1.0, 0.0], 1.0, 0.3)),
        closure: Box::new(LaminarClosure),
    }
}

pub fn turbulent_solvers() -> CaseSolvers {
    CaseSolvers {
        solid: Box::new(SpringSolid::new(500.0, 10.0, 1.0)),
        fluid: Box::new(RelaxationFluid::new([1.0, 0.0], 1.0, 0.3)),
        closure: Box::new(KEpsilonClosure::new(0.05, 0.07)),
    }
}
