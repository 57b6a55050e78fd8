//! Solver-boundary traits: the contracts of the external collaborators.
//!
//! The sequencer drives three black boxes each step: the structural
//! solver, the pressure-velocity (PISO-type) fluid solver, and the
//! closure model. Only their call contracts are fixed here; how they
//! discretize or iterate internally is their business. All three are
//! object-safe and stored as `Box<dyn …>` by the sequencer.

use ibis_core::{FlowField, SolverError, SurfaceLoad, TimeState};
use ibis_mesh::{BackgroundMesh, SolidMesh};

/// What kind of closure a model is, decided once at startup.
///
/// Replaces runtime type-name string comparison: the sequencer pattern
/// matches on this tag to skip closure-specific synchronization for
/// laminar runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClosureKind {
    /// No closure; the correction step is a no-op and processor-boundary
    /// reconciliation of closure fields is skipped entirely.
    Laminar,
    /// An active transport-equation closure with a model name for
    /// reporting.
    Turbulent(&'static str),
}

impl ClosureKind {
    /// Whether this is the no-op laminar case.
    pub fn is_laminar(&self) -> bool {
        matches!(self, Self::Laminar)
    }

    /// Model name for per-step reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Laminar => "laminar",
            Self::Turbulent(name) => name,
        }
    }
}

/// Structural solver boundary.
///
/// Consumes the step's surface load exactly once and leaves the solid
/// mesh's positions and velocities updated for the geometry update
/// that follows.
pub trait SolidSolver: Send {
    /// Short name for error reporting and logs.
    fn name(&self) -> &str;

    /// Solve the solid's response to `load` over the step `state.dt`.
    fn solve(
        &mut self,
        load: &SurfaceLoad,
        solid: &mut SolidMesh,
        state: &TimeState,
    ) -> Result<(), SolverError>;
}

/// Fluid solver boundary (pressure-velocity coupling).
///
/// Must only ever see a mesh whose classification corresponds to the
/// just-computed solid displacement; the sequencer guarantees the
/// geometry update ran first.
pub trait FluidSolver: Send {
    /// Short name for error reporting and logs.
    fn name(&self) -> &str;

    /// Advance velocity and pressure one timestep against the current
    /// immersed-boundary classification.
    fn solve(
        &mut self,
        flow: &mut FlowField,
        mesh: &BackgroundMesh,
        state: &TimeState,
    ) -> Result<(), SolverError>;
}

/// Closure-model boundary.
///
/// Corrects the closure scalar fields and effective viscosity after
/// the fluid solve. The correction is not required to refresh
/// processor-boundary coupled values; the sequencer repairs that
/// separately.
pub trait ClosureModel: Send {
    /// The closure tag, fixed at construction.
    fn kind(&self) -> ClosureKind;

    /// Correct `k`, `epsilon`, and `nut` for the completed step.
    fn correct(
        &mut self,
        flow: &mut FlowField,
        mesh: &BackgroundMesh,
        state: &TimeState,
    ) -> Result<(), SolverError>;
}
